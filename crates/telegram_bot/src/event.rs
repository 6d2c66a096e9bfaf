//! Translation of raw Telegram updates into engine events.
//!
//! The raw `Message` object carries different fields depending on its
//! kind; everything the engine needs is resolved here, once, into the
//! tagged [`ChatEvent`] representation.

use engine::{ChatEvent, ChatProfile, NewMessage, UserProfile};
use teloxide::types::{Message, MessageOrigin, User};

/// Map one incoming message to the event the engine should reconcile.
///
/// Join/leave service messages become membership events; everything else
/// with an identifiable sender is recorded as a message (non-text content
/// is kept with an empty body so membership still updates).
pub(crate) fn event_from_message(msg: &Message) -> Option<ChatEvent> {
    let chat = ChatProfile {
        chat_id: msg.chat.id.0,
        title: msg.chat.title().map(ToString::to_string),
    };
    let actor = profile(msg.from.as_ref()?);

    if let Some(joined) = msg.new_chat_members() {
        return Some(ChatEvent::MemberJoined {
            chat,
            actor,
            joined: joined.iter().map(profile).collect(),
        });
    }

    if let Some(left) = msg.left_chat_member() {
        return Some(ChatEvent::MemberLeft {
            chat,
            actor,
            left: profile(left),
        });
    }

    Some(ChatEvent::Message {
        chat,
        from: actor,
        message: NewMessage {
            message_id: i64::from(msg.id.0),
            sent_at: msg.date,
            content: msg.text().map(ToString::to_string),
            forward_user_id: forward_user_id(msg),
            reply_message_id: msg.reply_to_message().map(|reply| i64::from(reply.id.0)),
        },
    })
}

fn profile(user: &User) -> UserProfile {
    UserProfile {
        user_id: user.id.0 as i64,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
    }
}

fn forward_user_id(msg: &Message) -> Option<i64> {
    match msg.forward_origin()? {
        MessageOrigin::User { sender_user, .. } => Some(sender_user.id.0 as i64),
        _ => None,
    }
}
