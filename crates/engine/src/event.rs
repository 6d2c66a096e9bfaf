//! Platform events as seen by the reconciliation routine.
//!
//! The external update objects carry different fields depending on their
//! kind; they are resolved once at the dispatch boundary into this tagged
//! representation, so the engine never inspects raw platform payloads.

use chrono::{DateTime, Utc};

/// Identity of a platform user at the time of the event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Identity of the conversation the event happened in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatProfile {
    pub chat_id: i64,
    pub title: Option<String>,
}

impl ChatProfile {
    /// Direct (one-to-one) chats carry a positive identifier; groups and
    /// supergroups a non-positive one. Only groups are tracked.
    pub fn is_direct(&self) -> bool {
        self.chat_id > 0
    }
}

/// Payload of an observed chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
    pub message_id: i64,
    pub sent_at: DateTime<Utc>,
    /// `None` for non-text messages (photos, stickers, ...), which are
    /// still recorded for membership tracking.
    pub content: Option<String>,
    pub forward_user_id: Option<i64>,
    pub reply_message_id: Option<i64>,
}

/// A single incoming event, one per platform update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    /// A user sent a message in a chat.
    Message {
        chat: ChatProfile,
        from: UserProfile,
        message: NewMessage,
    },
    /// One or more users joined a chat; `actor` is the sender of the
    /// service message (the inviter, or the joiner itself).
    MemberJoined {
        chat: ChatProfile,
        actor: UserProfile,
        joined: Vec<UserProfile>,
    },
    /// A user left (or was removed from) a chat.
    MemberLeft {
        chat: ChatProfile,
        actor: UserProfile,
        left: UserProfile,
    },
}

impl ChatEvent {
    pub fn chat(&self) -> &ChatProfile {
        match self {
            Self::Message { chat, .. }
            | Self::MemberJoined { chat, .. }
            | Self::MemberLeft { chat, .. } => chat,
        }
    }
}
