//! Membership/state reconciliation.
//!
//! Given an incoming [`ChatEvent`], makes sure the corresponding chat,
//! user and membership rows exist and carry the right active flags, and
//! appends message rows. Each call runs in a single DB transaction;
//! persistence failures propagate to the caller, there is no retry.
//!
//! Membership state machine per (user, chat) pair: absent -> active on
//! join or first message, active -> inactive on leave, inactive -> active
//! on re-join. Rows never go back to absent.

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::{
    ChatEvent, ChatProfile, Engine, NewMessage, ResultEngine, UserProfile, chat_members, chats,
    messages, users, with_tx,
};

impl Engine {
    /// Reconcile stored state with one observed platform event.
    ///
    /// Events from direct (one-to-one) chats are ignored entirely: no
    /// rows are written for them.
    pub async fn reconcile(&self, event: &ChatEvent) -> ResultEngine<()> {
        if event.chat().is_direct() {
            return Ok(());
        }

        with_tx!(self, |db_tx| {
            match event {
                ChatEvent::Message {
                    chat,
                    from,
                    message,
                } => self.apply_message(&db_tx, chat, from, message).await,
                ChatEvent::MemberJoined {
                    chat,
                    actor,
                    joined,
                } => self.apply_joined(&db_tx, chat, actor, joined).await,
                ChatEvent::MemberLeft { chat, actor, left } => {
                    self.apply_left(&db_tx, chat, actor, left).await
                }
            }
        })
    }

    async fn apply_message(
        &self,
        db_tx: &DatabaseTransaction,
        chat: &ChatProfile,
        from: &UserProfile,
        message: &NewMessage,
    ) -> ResultEngine<()> {
        self.register_pair(db_tx, chat, from).await?;

        let row = messages::ActiveModel {
            chat_id: ActiveValue::Set(chat.chat_id),
            message_id: ActiveValue::Set(message.message_id),
            user_id: ActiveValue::Set(from.user_id),
            sent_at: ActiveValue::Set(message.sent_at),
            content: ActiveValue::Set(message.content.clone()),
            forward_user_id: ActiveValue::Set(message.forward_user_id),
            reply_message_id: ActiveValue::Set(message.reply_message_id),
        };

        // Updates are delivered at least once; a redelivered message is a
        // primary-key conflict and must not append a second row.
        messages::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([messages::Column::ChatId, messages::Column::MessageId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db_tx)
            .await?;

        Ok(())
    }

    async fn apply_joined(
        &self,
        db_tx: &DatabaseTransaction,
        chat: &ChatProfile,
        actor: &UserProfile,
        joined: &[UserProfile],
    ) -> ResultEngine<()> {
        if actor.user_id != self.bot_user_id() {
            self.register_pair(db_tx, chat, actor).await?;
        } else {
            self.ensure_chat(db_tx, chat).await?;
        }

        for user in joined {
            if user.user_id == self.bot_user_id() {
                self.set_chat_active(db_tx, chat, true).await?;
                continue;
            }

            self.ensure_user(db_tx, user).await?;
            match self.find_member(db_tx, user.user_id, chat.chat_id).await? {
                Some(_) => {
                    self.set_member_active(db_tx, user.user_id, chat.chat_id, true)
                        .await?;
                }
                None => {
                    self.insert_member(db_tx, user.user_id, chat.chat_id, true)
                        .await?;
                }
            }
        }

        Ok(())
    }

    async fn apply_left(
        &self,
        db_tx: &DatabaseTransaction,
        chat: &ChatProfile,
        actor: &UserProfile,
        left: &UserProfile,
    ) -> ResultEngine<()> {
        if left.user_id == self.bot_user_id() {
            self.set_chat_active(db_tx, chat, false).await?;
            return Ok(());
        }

        self.ensure_chat(db_tx, chat).await?;
        if actor.user_id != left.user_id && actor.user_id != self.bot_user_id() {
            self.register_pair(db_tx, chat, actor).await?;
        }

        self.ensure_user(db_tx, left).await?;
        match self.find_member(db_tx, left.user_id, chat.chat_id).await? {
            Some(_) => {
                self.set_member_active(db_tx, left.user_id, chat.chat_id, false)
                    .await?;
            }
            None => {
                // Never-seen member leaving; keep the departure on record.
                self.insert_member(db_tx, left.user_id, chat.chat_id, false)
                    .await?;
            }
        }

        Ok(())
    }

    /// Make sure user, chat and an active membership exist for the pair.
    ///
    /// If the membership row is already there, the user and chat rows must
    /// exist too (foreign keys) and nothing is touched.
    async fn register_pair(
        &self,
        db_tx: &DatabaseTransaction,
        chat: &ChatProfile,
        user: &UserProfile,
    ) -> ResultEngine<()> {
        if self
            .find_member(db_tx, user.user_id, chat.chat_id)
            .await?
            .is_some()
        {
            return Ok(());
        }

        self.ensure_user(db_tx, user).await?;
        self.ensure_chat(db_tx, chat).await?;
        self.insert_member(db_tx, user.user_id, chat.chat_id, true)
            .await?;
        Ok(())
    }

    /// Membership lookup, always on the conjunction of user id and chat id.
    async fn find_member(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i64,
        chat_id: i64,
    ) -> ResultEngine<Option<chat_members::Model>> {
        let member = chat_members::Entity::find()
            .filter(chat_members::Column::UserId.eq(user_id))
            .filter(chat_members::Column::ChatId.eq(chat_id))
            .one(db_tx)
            .await?;
        Ok(member)
    }

    async fn insert_member(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i64,
        chat_id: i64,
        is_active: bool,
    ) -> ResultEngine<()> {
        chat_members::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            chat_id: ActiveValue::Set(chat_id),
            is_muted: ActiveValue::Set(false),
            is_active: ActiveValue::Set(is_active),
        }
        .insert(db_tx)
        .await?;
        Ok(())
    }

    async fn set_member_active(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i64,
        chat_id: i64,
        is_active: bool,
    ) -> ResultEngine<()> {
        chat_members::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            chat_id: ActiveValue::Set(chat_id),
            is_active: ActiveValue::Set(is_active),
            ..Default::default()
        }
        .update(db_tx)
        .await?;
        Ok(())
    }

    async fn ensure_user(
        &self,
        db_tx: &DatabaseTransaction,
        user: &UserProfile,
    ) -> ResultEngine<()> {
        if users::Entity::find_by_id(user.user_id)
            .one(db_tx)
            .await?
            .is_some()
        {
            return Ok(());
        }

        users::ActiveModel {
            user_id: ActiveValue::Set(user.user_id),
            first_name: ActiveValue::Set(user.first_name.clone()),
            last_name: ActiveValue::Set(user.last_name.clone()),
            username: ActiveValue::Set(user.username.clone()),
            is_admin: ActiveValue::Set(false),
            is_muted: ActiveValue::Set(false),
        }
        .insert(db_tx)
        .await?;
        Ok(())
    }

    async fn ensure_chat(
        &self,
        db_tx: &DatabaseTransaction,
        chat: &ChatProfile,
    ) -> ResultEngine<()> {
        if chats::Entity::find_by_id(chat.chat_id)
            .one(db_tx)
            .await?
            .is_some()
        {
            return Ok(());
        }

        chats::ActiveModel {
            chat_id: ActiveValue::Set(chat.chat_id),
            title: ActiveValue::Set(chat.title.clone()),
            is_active: ActiveValue::Set(true),
        }
        .insert(db_tx)
        .await?;
        Ok(())
    }

    /// Flip the chat's active flag, creating the row if the chat was never
    /// seen before (the bot can be added to a chat with no prior history).
    async fn set_chat_active(
        &self,
        db_tx: &DatabaseTransaction,
        chat: &ChatProfile,
        is_active: bool,
    ) -> ResultEngine<()> {
        match chats::Entity::find_by_id(chat.chat_id).one(db_tx).await? {
            Some(_) => {
                chats::ActiveModel {
                    chat_id: ActiveValue::Set(chat.chat_id),
                    is_active: ActiveValue::Set(is_active),
                    ..Default::default()
                }
                .update(db_tx)
                .await?;
            }
            None => {
                chats::ActiveModel {
                    chat_id: ActiveValue::Set(chat.chat_id),
                    title: ActiveValue::Set(chat.title.clone()),
                    is_active: ActiveValue::Set(is_active),
                }
                .insert(db_tx)
                .await?;
            }
        }
        Ok(())
    }
}
