//! Core of the quotelog bot: persistence entities, the reconciliation
//! routine that keeps chat/user/membership rows consistent with observed
//! platform events, and the quote store.
//!
//! The crate knows nothing about Telegram. The dispatch layer translates
//! raw platform updates into [`ChatEvent`] values and hands them to
//! [`Engine::reconcile`].

use sea_orm::DatabaseConnection;

pub use error::EngineError;
pub use event::{ChatEvent, ChatProfile, NewMessage, UserProfile};

pub mod chat_members;
pub mod chat_quotes;
pub mod chats;
mod error;
mod event;
pub mod messages;
mod moderation;
pub mod quotes;
mod quote_store;
mod reconcile;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Handle over the relational store.
///
/// Holds the connection explicitly; there is no process-wide session. The
/// bot's own user id is needed so membership events about the bot itself
/// toggle the chat's active flag instead of creating a membership row.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    bot_user_id: i64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn bot_user_id(&self) -> i64 {
        self.bot_user_id
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    bot_user_id: i64,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// The platform identity of the bot process itself.
    pub fn bot_user_id(mut self, id: i64) -> EngineBuilder {
        self.bot_user_id = id;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            bot_user_id: self.bot_user_id,
        })
    }
}
