//! Telegram bot.
//!
//! Thin dispatch glue: raw updates are translated into `engine::ChatEvent`
//! values at this boundary and reconciled through the engine; replies
//! (triggers, configured commands, quotes) are decided here.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use teloxide::prelude::*;

pub use access::AccessPolicy;
pub use responses::Responses;

mod access;
mod commands;
mod event;
mod handlers;
mod responses;

#[derive(Clone)]
pub struct ConfigParameters {
    engine: Arc<engine::Engine>,
    access: Arc<AccessPolicy>,
    responses: Arc<Responses>,
    debug: bool,
}

pub struct Bot {
    token: String,
    debug: bool,
    access: AccessPolicy,
    responses: Responses,
    database: DatabaseConnection,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    /// Run the bot until the process is stopped.
    ///
    /// Validating the credentials and building the engine happen before
    /// dispatch starts; an invalid token surfaces here as an error so the
    /// caller can exit with a message.
    pub async fn run(&self) -> Result<(), String> {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        let me = bot
            .get_me()
            .await
            .map_err(|err| format!("invalid bot credentials: {err}"))?;
        tracing::info!("Running as @{}", me.username());

        let engine = engine::Engine::builder()
            .database(self.database.clone())
            .bot_user_id(me.user.id.0 as i64)
            .build()
            .await
            .map_err(|err| format!("failed to initialize engine: {err}"))?;

        let parameters = ConfigParameters {
            engine: Arc::new(engine),
            access: Arc::new(self.access.clone()),
            responses: Arc::new(self.responses.clone()),
            debug: self.debug,
        };

        let handler = Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<commands::Command>()
                    .endpoint(handlers::handle_command),
            )
            .endpoint(handlers::handle_message);

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

/// The builder for `Bot`
#[derive(Default)]
pub struct BotBuilder {
    token: String,
    debug: bool,
    access: AccessPolicy,
    responses: Responses,
    database: DatabaseConnection,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// Enable the `/debug` command.
    pub fn debug(mut self, debug: bool) -> BotBuilder {
        self.debug = debug;
        self
    }

    pub fn access(mut self, access: AccessPolicy) -> BotBuilder {
        self.access = access;
        self
    }

    pub fn responses(mut self, responses: Responses) -> BotBuilder {
        self.responses = responses;
        self
    }

    pub fn database(mut self, db: DatabaseConnection) -> BotBuilder {
        self.database = db;
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.is_empty() {
            return Err("missing bot token".to_string());
        }
        Ok(Bot {
            token: self.token,
            debug: self.debug,
            access: self.access,
            responses: self.responses,
            database: self.database,
        })
    }
}
