//! Message and command handlers.
//!
//! Every message is reconciled first, commands included: the store tracks
//! chats and memberships independently of whether the bot replies.

use teloxide::{prelude::*, utils::command::BotCommands};

use crate::{ConfigParameters, commands::Command, event::event_from_message};

pub(crate) async fn handle_command(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
    cmd: Command,
) -> ResponseResult<()> {
    reconcile(&cfg, &msg).await;

    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = from.id.0 as i64;
    let chat_id = msg.chat.id.0;

    if !cfg.access.allows(user_id, chat_id) {
        return Ok(());
    }

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Quote => match cfg.engine.random_quote(chat_id).await {
            Ok(Some(content)) => {
                bot.send_message(msg.chat.id, content).await?;
            }
            // No quotes for this chat is a defined empty result: stay silent.
            Ok(None) => {}
            Err(err) => tracing::warn!("quote lookup failed: {err}"),
        },
        Command::AddQuote { text } => {
            if chat_id > 0 {
                bot.send_message(msg.chat.id, "Quotes can only be added in group chats.")
                    .await?;
                return Ok(());
            }
            if !cfg.access.is_admin(user_id) {
                return Ok(());
            }
            match cfg.engine.add_quote(&text, &[chat_id]).await {
                Ok(_) => {
                    let reply = match cfg.engine.quote_count(chat_id).await {
                        Ok(count) => format!("Quote saved ({count} for this chat)."),
                        Err(_) => "Quote saved.".to_string(),
                    };
                    bot.send_message(msg.chat.id, reply).await?;
                }
                Err(engine::EngineError::InvalidQuote(_)) => {
                    bot.send_message(msg.chat.id, "Usage: /addquote <text>")
                        .await?;
                }
                Err(err) => tracing::warn!("failed to store quote: {err}"),
            }
        }
        Command::Info => {
            reply_configured(&bot, &msg, &cfg, "info", &from.first_name).await?;
        }
        Command::Whitelist => {
            reply_configured(&bot, &msg, &cfg, "whitelist", &from.first_name).await?;
        }
        Command::Debug => {
            if cfg.debug {
                bot.send_message(msg.chat.id, format!("ChatID: {chat_id}\nUserID: {user_id}"))
                    .await?;
            }
        }
    }

    Ok(())
}

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    reconcile(&cfg, &msg).await;

    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };

    if !cfg.access.allows(from.id.0 as i64, msg.chat.id.0) {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    // Commands configured in the settings file only (the built-in ones are
    // matched by the dispatcher before this handler runs).
    if let Some(name) = configured_command_name(text) {
        if let Some(reply) = cfg.responses.command_reply(name, &from.first_name) {
            bot.send_message(msg.chat.id, reply).await?;
        }
        return Ok(());
    }

    if let Some(reply) = cfg.responses.trigger_reply(text, &from.first_name) {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}

async fn reconcile(cfg: &ConfigParameters, msg: &Message) {
    let Some(event) = event_from_message(msg) else {
        return;
    };
    // Persistence failures are logged and the update dropped; the engine
    // does not retry.
    if let Err(err) = cfg.engine.reconcile(&event).await {
        tracing::warn!(chat_id = msg.chat.id.0, "reconciliation failed: {err}");
    }
}

/// `/name` or `/name@botname` at the start of a text message.
fn configured_command_name(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('/')?;
    let name = rest.split_whitespace().next()?;
    let name = name.split('@').next()?;
    if name.is_empty() { None } else { Some(name) }
}

async fn reply_configured(
    bot: &Bot,
    msg: &Message,
    cfg: &ConfigParameters,
    name: &str,
    first_name: &str,
) -> ResponseResult<()> {
    if let Some(reply) = cfg.responses.command_reply(name, first_name) {
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}
