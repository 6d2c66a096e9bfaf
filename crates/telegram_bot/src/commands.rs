//! Command structs

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "Show this message.")]
    Help,
    #[command(description = "Reply with a random quote stored for this chat.")]
    Quote,
    #[command(description = "Store a quote for this chat (admins only).")]
    AddQuote { text: String },
    #[command(description = "About this bot.")]
    Info,
    #[command(description = "How the whitelist works.")]
    Whitelist,
    #[command(description = "Show chat and user identifiers.")]
    Debug,
}
