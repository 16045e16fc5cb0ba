//! Chat command parsing.

use crate::domain::ItemId;
use crate::recipes::Catalog;

pub const COMMAND_PREFIX: &str = "/gw2tp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    Recipe(&'static str),
    Price(ItemId),
    /// A known command with a bad argument; carries the usage line.
    Usage(&'static str),
    Unknown,
}

/// Parse a chat message.
///
/// Returns `None` for messages not addressed to the bot.
pub fn parse_command(text: &str, catalog: &Catalog) -> Option<BotCommand> {
    let rest = text.trim().strip_prefix(COMMAND_PREFIX)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut words = rest.split_whitespace();
    let command = match words.next() {
        Some("help") => BotCommand::Help,
        Some("get_price") => match words.next().map(str::parse::<ItemId>) {
            Some(Ok(id)) => BotCommand::Price(id),
            _ => BotCommand::Usage("/gw2tp get_price <item_id>"),
        },
        Some(slug) => match catalog.get(slug) {
            Some(recipe) => BotCommand::Recipe(recipe.slug),
            None => BotCommand::Unknown,
        },
        None => BotCommand::Unknown,
    };
    Some(command)
}

/// Lines listed by `/gw2tp help`.
pub fn help_lines(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .map(|r| format!("{} {}", COMMAND_PREFIX, r.slug))
        .chain(std::iter::once(format!("{} get_price <item_id>", COMMAND_PREFIX)))
        .chain(std::iter::once(format!("{} help", COMMAND_PREFIX)))
        .collect()
}
