use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

use crate::{
    commands::{help, start},
    errors::BotError,
    handlers::{link_received, quality_received},
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    /// Show the welcome message
    Start,
    /// Explain which links are supported
    Help,
}

/// Plain text that isn't a command. Unknown commands fall through here and
/// must not be treated as links.
fn is_link_candidate(text: &str) -> bool {
    !text.trim_start().starts_with('/')
}

pub fn schema() -> UpdateHandler<BotError> {
    use dptree::case;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    teloxide::filter_command::<Command, _>()
                        .branch(case![Command::Start].endpoint(start))
                        .branch(case![Command::Help].endpoint(help)),
                )
                .branch(
                    Message::filter_text()
                        .filter(|text: String| is_link_candidate(&text))
                        .endpoint(link_received),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(quality_received))
}
