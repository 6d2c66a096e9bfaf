//! Configured trigger-word and command response tables.
//!
//! Both tables come from the settings file. A reply is chosen at random
//! among the configured variants, with `%name%` replaced by the sender's
//! first name.

use rand::Rng;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Responses {
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub commands: Vec<CommandReply>,
}

/// Case-insensitive substring patterns and their reply pool.
#[derive(Clone, Debug, Deserialize)]
pub struct Trigger {
    pub patterns: Vec<String>,
    pub replies: Vec<String>,
}

/// Static-response commands (e.g. `/info`), possibly under several names.
#[derive(Clone, Debug, Deserialize)]
pub struct CommandReply {
    pub names: Vec<String>,
    pub replies: Vec<String>,
}

impl Responses {
    /// Reply for the first trigger whose pattern occurs in `text`.
    pub fn trigger_reply(&self, text: &str, first_name: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        let trigger = self.triggers.iter().find(|trigger| {
            trigger
                .patterns
                .iter()
                .any(|pattern| lowered.contains(&pattern.to_lowercase()))
        })?;
        pick(&trigger.replies).map(|reply| personalize(reply, first_name))
    }

    /// Reply for a configured command name (without the leading slash).
    pub fn command_reply(&self, name: &str, first_name: &str) -> Option<String> {
        let command = self
            .commands
            .iter()
            .find(|command| command.names.iter().any(|n| n.eq_ignore_ascii_case(name)))?;
        pick(&command.replies).map(|reply| personalize(reply, first_name))
    }
}

fn pick(replies: &[String]) -> Option<&String> {
    if replies.is_empty() {
        return None;
    }
    Some(&replies[rand::thread_rng().gen_range(0..replies.len())])
}

fn personalize(reply: &str, first_name: &str) -> String {
    reply.replace("%name%", first_name)
}
