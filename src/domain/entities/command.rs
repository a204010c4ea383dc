use std::collections::HashMap;

use crate::application::errors::CommandError;

/// A chat-ops command recognised by a literal trigger at the start of a message
pub struct Command {
    pub name: String,
    pub trigger: String,
    pub handler: Option<CommandHandler>,
}

/// Command handler function type; receives the text after the trigger
pub type CommandHandler = Box<dyn Fn(&str) -> Result<String, CommandError> + Send + Sync>;

impl Command {
    pub fn new(name: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger: trigger.into(),
            handler: None,
        }
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Returns the argument if `body` starts with this command's trigger.
    /// Matching is case-sensitive and exact.
    pub fn argument<'a>(&self, body: &'a str) -> Option<&'a str> {
        body.strip_prefix(self.trigger.as_str())
    }
}

/// Command registry for managing available commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    /// Find the command triggered by `body`, with its argument.
    ///
    /// When several triggers match, the longest one wins.
    pub fn find<'a>(&self, body: &'a str) -> Option<(&Command, &'a str)> {
        self.commands
            .values()
            .filter_map(|cmd| cmd.argument(body).map(|arg| (cmd, arg)))
            .max_by_key(|(cmd, _)| cmd.trigger.len())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
