//! Command interpreter - Turns chat-ops messages into bot replies

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandRegistry};
use super::parser::{self, DiceParser};

/// Trigger prefix for dice rolls, including the trailing space
pub const ROLL_TRIGGER: &str = "@roll ";

/// Stateless interpreter for commands embedded in chat messages
pub struct CommandInterpreter {
    commands: CommandRegistry,
}

impl CommandInterpreter {
    /// Interpreter with no commands; every message is plain chat
    pub fn empty() -> Self {
        Self {
            commands: CommandRegistry::new(),
        }
    }

    /// Interpreter with the default command set
    pub fn new(dice: DiceParser) -> Self {
        let mut interpreter = Self::empty();
        interpreter.register(roll_command(dice));
        interpreter
    }

    pub fn register(&mut self, command: Command) {
        self.commands.register(command);
    }

    /// Process a message body.
    ///
    /// Returns `None` for plain chat, otherwise the reply text. Command
    /// failures become `Error: ...` replies rather than being dropped.
    pub fn process(&self, body: &str) -> Option<String> {
        let (cmd, arg) = self.commands.find(body)?;
        let Some(handler) = &cmd.handler else {
            return Some(CommandError::NotImplemented(cmd.name.clone()).to_string());
        };

        let reply = match handler(arg) {
            Ok(reply) => reply,
            Err(e) => format!("Error: {}", e),
        };
        tracing::debug!("[{}] {:?} -> {}", cmd.name, arg, reply);
        Some(reply)
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new(DiceParser::default())
    }
}

fn roll_command(dice: DiceParser) -> Command {
    Command::new("roll", ROLL_TRIGGER).with_handler(move |arg| {
        let expr = dice.parse(arg)?;
        Ok(parser::roll(&expr, &mut rand::rng()).to_string())
    })
}
