//! Domain entities - Core business objects with no transport dependencies

pub mod command;
pub mod connection;
pub mod dice;
pub mod message;

pub use command::{Command, CommandHandler, CommandRegistry};
pub use connection::ConnectionId;
pub use dice::{DiceExpression, Sign};
pub use message::{ChatMessage, BOT_EMAIL, BOT_NAME};
