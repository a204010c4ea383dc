//! Chat-ops handling - Dice parsing and command interpretation

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{CommandInterpreter, ROLL_TRIGGER};
pub use parser::{DiceParser, DEFAULT_MAX_COUNT};
