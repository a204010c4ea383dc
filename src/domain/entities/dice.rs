use std::fmt;

/// Sign token captured in front of a dice modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn as_char(&self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

/// Parsed `[N]dM[+|-][K]` expression.
///
/// `count` and `modifier` are left as `None` when absent so callers can tell
/// "omitted" apart from an explicit value; the evaluator applies the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceExpression {
    pub count: Option<u64>,
    pub sides: u64,
    pub sign: Option<Sign>,
    pub modifier: Option<u64>,
}

impl DiceExpression {
    pub fn count_or_default(&self) -> u64 {
        self.count.unwrap_or(1)
    }

    pub fn modifier_or_default(&self) -> u64 {
        self.modifier.unwrap_or(0)
    }

    /// Smallest total this expression can produce
    pub fn min_total(&self) -> u64 {
        self.count_or_default()
            .saturating_add(self.modifier_or_default())
    }

    /// Largest total this expression can produce
    pub fn max_total(&self) -> u64 {
        self.count_or_default()
            .saturating_mul(self.sides)
            .saturating_add(self.modifier_or_default())
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(count) = self.count {
            write!(f, "{}", count)?;
        }
        write!(f, "d{}", self.sides)?;
        if let Some(sign) = self.sign {
            write!(f, "{}", sign.as_char())?;
        }
        if let Some(modifier) = self.modifier {
            write!(f, "{}", modifier)?;
        }
        Ok(())
    }
}
