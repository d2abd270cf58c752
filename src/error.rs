use std::fmt;

/// All errors produced by calpat.
///
/// Search-time impossibility ("no such instant exists") is never an error;
/// it is reported as an absent result. Errors are reserved for caller
/// mistakes: constructing a pattern with a value outside its unit's domain,
/// or handing the calculator a malformed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    /// A pattern value outside the legal domain of its unit.
    Range { message: String },

    /// A malformed calculator argument, e.g. an empty pattern collection.
    Argument { message: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { message } => write!(f, "{message}"),
            Self::Argument { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for PatternError {}

impl PatternError {
    pub fn range(message: impl Into<String>) -> Self {
        Self::Range {
            message: message.into(),
        }
    }

    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }
}
