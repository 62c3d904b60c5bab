use std::fmt;
use thiserror::Error;

/// Remote operation a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Update,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Update => "update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum HabitError {
    /// Transport failure or non-success status. All of them collapse here.
    #[error("remote {operation} failed: {reason}")]
    Remote { operation: Operation, reason: String },
    #[error("malformed {operation} response: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid habit: {0}")]
    InvalidHabit(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HabitError {
    pub fn remote(operation: Operation, reason: impl fmt::Display) -> Self {
        Self::Remote {
            operation,
            reason: reason.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidHabit(message.into())
    }

    /// The remote operation that failed, if the error came from the network side.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            HabitError::Remote { operation, .. } | HabitError::Decode { operation, .. } => {
                Some(*operation)
            }
            HabitError::InvalidHabit(_) | HabitError::Config(_) => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, HabitError::Remote { .. })
    }
}

pub type HabitResult<T> = Result<T, HabitError>;
