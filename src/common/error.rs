use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// A game invariant no longer holds. This is a programming error, the round cannot continue.
    #[error("Invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Agent not found: {id}")]
    AgentNotFound { id: usize },

    #[error("Seat not found: {id}")]
    SeatNotFound { id: usize },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DomainError {
    pub fn invariant(reason: impl Into<String>) -> Self {
        DomainError::InvariantViolation { reason: reason.into() }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Event store error: {0}")]
    EventStore(String),

    #[error("Event channel error: {0}")]
    Channel(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
