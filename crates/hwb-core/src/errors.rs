/// Core error type for the homework status bot.
///
/// Adapter crates map their transport errors into this type so the poll loop
/// can decide what is fatal and what only ends the current cycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot reach homework api: {0}")]
    Connectivity(String),

    #[error("homework api {endpoint} answered with status {status}")]
    UnexpectedResponse { status: u16, endpoint: String },

    #[error("malformed api response: {0}")]
    MalformedResponse(String),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("message delivery failed: {0}")]
    Delivery(String),
}

/// How far an error is allowed to propagate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Stops the process before the poll loop starts.
    StartupFatal,
    /// Ends the current cycle; the loop sleeps and tries again.
    CycleRecoverable,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::StartupFatal,
            Error::Connectivity(_)
            | Error::UnexpectedResponse { .. }
            | Error::MalformedResponse(_)
            | Error::UnknownStatus(_)
            | Error::Delivery(_) => ErrorKind::CycleRecoverable,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
