use std::fmt;

pub const UNREACHABLE_MESSAGE: &str =
    "No response received from server. Please check your network connection.";
pub const GENERIC_REJECTION_MESSAGE: &str = "An error occurred with the API";

/// Coarse error categories a view can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Rejected,
    Unreachable,
    Client,
    InvalidResponse,
}

/// Errors surfaced by the job service client and the collection controller
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Required field missing or malformed; nothing was sent
    Validation(String),

    /// The server answered with a non-success status
    Rejected { status: u16, message: String },

    /// No response came back
    Unreachable(String),

    /// The request could not be built
    Client(String),

    /// A success status whose body could not be decoded
    InvalidResponse(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Rejected { .. } => ErrorKind::Rejected,
            ClientError::Unreachable(_) => ErrorKind::Unreachable,
            ClientError::Client(_) => ErrorKind::Client,
            ClientError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }

    /// The message a view shows to the user
    pub fn message(&self) -> &str {
        match self {
            ClientError::Validation(msg)
            | ClientError::Unreachable(msg)
            | ClientError::Client(msg)
            | ClientError::InvalidResponse(msg) => msg,
            ClientError::Rejected { message, .. } => message,
        }
    }

    pub fn unreachable() -> Self {
        ClientError::Unreachable(UNREACHABLE_MESSAGE.to_string())
    }

    pub fn client(detail: impl fmt::Display) -> Self {
        ClientError::Client(format!("Error setting up request: {}", detail))
    }

    pub fn from_validation(errors: &validator::ValidationErrors) -> Self {
        ClientError::Validation(crate::api::validation_messages(errors).join("; "))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ClientError::Rejected { status, message } => write!(f, "{} (HTTP {})", message, status),
            ClientError::Unreachable(msg) => f.write_str(msg),
            ClientError::Client(msg) => f.write_str(msg),
            ClientError::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::client(err)
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if err.is_status() {
            ClientError::Rejected {
                status: err.status().map(|s| s.as_u16()).unwrap_or(500),
                message: GENERIC_REJECTION_MESSAGE.to_string(),
            }
        } else {
            // connect, timeout and body errors all mean no usable response arrived
            ClientError::unreachable()
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
