use rdpanel_api_client::ApiError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("A one-time code is required, retry with --code")]
    SecondFactorRequired,

    #[error("Login failed: {}", .0)]
    LoginRejected(String),

    #[error("{}", .0)]
    Api(#[from] ApiError),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("Json::{:?}: {}", .0, .0)]
    Json(#[from] serde_json::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::SecondFactorRequired => 2,
            _ => 1,
        }
    }
}
