use thiserror::Error;

use crate::request::MAX_URL_LEN;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("only HTTP is directly supported, set --proxy for other schemes")]
    UnsupportedScheme,

    #[error("URL is too long ({0} bytes, limit {MAX_URL_LEN})")]
    UrlTooLong(usize),

    #[error("bad parameter: {0}")]
    BadParameter(String),

    #[error("connect to {host}:{port} failed: {source}")]
    ServerUnreachable {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// The pre-run reachability probe could not connect.
    ServerUnreachable = 1,

    /// Invalid CLI input, including URL validation failures.
    BadParameter = 2,

    /// Worker spawn/collection failed; partial results are never reported.
    InternalError = 3,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&BenchError> for ExitCode {
    fn from(err: &BenchError) -> Self {
        match err {
            BenchError::InvalidUrl(_)
            | BenchError::UnsupportedScheme
            | BenchError::UrlTooLong(_)
            | BenchError::BadParameter(_) => ExitCode::BadParameter,
            BenchError::ServerUnreachable { .. } => ExitCode::ServerUnreachable,
            BenchError::Internal(_) => ExitCode::InternalError,
        }
    }
}
