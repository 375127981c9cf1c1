use thiserror::Error;

use crate::{input::InputSource, parse::ParseError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input source '{0}'")]
    InvalidInputSource(String),
    #[error("{0}")]
    PlatformUnavailable(String),
    #[error("{call} failed: {message}")]
    PlatformCall { call: &'static str, message: String },
    #[error("monitor doesn't advertise input {input} (advertised values: {advertised:02X?})")]
    InputNotAdvertised {
        input: InputSource,
        advertised: Vec<u8>,
    },
    #[error("failed to parse capabilities string")]
    Capabilities(#[from] ParseError),
}

impl Error {
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn platform_call(
        call: &'static str,
        message: impl ToString,
    ) -> Error {
        Error::PlatformCall {
            call,
            message: message.to_string(),
        }
    }
}
