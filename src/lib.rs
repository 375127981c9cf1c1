//! Switches a monitor's video input with the MCCS input select VCP code
//! (0x60) over DDC/CI.

pub mod cap;
pub mod cli;
mod error;
pub mod fmt;
pub mod input;
pub mod monitor;
mod parse;
mod token;

#[cfg(windows)]
#[path = "windows.rs"]
pub mod platform;

#[cfg(not(windows))]
#[path = "unsupported.rs"]
pub mod platform;

pub use error::{Error, Result};
pub use input::{resolve_code, InputSource};
pub use parse::ParseError;
pub use token::Token;
