use std::io;

/// Internal error type. Never serialized to the wire directly; command
/// handlers produce the exact `-ERR ...` reply strings the protocol
/// requires. This type is only for the seams that can't be expressed as a
/// RESP reply (a malformed frame, a socket fault).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
