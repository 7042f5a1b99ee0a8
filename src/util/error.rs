//! Error types for the pathscope client.

use thiserror::Error;

/// Main error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Opening the TCP channel to the render server failed
    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The first message after connect was not the HELLO header
    #[error("Handshake violation: expected HELLO, received header 0x{0:04x}")]
    HandshakeViolation(u16),

    /// The byte channel closed or broke during a read or write
    #[error("Connection closed by remote")]
    ConnectionClosed,

    /// A pixel-data response carried a sample count of zero
    #[error("Render data set is invalid (sample count is 0)")]
    InvalidDataSet,

    /// I/O error on the underlying channel
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error in a wire string
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
