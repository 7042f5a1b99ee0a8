//! TCP byte channel to the render server.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::{debug, info};

use super::Stream;
use crate::util::{Error, Result};

/// Blocking TCP implementation of [`Stream`].
///
/// The read half is owned exclusively by the session's receive thread;
/// writers operate on a [`try_clone`](SocketStream::try_clone)d handle
/// behind a mutex. Neither side uses timeouts: a stalled read blocks until
/// the remote closes the channel or [`shutdown`](SocketStream::shutdown)
/// unblocks it with an error.
pub struct SocketStream {
    inner: TcpStream,
}

impl SocketStream {
    /// Open the byte channel to `host:port`.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        info!("Connecting to {}:{}", host, port);
        let inner = TcpStream::connect((host, port)).map_err(|source| Error::ConnectFailed {
            host: host.to_string(),
            port,
            source,
        })?;
        Ok(Self { inner })
    }

    /// Wrap an already-connected TCP stream.
    pub fn from_tcp(inner: TcpStream) -> Self {
        Self { inner }
    }

    /// Clone the channel handle; both handles address the same connection.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            inner: self.inner.try_clone()?,
        })
    }

    /// Shut down both directions, unblocking any pending read.
    pub fn shutdown(&self) {
        debug!("Shutting down socket");
        let _ = self.inner.shutdown(Shutdown::Both);
    }
}

/// Map channel-teardown I/O errors onto [`Error::ConnectionClosed`].
fn map_io(e: std::io::Error) -> Error {
    use std::io::ErrorKind;
    match e.kind() {
        ErrorKind::UnexpectedEof
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::NotConnected => Error::ConnectionClosed,
        _ => Error::Io(e),
    }
}

impl Stream for SocketStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(map_io)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data).map_err(map_io)
    }
}
