//! Events delivered from the protocol engine to its collaborators.

use crate::model::{CameraData, Mesh, RenderData, RenderInfo};

/// Connection lifecycle of one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    AwaitingHandshake,
    Connected,
    Disconnecting,
}

/// One notification from the receive loop.
///
/// Events are delivered in receive order over an mpsc channel, and only
/// after the corresponding message was fully deserialized, so a
/// collaborator never observes a half-parsed entity. Fatal conditions
/// produce exactly one [`Event::ConnectionLost`].
#[derive(Debug)]
pub enum Event {
    /// Handshake completed; the session is live.
    Connected,
    /// A render-info payload arrived.
    RenderInfo(RenderInfo),
    /// A camera payload arrived.
    Camera(CameraData),
    /// One scene mesh arrived and was appended to the model.
    MeshAdded(Mesh),
    /// The server finished rendering the image.
    RenderImageReady,
    /// A pixel-data payload arrived and replaced the model's render data.
    PixelData(RenderData),
    /// The server has no usable data for the requested pixel.
    NoValidData,
    /// A registered extension consumed a message.
    ExtensionUpdated(u16),
    /// The server asked for a soft disconnect.
    Disconnected,
    /// The server ended the session.
    Quit,
    /// The session died: handshake violation or broken channel.
    ConnectionLost(String),
}
