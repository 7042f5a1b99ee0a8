//! Core protocol message headers.

/// Fixed set of message headers understood by every server.
///
/// Extension flags live in the same 16-bit space; the receive loop checks
/// the extension registry before this enum, and anything matching neither
/// is skipped for forward compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CoreMessage {
    /// Handshake greeting, sent by the server first and echoed back.
    Hello = 0x0001,
    /// Render info payload (inbound) / render info request (outbound).
    RenderInfo = 0x000a,
    /// Client sends an edited sample count back to the server.
    SendRenderInfo = 0x000b,
    /// The rendered image is ready on the server side.
    ImageData = 0x000d,
    /// Per-pixel render data payload / request.
    PixelData = 0x000e,
    /// One scene mesh payload / scene data request.
    SceneData = 0x000f,
    /// Camera payload.
    Camera = 0x0010,
    /// The requested pixel has no usable data.
    NoValidData = 0x01a4,
    /// Soft disconnect; the server closes the channel afterwards.
    Disconnect = 0x1bcc,
    /// Hard quit; ends the session on both sides.
    Quit = 0x1bcd,
}

impl CoreMessage {
    /// Look up a received header in the core set.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0001 => Some(Self::Hello),
            0x000a => Some(Self::RenderInfo),
            0x000b => Some(Self::SendRenderInfo),
            0x000d => Some(Self::ImageData),
            0x000e => Some(Self::PixelData),
            0x000f => Some(Self::SceneData),
            0x0010 => Some(Self::Camera),
            0x01a4 => Some(Self::NoValidData),
            0x1bcc => Some(Self::Disconnect),
            0x1bcd => Some(Self::Quit),
            _ => None,
        }
    }

    /// The wire value of this header.
    #[inline]
    pub fn header(self) -> u16 {
        self as u16
    }
}
