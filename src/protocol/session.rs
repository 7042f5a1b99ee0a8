//! Session lifecycle and the receive loop.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::model::{CameraData, DataModel, Mesh, RenderData, RenderInfo};
use crate::protocol::{CoreMessage, Event, ExtensionRegistry, SessionState};
use crate::stream::{SocketStream, Stream};
use crate::util::{Error, Result};

/// One inspection session against a render server.
///
/// Owns the TCP channel and the dedicated receive thread. The receive
/// thread holds the read half exclusively; all outbound requests go
/// through a mutex-guarded clone of the channel, so writes from different
/// caller threads never interleave on the wire. Responses are correlated
/// to requests purely by their header; the protocol supports a single
/// outstanding request per session and no correlation IDs.
pub struct Session {
    writer: Arc<Mutex<SocketStream>>,
    state: Arc<Mutex<SessionState>>,
    model: Arc<RwLock<DataModel>>,
    registry: Arc<Mutex<ExtensionRegistry>>,
    /// Extra channel handle used to unblock the receive thread on local
    /// shutdown.
    socket: SocketStream,
    handle: Option<JoinHandle<()>>,
}

impl Session {
    /// Open the channel to `host:port` and start the receive thread.
    ///
    /// The returned receiver delivers [`Event`]s in receive order; the
    /// first event is either [`Event::Connected`] after a successful
    /// handshake or a single [`Event::ConnectionLost`]. A connect failure
    /// returns [`Error::ConnectFailed`] and leaves nothing running; there
    /// is no automatic retry.
    pub fn connect(
        host: &str,
        port: u16,
        registry: ExtensionRegistry,
    ) -> Result<(Self, Receiver<Event>)> {
        let state = Arc::new(Mutex::new(SessionState::Connecting));
        let socket = SocketStream::connect(host, port)?;
        let reader = socket.try_clone()?;
        let writer = Arc::new(Mutex::new(socket.try_clone()?));

        *state.lock() = SessionState::AwaitingHandshake;
        let model = Arc::new(RwLock::new(DataModel::new()));
        let registry = Arc::new(Mutex::new(registry));
        let (events, receiver) = channel();

        let receive_loop = ReceiveLoop {
            stream: reader,
            writer: Arc::clone(&writer),
            events,
            model: Arc::clone(&model),
            state: Arc::clone(&state),
            registry: Arc::clone(&registry),
        };
        let handle = thread::spawn(move || receive_loop.run());

        Ok((
            Self {
                writer,
                state,
                model,
                registry,
                socket,
                handle: Some(handle),
            },
            receiver,
        ))
    }

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    /// Shared handle to the session's data model.
    ///
    /// The receive thread is the model's only writer; a reader locking
    /// after an event always sees the fully published entity.
    pub fn model(&self) -> Arc<RwLock<DataModel>> {
        Arc::clone(&self.model)
    }

    /// Request the render info package.
    pub fn request_render_info(&self) -> Result<()> {
        self.write_header(CoreMessage::RenderInfo)
    }

    /// Request the rendered image (starts the rendering process).
    pub fn request_render_image(&self) -> Result<()> {
        self.write_header(CoreMessage::ImageData)
    }

    /// Request the scene geometry; a new scene load begins, so the mesh
    /// list is cleared before the server starts streaming meshes.
    pub fn request_scene_data(&self) -> Result<()> {
        self.model.write().clear_meshes();
        self.write_header(CoreMessage::SceneData)
    }

    /// Request the render data of one pixel.
    pub fn request_render_data(&self, x: i32, y: i32, sample_count: i32) -> Result<()> {
        info!("Request pixel=({},{})", x, y);
        let mut writer = self.writer.lock();
        writer.write_u16(CoreMessage::PixelData.header())?;
        writer.write_i32(x)?;
        writer.write_i32(y)?;
        writer.write_i32(sample_count)
    }

    /// Send an edited sample count back to the server, the only
    /// render-info field the client may change.
    pub fn send_render_info(&self, sample_count: i32) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.write_u16(CoreMessage::SendRenderInfo.header())?;
        writer.write_i32(sample_count)
    }

    /// Send a request to the extension registered under `flag`; the
    /// extension writes its own payload after the header. Unregistered
    /// flags are ignored.
    pub fn request_extension(&self, flag: u16) -> Result<()> {
        let registry = self.registry.lock();
        let Some(extension) = registry.get(flag) else {
            debug!("No extension registered for flag 0x{:04x}", flag);
            return Ok(());
        };
        let mut writer = self.writer.lock();
        writer.write_u16(flag)?;
        extension.write_request(&mut *writer)
    }

    /// Ask the server for a soft disconnect; the server closes the
    /// channel, which ends the receive loop.
    pub fn disconnect(&self) -> Result<()> {
        *self.state.lock() = SessionState::Disconnecting;
        self.write_header(CoreMessage::Disconnect)
    }

    /// Tell the server the client is going away for good.
    pub fn close(&self) -> Result<()> {
        *self.state.lock() = SessionState::Disconnecting;
        self.write_header(CoreMessage::Quit)
    }

    /// Local cancellation: close the channel, unblocking any pending read,
    /// and join the receive thread.
    pub fn shutdown(&mut self) {
        self.socket.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        *self.state.lock() = SessionState::Disconnected;
    }

    fn write_header(&self, msg: CoreMessage) -> Result<()> {
        self.writer.lock().write_u16(msg.header())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Whether the receive loop keeps running after a message.
enum Flow {
    Continue,
    Stop,
}

/// The receive loop, running on its own thread per session.
struct ReceiveLoop {
    stream: SocketStream,
    writer: Arc<Mutex<SocketStream>>,
    events: Sender<Event>,
    model: Arc<RwLock<DataModel>>,
    state: Arc<Mutex<SessionState>>,
    registry: Arc<Mutex<ExtensionRegistry>>,
}

impl ReceiveLoop {
    fn run(mut self) {
        info!("Starting receive loop");

        if let Err(e) = self.handshake() {
            error!("Handshake failed: {}", e);
            *self.state.lock() = SessionState::Disconnected;
            let _ = self.events.send(Event::ConnectionLost(e.to_string()));
            return;
        }

        *self.state.lock() = SessionState::Connected;
        let _ = self.events.send(Event::Connected);

        loop {
            let header = match self.stream.read_u16() {
                Ok(header) => header,
                Err(e) => {
                    error!("Receive loop terminated: {}", e);
                    let _ = self.events.send(Event::ConnectionLost(e.to_string()));
                    break;
                }
            };

            match self.dispatch(header) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(e) => {
                    error!("Failed to handle header 0x{:04x}: {}", header, e);
                    let _ = self.events.send(Event::ConnectionLost(e.to_string()));
                    break;
                }
            }
        }

        *self.state.lock() = SessionState::Disconnected;
        info!("Receive loop stopped");
    }

    /// Blocking handshake: the server greets first, the client echoes.
    /// Anything but HELLO is fatal; the client still announces QUIT before
    /// giving up.
    fn handshake(&mut self) -> Result<()> {
        let header = self.stream.read_u16()?;
        if CoreMessage::from_u16(header) != Some(CoreMessage::Hello) {
            let _ = self.writer.lock().write_u16(CoreMessage::Quit.header());
            return Err(Error::HandshakeViolation(header));
        }
        self.writer.lock().write_u16(CoreMessage::Hello.header())?;
        Ok(())
    }

    fn dispatch(&mut self, header: u16) -> Result<Flow> {
        // extension registry first: a registered flag shadows core values
        {
            let mut registry = self.registry.lock();
            if let Some(extension) = registry.get_mut(header) {
                debug!(
                    "Header 0x{:04x} routed to extension '{}'",
                    header,
                    extension.name()
                );
                extension.read(&mut self.stream)?;
                drop(registry);
                let _ = self.events.send(Event::ExtensionUpdated(header));
                return Ok(Flow::Continue);
            }
        }

        match CoreMessage::from_u16(header) {
            Some(CoreMessage::RenderInfo) => {
                let start = Instant::now();
                let info = RenderInfo::deserialize(&mut self.stream)?;
                debug!("Deserialized render info in {:.3?}", start.elapsed());
                self.model.write().render_info = info.clone();
                let _ = self.events.send(Event::RenderInfo(info));
            }
            Some(CoreMessage::Camera) => {
                let start = Instant::now();
                let camera = CameraData::deserialize(&mut self.stream)?;
                debug!("Deserialized camera in {:.3?}", start.elapsed());
                self.model.write().camera = camera;
                let _ = self.events.send(Event::Camera(camera));
            }
            Some(CoreMessage::SceneData) => {
                let start = Instant::now();
                let mesh = Mesh::deserialize(&mut self.stream)?;
                debug!("Deserialized mesh in {:.3?}", start.elapsed());
                self.model.write().meshes.push(mesh.clone());
                let _ = self.events.send(Event::MeshAdded(mesh));
            }
            Some(CoreMessage::ImageData) => {
                let _ = self.events.send(Event::RenderImageReady);
            }
            Some(CoreMessage::PixelData) => {
                let start = Instant::now();
                let data = RenderData::deserialize(&mut self.stream)?;
                debug!("Deserialized render data in {:.3?}", start.elapsed());
                self.model.write().render_data = data.clone();
                let _ = self.events.send(Event::PixelData(data));
            }
            Some(CoreMessage::NoValidData) => {
                let _ = self.events.send(Event::NoValidData);
            }
            Some(CoreMessage::Disconnect) => {
                info!("Server requested disconnect");
                let _ = self.events.send(Event::Disconnected);
                self.stream.shutdown();
                return Ok(Flow::Stop);
            }
            Some(CoreMessage::Quit) => {
                info!("Server quit");
                let _ = self.events.send(Event::Quit);
                return Ok(Flow::Stop);
            }
            Some(CoreMessage::Hello) | Some(CoreMessage::SendRenderInfo) | None => {
                // unknown or out-of-place header: skip for forward
                // compatibility
                debug!("Ignoring header 0x{:04x}", header);
            }
        }

        Ok(Flow::Continue)
    }
}
