//! # Pathscope
//!
//! Remote inspection client for Monte Carlo path-tracing renderers.
//!
//! A running render server streams, on request, per-pixel diagnostic data
//! (traced light paths, their intersections, camera and scene geometry)
//! over a private binary protocol. This crate implements the client core:
//! the wire codec, the connection/message-dispatch state machine, the data
//! model a message stream populates, and the reconstruction of sparse
//! per-intersection records into connected ray segments ready for
//! inspection. Presentation (windows, 3D viewport, plots) lives in the
//! host application and consumes this crate through its event channel and
//! data model.
//!
//! ## Modules
//!
//! - [`util`] - Error handling
//! - [`types`] - Math types, colors, tagged user-data values
//! - [`stream`] - Primitive codec and TCP transport
//! - [`protocol`] - Message headers, extensions, session engine
//! - [`model`] - Render info, camera, meshes, per-pixel render data
//! - [`paths`] - Path reconstruction into ray segments
//! - [`config`] - Explicit client configuration
//!
//! ## Example
//!
//! ```ignore
//! use pathscope::prelude::*;
//!
//! let (session, events) = Session::connect("localhost", 50013, ExtensionRegistry::new())?;
//! session.request_render_data(128, 256, 32)?;
//!
//! for event in events {
//!     if let Event::PixelData(data) = event {
//!         let paths = TracedPathSet::from_render_data(&data)?;
//!         println!("{} paths reconstructed", paths.len());
//!     }
//! }
//! ```

pub mod config;
pub mod model;
pub mod paths;
pub mod protocol;
pub mod stream;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use protocol::{Event, Session, SessionState};
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ClientConfig;
    pub use crate::model::{
        CameraData, DataModel, IntersectionData, Mesh, MeshData, PathData, RenderData, RenderInfo,
    };
    pub use crate::paths::{Intersection, Ray, RayKind, TracedPath, TracedPathSet};
    pub use crate::protocol::{
        CoreMessage, Event, Extension, ExtensionRegistry, Session, SessionState,
    };
    pub use crate::stream::{SocketStream, Stream};
    pub use crate::types::{Color3f, Point3f, Value};
    pub use crate::util::{Error, Result};
}
