//! Wire protocol engine: message headers, dispatch, session lifecycle.
//!
//! Every message on the wire starts with a 16-bit header. Two namespaces
//! share that space: the fixed [`CoreMessage`] set and an open set of
//! extension flags chosen by server-side extensions. Dispatch consults the
//! extension registry first, so an extension flag shadows any core value.
//!
//! A [`Session`] owns the TCP channel and a dedicated receive thread; all
//! deserialized entities are published to the shared
//! [`DataModel`](crate::model::DataModel) and announced over an ordered
//! [`Event`] channel, strictly after their deserialize completes.

mod event;
mod extension;
mod message;
mod session;

pub use event::{Event, SessionState};
pub use extension::{Extension, ExtensionRegistry};
pub use message::CoreMessage;
pub use session::Session;
