//! Pluggable message handlers keyed by extension flag.

use std::collections::BTreeMap;

use tracing::warn;

use crate::stream::Stream;
use crate::util::Result;

/// A pluggable protocol extension.
///
/// Server-side extensions pick an arbitrary 16-bit flag and stream their
/// own payloads under it. A client-side counterpart implements this trait
/// and registers under the same flag; the receive loop then routes every
/// message with that header to [`read`](Extension::read). Registration is
/// explicit; there is no discovery mechanism.
pub trait Extension: Send {
    /// The 16-bit header this extension owns.
    fn flag(&self) -> u16;

    /// Human-readable name for logging and UI.
    fn name(&self) -> &str;

    /// Consume one update message from the server.
    fn read(&mut self, stream: &mut dyn Stream) -> Result<()>;

    /// Write the request payload that follows the flag header.
    ///
    /// The default request carries no payload.
    fn write_request(&self, stream: &mut dyn Stream) -> Result<()> {
        let _ = stream;
        Ok(())
    }
}

/// Registry mapping extension flags to their handlers.
///
/// Consulted before the core message set during dispatch, so a registered
/// flag shadows any core header value.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<u16, Box<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension under its flag, replacing any previous one.
    pub fn register(&mut self, extension: Box<dyn Extension>) {
        let flag = extension.flag();
        if let Some(previous) = self.extensions.insert(flag, extension) {
            warn!(
                "Extension flag 0x{:04x} re-registered, replacing '{}'",
                flag,
                previous.name()
            );
        }
    }

    pub fn get(&self, flag: u16) -> Option<&dyn Extension> {
        self.extensions.get(&flag).map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, flag: u16) -> Option<&mut Box<dyn Extension>> {
        self.extensions.get_mut(&flag)
    }

    pub fn contains(&self, flag: u16) -> bool {
        self.extensions.contains_key(&flag)
    }

    /// All registered flags in ascending order.
    pub fn flags(&self) -> Vec<u16> {
        self.extensions.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        flag: u16,
        reads: usize,
    }

    impl Extension for Dummy {
        fn flag(&self) -> u16 {
            self.flag
        }

        fn name(&self) -> &str {
            "dummy"
        }

        fn read(&mut self, _stream: &mut dyn Stream) -> Result<()> {
            self.reads += 1;
            Ok(())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        registry.register(Box::new(Dummy { flag: 0x0100, reads: 0 }));
        registry.register(Box::new(Dummy { flag: 0x0200, reads: 0 }));

        assert!(registry.contains(0x0100));
        assert!(!registry.contains(0x0300));
        assert_eq!(registry.flags(), vec![0x0100, 0x0200]);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = ExtensionRegistry::new();
        registry.register(Box::new(Dummy { flag: 0x0100, reads: 0 }));
        registry.register(Box::new(Dummy { flag: 0x0100, reads: 0 }));
        assert_eq!(registry.flags(), vec![0x0100]);
    }
}
