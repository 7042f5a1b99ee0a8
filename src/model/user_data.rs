//! Server-defined user data attached to paths and intersections.
//!
//! Render integrators can tag every path and every intersection with named
//! diagnostic values (a BSDF pdf, a sampled direction, a debug color, ...).
//! The set of names is open; the client preserves everything it receives,
//! in wire order, for the inspection views.

use crate::stream::Stream;
use crate::types::Value;
use crate::util::Result;

/// One opaque, extension-defined data block inside a user data bag.
///
/// Blocks the client has no interpreter for are still carried verbatim so
/// downstream tools can decode them.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomBlock {
    pub id: u16,
    pub name: String,
    pub data: Vec<u8>,
}

/// Ordered bag of named diagnostic values.
///
/// Each name maps to a small list of values of one type; the wire carries
/// ten typed sections in a fixed order, then the custom blocks. Insertion
/// order is preserved so inspection views render deterministically.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserData {
    entries: Vec<(String, Vec<Value>)>,
    custom: Vec<CustomBlock>,
}

impl UserData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one bag from the stream.
    pub fn deserialize<S: Stream + ?Sized>(stream: &mut S) -> Result<Self> {
        let mut bag = Self::default();
        bag.read_section(stream, |s| Ok(Value::Bool(s.read_bool()?)))?;
        bag.read_section(stream, |s| Ok(Value::Float(s.read_f32()?)))?;
        bag.read_section(stream, |s| Ok(Value::Double(s.read_f64()?)))?;
        bag.read_section(stream, |s| Ok(Value::Int(s.read_i32()?)))?;
        bag.read_section(stream, |s| Ok(Value::Point2i(s.read_point2i()?)))?;
        bag.read_section(stream, |s| Ok(Value::Point2f(s.read_point2f()?)))?;
        bag.read_section(stream, |s| Ok(Value::Point3i(s.read_point3i()?)))?;
        bag.read_section(stream, |s| Ok(Value::Point3f(s.read_point3f()?)))?;
        bag.read_section(stream, |s| Ok(Value::Color3f(s.read_color3f()?)))?;
        bag.read_section(stream, |s| Ok(Value::String(s.read_string()?)))?;
        bag.read_custom(stream)?;
        Ok(bag)
    }

    /// Read one typed section: entry count, then (name, list) pairs.
    fn read_section<S: Stream + ?Sized>(
        &mut self,
        stream: &mut S,
        read_value: impl Fn(&mut S) -> Result<Value>,
    ) -> Result<()> {
        let entry_count = stream.read_u32()?;
        for _ in 0..entry_count {
            let name = stream.read_string()?;
            let list_len = stream.read_u32()?;
            let mut values = Vec::with_capacity(list_len as usize);
            for _ in 0..list_len {
                values.push(read_value(stream)?);
            }
            self.entries.push((name, values));
        }
        Ok(())
    }

    fn read_custom<S: Stream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        let block_count = stream.read_u32()?;
        for _ in 0..block_count {
            let id = stream.read_u16()?;
            let name = stream.read_string()?;
            let len = stream.read_u32()? as usize;
            let mut data = vec![0u8; len];
            stream.read(&mut data)?;
            self.custom.push(CustomBlock { id, name, data });
        }
        Ok(())
    }

    /// All named entries, in wire order.
    pub fn entries(&self) -> &[(String, Vec<Value>)] {
        &self.entries
    }

    /// Look up one entry's value list by name.
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Opaque custom blocks, in wire order.
    pub fn custom_blocks(&self) -> &[CustomBlock] {
        &self.custom
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.custom.is_empty()
    }
}
