//! Per-pixel render data: all paths traced through one pixel.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::PathData;
use crate::stream::Stream;
use crate::util::Result;

/// The result of one "render this pixel" round trip: the sample count the
/// server actually used and one [`PathData`] per traced path, keyed by
/// sample index.
///
/// A `sample_count` of zero marks the whole set invalid; it must not be
/// reconstructed or displayed. Each pixel-data message replaces the
/// previous set wholesale, never merges into it.
#[derive(Clone, Debug, Default)]
pub struct RenderData {
    sample_count: u32,
    paths: BTreeMap<i32, PathData>,
}

impl RenderData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one pixel-data payload from the stream.
    pub fn deserialize<S: Stream + ?Sized>(stream: &mut S) -> Result<Self> {
        let sample_count = stream.read_u32()?;
        debug!("Render data sample count: {}", sample_count);

        let mut paths = BTreeMap::new();
        for _ in 0..sample_count {
            let path = PathData::deserialize(stream)?;
            paths.insert(path.sample_idx, path);
        }

        Ok(Self {
            sample_count,
            paths,
        })
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Whether the set may be reconstructed and displayed.
    pub fn is_valid(&self) -> bool {
        self.sample_count != 0
    }

    pub fn paths(&self) -> &BTreeMap<i32, PathData> {
        &self.paths
    }

    pub fn get_path(&self, sample_idx: i32) -> Option<&PathData> {
        self.paths.get(&sample_idx)
    }

    /// All path indices in ascending order.
    pub fn indices(&self) -> Vec<i32> {
        self.paths.keys().copied().collect()
    }

    pub fn clear(&mut self) {
        self.sample_count = 0;
        self.paths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::testing::MemStream;
    use crate::types::Point3f;

    fn write_empty_bag(s: &mut MemStream) {
        for _ in 0..11 {
            s.write_u32(0).unwrap();
        }
    }

    fn write_minimal_path(s: &mut MemStream, sample_idx: i32) {
        write_empty_bag(s);
        s.write_i32(sample_idx).unwrap();
        s.write_i32(1).unwrap();
        s.write_point3f(Point3f::ZERO).unwrap();
        s.write_bool(false).unwrap(); // no final estimate
        s.write_bool(true).unwrap();
        s.write_bool(false).unwrap();
        s.write_u32(0).unwrap(); // no intersections
    }

    #[test]
    fn test_deserialize_two_paths() {
        let mut s = MemStream::new();
        s.write_u32(2).unwrap();
        write_minimal_path(&mut s, 0);
        write_minimal_path(&mut s, 1);

        let data = RenderData::deserialize(&mut s).unwrap();
        assert!(data.is_valid());
        assert_eq!(data.sample_count(), 2);
        assert_eq!(data.indices(), vec![0, 1]);
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn test_zero_sample_count_is_invalid() {
        let mut s = MemStream::new();
        s.write_u32(0).unwrap();
        let data = RenderData::deserialize(&mut s).unwrap();
        assert!(!data.is_valid());
        assert!(data.paths().is_empty());
    }
}
