//! One traced path through the selected pixel.

use std::collections::BTreeMap;

use crate::model::{IntersectionData, UserData};
use crate::stream::Stream;
use crate::types::{Color3f, Point3f};
use crate::util::Result;

/// Sentinel depth for paths the server marked invalid.
pub const INVALID_DEPTH: i32 = -1;

/// One traced light path: its origin, its per-bounce intersection records
/// keyed by depth index, and the user data the integrator attached.
///
/// Intersection keys are unique within a path; the start key is whichever
/// index appears first in ascending order, not necessarily 0 or 1. A key
/// missing from the map means "no such vertex", never "vertex at zero".
#[derive(Clone, Debug, PartialEq)]
pub struct PathData {
    pub user_data: UserData,
    pub sample_idx: i32,
    /// Bounce count; [`INVALID_DEPTH`] marks an invalid path.
    pub path_depth: i32,
    pub origin: Point3f,
    /// Final radiance estimate; absent for paths the server dropped.
    pub final_estimate: Option<Color3f>,
    pub show_path: bool,
    pub show_ne: bool,
    pub intersections: BTreeMap<i32, IntersectionData>,
}

impl Default for PathData {
    fn default() -> Self {
        Self {
            user_data: UserData::default(),
            sample_idx: -1,
            path_depth: INVALID_DEPTH,
            origin: Point3f::ZERO,
            final_estimate: None,
            show_path: false,
            show_ne: false,
            intersections: BTreeMap::new(),
        }
    }
}

impl PathData {
    /// Read one path from the stream.
    pub fn deserialize<S: Stream + ?Sized>(stream: &mut S) -> Result<Self> {
        let user_data = UserData::deserialize(stream)?;
        let sample_idx = stream.read_i32()?;
        let path_depth = stream.read_i32()?;
        let origin = stream.read_point3f()?;

        let final_estimate = if stream.read_bool()? {
            Some(stream.read_color3f()?)
        } else {
            None
        };

        let show_path = stream.read_bool()?;
        let show_ne = stream.read_bool()?;

        let mut intersections = BTreeMap::new();
        let intersection_count = stream.read_u32()?;
        for _ in 0..intersection_count {
            let index = stream.read_i32()?;
            let record = IntersectionData::deserialize(stream)?;
            intersections.insert(index, record);
        }

        Ok(Self {
            user_data,
            sample_idx,
            path_depth,
            origin,
            final_estimate,
            show_path,
            show_ne,
            intersections,
        })
    }

    /// Whether the server assigned this path a real depth.
    pub fn valid_depth(&self) -> bool {
        self.path_depth != INVALID_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::testing::MemStream;

    fn write_empty_bag(s: &mut MemStream) {
        for _ in 0..11 {
            s.write_u32(0).unwrap();
        }
    }

    #[test]
    fn test_deserialize_keys_by_outer_index() {
        let mut s = MemStream::new();
        write_empty_bag(&mut s);
        s.write_i32(7).unwrap(); // sample index
        s.write_i32(2).unwrap(); // depth
        s.write_point3f(Point3f::new(0.0, 0.0, 0.0)).unwrap();
        s.write_bool(true).unwrap();
        s.write_color3f(Color3f::new(1.0, 1.0, 1.0, 1.0)).unwrap();
        s.write_bool(true).unwrap(); // show_path
        s.write_bool(false).unwrap(); // show_ne
        s.write_u32(1).unwrap(); // one intersection, keyed 1
        s.write_i32(1).unwrap();
        write_empty_bag(&mut s);
        s.write_i32(1).unwrap();
        s.write_bool(true).unwrap();
        s.write_point3f(Point3f::new(0.0, 0.0, 1.0)).unwrap();
        s.write_bool(false).unwrap();
        s.write_bool(false).unwrap();
        s.write_bool(false).unwrap();

        let path = PathData::deserialize(&mut s).unwrap();
        assert_eq!(path.sample_idx, 7);
        assert!(path.valid_depth());
        assert_eq!(path.final_estimate, Some(Color3f::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(path.intersections.len(), 1);
        assert_eq!(
            path.intersections[&1].pos,
            Some(Point3f::new(0.0, 0.0, 1.0))
        );
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn test_invalid_depth_sentinel() {
        let path = PathData::default();
        assert!(!path.valid_depth());
    }
}
