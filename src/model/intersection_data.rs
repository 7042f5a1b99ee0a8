//! One intersection record of a traced path.

use crate::model::UserData;
use crate::stream::Stream;
use crate::types::{Color3f, Point3f};
use crate::util::Result;

/// Everything the server recorded about one bounce of one path.
///
/// Every field except the depth index is guarded by its own presence flag
/// on the wire; absence is a normal, frequent state. A record with no
/// position is a vertex the server never resolved against geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntersectionData {
    pub user_data: UserData,
    /// Depth of this bounce along its path.
    pub depth_idx: i32,
    /// Intersection position, if the server resolved one.
    pub pos: Option<Point3f>,
    /// Next-event-estimation target position.
    pub pos_ne: Option<Point3f>,
    /// Whether the next-event sample was occluded; meaningful only when
    /// `pos_ne` is set.
    pub ne_occluded: bool,
    /// Direction resolved against the environment map, as a position.
    pub pos_envmap: Option<Point3f>,
    /// Radiance estimate at this intersection.
    pub li: Option<Color3f>,
}

impl IntersectionData {
    /// Read one intersection record from the stream.
    pub fn deserialize<S: Stream + ?Sized>(stream: &mut S) -> Result<Self> {
        let user_data = UserData::deserialize(stream)?;
        let depth_idx = stream.read_i32()?;

        let pos = if stream.read_bool()? {
            Some(stream.read_point3f()?)
        } else {
            None
        };

        let (pos_ne, ne_occluded) = if stream.read_bool()? {
            (Some(stream.read_point3f()?), stream.read_bool()?)
        } else {
            (None, false)
        };

        let pos_envmap = if stream.read_bool()? {
            Some(stream.read_point3f()?)
        } else {
            None
        };

        let li = if stream.read_bool()? {
            Some(stream.read_color3f()?)
        } else {
            None
        };

        Ok(Self {
            user_data,
            depth_idx,
            pos,
            pos_ne,
            ne_occluded,
            pos_envmap,
            li,
        })
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
    fn test_all_fields_absent() {
        let mut s = MemStream::new();
        write_empty_bag(&mut s);
        s.write_i32(2).unwrap();
        for _ in 0..4 {
            s.write_bool(false).unwrap();
        }

        let rec = IntersectionData::deserialize(&mut s).unwrap();
        assert_eq!(rec.depth_idx, 2);
        assert!(rec.pos.is_none());
        assert!(rec.pos_ne.is_none());
        assert!(rec.pos_envmap.is_none());
        assert!(rec.li.is_none());
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn test_all_fields_present() {
        let mut s = MemStream::new();
        write_empty_bag(&mut s);
        s.write_i32(1).unwrap();
        s.write_bool(true).unwrap();
        s.write_point3f(Point3f::new(0.0, 0.0, 1.0)).unwrap();
        s.write_bool(true).unwrap();
        s.write_point3f(Point3f::new(0.0, 2.0, 0.0)).unwrap();
        s.write_bool(true).unwrap(); // occluded
        s.write_bool(true).unwrap();
        s.write_point3f(Point3f::new(9.0, 9.0, 9.0)).unwrap();
        s.write_bool(true).unwrap();
        s.write_color3f(Color3f::new(0.2, 0.4, 0.8, 1.0)).unwrap();

        let rec = IntersectionData::deserialize(&mut s).unwrap();
        assert_eq!(rec.pos, Some(Point3f::new(0.0, 0.0, 1.0)));
        assert_eq!(rec.pos_ne, Some(Point3f::new(0.0, 2.0, 0.0)));
        assert!(rec.ne_occluded);
        assert_eq!(rec.pos_envmap, Some(Point3f::new(9.0, 9.0, 9.0)));
        assert_eq!(rec.li, Some(Color3f::new(0.2, 0.4, 0.8, 1.0)));
    }
}
