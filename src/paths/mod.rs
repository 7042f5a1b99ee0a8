//! Reconstruction of traced paths into connected ray segments.
//!
//! The server sends a sparse, index-keyed record of per-intersection
//! events ([`IntersectionData`]); the inspection views need a connected
//! set of directed segments. [`reconstruct`] bridges the two: one linear
//! pass over a path's record map produces, per resolved intersection, an
//! incoming ray, an intersection marker, an optional outgoing ray and an
//! optional next-event-estimation ray.
//!
//! Reconstruction is a pure function of its inputs. The whole result set
//! is regenerated from scratch whenever traced paths are (re)loaded; it is
//! never patched in place.

use std::collections::BTreeMap;

use crate::model::{IntersectionData, PathData, RenderData};
use crate::types::Point3f;
use crate::util::{Error, Result};

/// What a ray segment represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayKind {
    /// Segment between two resolved intersections (or origin and first).
    Path,
    /// Next-event-estimation sample towards a light.
    NextEvent,
    /// Segment that left the scene and resolved against the environment
    /// map.
    Envmap,
}

/// One directed segment of a reconstructed path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub start: Point3f,
    pub end: Point3f,
    pub kind: RayKind,
    /// Only meaningful for [`RayKind::NextEvent`] segments.
    pub occluded: bool,
}

impl Ray {
    fn path(start: Point3f, end: Point3f) -> Self {
        Self {
            start,
            end,
            kind: RayKind::Path,
            occluded: false,
        }
    }

    fn envmap(start: Point3f, end: Point3f) -> Self {
        Self {
            start,
            end,
            kind: RayKind::Envmap,
            occluded: false,
        }
    }

    fn next_event(start: Point3f, end: Point3f, occluded: bool) -> Self {
        Self {
            start,
            end,
            kind: RayKind::NextEvent,
            occluded,
        }
    }

    pub fn is_envmap(&self) -> bool {
        self.kind == RayKind::Envmap
    }
}

/// One reconstructed intersection with its attached segments and the
/// per-segment display state the scene viewer drives.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    pub index: i32,
    /// Segment arriving at this intersection.
    pub incoming: Option<Ray>,
    /// The shading point itself; absent for an environment-map-only
    /// terminal record.
    pub marker: Option<Point3f>,
    /// Segment leaving this intersection.
    pub outgoing: Option<Ray>,
    /// Next-event-estimation segment.
    pub nee: Option<Ray>,
    pub incoming_visible: bool,
    pub outgoing_visible: bool,
    pub nee_visible: bool,
    pub opacity: f32,
    pub size: f32,
}

impl Intersection {
    fn new(
        index: i32,
        incoming: Option<Ray>,
        marker: Option<Point3f>,
        outgoing: Option<Ray>,
        nee: Option<Ray>,
    ) -> Self {
        // outgoing segments are hidden unless they leave the scene
        let outgoing_visible = outgoing.map(|r| r.is_envmap()).unwrap_or(false);
        Self {
            index,
            incoming,
            marker,
            outgoing,
            nee,
            incoming_visible: true,
            outgoing_visible,
            nee_visible: false,
            opacity: 1.0,
            size: 1.0,
        }
    }
}

/// Reconstruct the segments of one path from its origin and its
/// intersection-record map.
///
/// The pass walks the records in ascending key order; the start key is
/// whichever key comes first. Records without a resolved position produce
/// no intersection, except a start record that resolved against the
/// environment map, which yields a single envmap-terminated incoming ray.
/// A missing predecessor leaves the incoming ray absent; a record's own
/// environment-map position overrides any successor-derived outgoing ray.
pub fn reconstruct(
    origin: Point3f,
    records: &BTreeMap<i32, IntersectionData>,
) -> BTreeMap<i32, Intersection> {
    let mut result = BTreeMap::new();

    let start_key = match records.keys().next() {
        Some(&key) => key,
        None => return result,
    };

    for (&key, record) in records {
        let Some(pos) = record.pos else {
            if key == start_key {
                if let Some(envmap) = record.pos_envmap {
                    let incoming = Ray::envmap(origin, envmap);
                    result.insert(key, Intersection::new(key, Some(incoming), None, None, None));
                }
            }
            continue;
        };

        let incoming = if key == start_key {
            Some(Ray::path(origin, pos))
        } else {
            records
                .get(&(key - 1))
                .and_then(|prev| prev.pos)
                .map(|prev_pos| Ray::path(prev_pos, pos))
        };

        let mut outgoing = records.get(&(key + 1)).and_then(|next| match next.pos {
            Some(next_pos) => Some(Ray::path(pos, next_pos)),
            None => next.pos_envmap.map(|envmap| Ray::envmap(pos, envmap)),
        });
        if let Some(envmap) = record.pos_envmap {
            outgoing = Some(Ray::envmap(pos, envmap));
        }

        let nee = record
            .pos_ne
            .map(|target| Ray::next_event(pos, target, record.ne_occluded));

        result.insert(key, Intersection::new(key, incoming, Some(pos), outgoing, nee));
    }

    result
}

/// One path's reconstruction result plus path-level display state.
#[derive(Clone, Debug)]
pub struct TracedPath {
    pub index: i32,
    pub origin: Point3f,
    pub intersections: BTreeMap<i32, Intersection>,
    visible: bool,
    nee_visible: bool,
    opacity: f32,
    size: f32,
}

impl TracedPath {
    /// Reconstruct one path from its deserialized data.
    pub fn from_path_data(path: &PathData) -> Self {
        Self {
            index: path.sample_idx,
            origin: path.origin,
            intersections: reconstruct(path.origin, &path.intersections),
            visible: true,
            nee_visible: false,
            opacity: 1.0,
            size: 1.0,
        }
    }

    pub fn get(&self, index: i32) -> Option<&Intersection> {
        self.intersections.get(&index)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the path; propagates to every incoming segment.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        for its in self.intersections.values_mut() {
            its.incoming_visible = visible;
        }
    }

    pub fn is_nee_visible(&self) -> bool {
        self.nee_visible
    }

    /// Show or hide the path's next-event segments.
    pub fn set_nee_visible(&mut self, visible: bool) {
        self.nee_visible = visible;
        for its in self.intersections.values_mut() {
            its.nee_visible = visible;
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        for its in self.intersections.values_mut() {
            its.opacity = opacity;
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
        for its in self.intersections.values_mut() {
            its.size = size;
        }
    }

    /// Restore default opacity and size on the path and its segments.
    pub fn reset(&mut self) {
        self.set_opacity(1.0);
        self.set_size(1.0);
    }
}

/// All reconstructed paths of one pixel-data set, keyed by sample index.
#[derive(Clone, Debug, Default)]
pub struct TracedPathSet {
    paths: BTreeMap<i32, TracedPath>,
}

impl TracedPathSet {
    /// Rebuild every path from scratch.
    ///
    /// Fails with [`Error::InvalidDataSet`] when the data set's sample
    /// count is zero; such a set must never be reconstructed.
    pub fn from_render_data(data: &RenderData) -> Result<Self> {
        if !data.is_valid() {
            return Err(Error::InvalidDataSet);
        }
        let paths = data
            .paths()
            .iter()
            .map(|(&idx, path)| (idx, TracedPath::from_path_data(path)))
            .collect();
        Ok(Self { paths })
    }

    pub fn get(&self, index: i32) -> Option<&TracedPath> {
        self.paths.get(&index)
    }

    pub fn get_mut(&mut self, index: i32) -> Option<&mut TracedPath> {
        self.paths.get_mut(&index)
    }

    pub fn paths(&self) -> &BTreeMap<i32, TracedPath> {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        depth_idx: i32,
        pos: Option<Point3f>,
        pos_ne: Option<(Point3f, bool)>,
        pos_envmap: Option<Point3f>,
    ) -> IntersectionData {
        IntersectionData {
            depth_idx,
            pos,
            pos_ne: pos_ne.map(|(p, _)| p),
            ne_occluded: pos_ne.map(|(_, o)| o).unwrap_or(false),
            pos_envmap,
            ..IntersectionData::default()
        }
    }

    const ORIGIN: Point3f = Point3f::ZERO;

    #[test]
    fn test_start_vertex_envmap_only() {
        // first vertex never hit geometry, resolved against the envmap
        let mut records = BTreeMap::new();
        records.insert(1, record(1, None, None, Some(Point3f::new(0.0, 1.0, 0.0))));

        let result = reconstruct(ORIGIN, &records);
        assert_eq!(result.len(), 1);
        let its = &result[&1];
        let wi = its.incoming.expect("incoming ray");
        assert_eq!(wi.kind, RayKind::Envmap);
        assert_eq!(wi.start, ORIGIN);
        assert_eq!(wi.end, Point3f::new(0.0, 1.0, 0.0));
        assert!(its.marker.is_none());
        assert!(its.outgoing.is_none());
        assert!(its.nee.is_none());
    }

    #[test]
    fn test_two_vertex_chain() {
        let mut records = BTreeMap::new();
        records.insert(1, record(1, Some(Point3f::new(0.0, 0.0, 1.0)), None, None));
        records.insert(2, record(2, Some(Point3f::new(0.0, 0.0, 2.0)), None, None));

        let result = reconstruct(ORIGIN, &records);
        assert_eq!(result.len(), 2);

        let first = &result[&1];
        let wi = first.incoming.unwrap();
        assert_eq!((wi.start, wi.end), (ORIGIN, Point3f::new(0.0, 0.0, 1.0)));
        let wo = first.outgoing.unwrap();
        assert_eq!(
            (wo.start, wo.end),
            (Point3f::new(0.0, 0.0, 1.0), Point3f::new(0.0, 0.0, 2.0))
        );
        assert_eq!(wo.kind, RayKind::Path);

        let second = &result[&2];
        let wi = second.incoming.unwrap();
        assert_eq!(
            (wi.start, wi.end),
            (Point3f::new(0.0, 0.0, 1.0), Point3f::new(0.0, 0.0, 2.0))
        );
        assert!(second.outgoing.is_none());
    }

    #[test]
    fn test_own_envmap_wins_over_missing_successor() {
        // terminal vertex with both a position and an envmap position
        let mut records = BTreeMap::new();
        records.insert(
            1,
            record(
                1,
                Some(Point3f::new(0.0, 0.0, 1.0)),
                None,
                Some(Point3f::new(1.0, 0.0, 0.0)),
            ),
        );

        let result = reconstruct(ORIGIN, &records);
        let wo = result[&1].outgoing.expect("outgoing ray");
        assert_eq!(wo.kind, RayKind::Envmap);
        assert_eq!(wo.end, Point3f::new(1.0, 0.0, 0.0));
        // envmap-terminated outgoing segments are visible by default
        assert!(result[&1].outgoing_visible);
    }

    #[test]
    fn test_own_envmap_overrides_successor_ray() {
        let mut records = BTreeMap::new();
        records.insert(
            1,
            record(
                1,
                Some(Point3f::new(0.0, 0.0, 1.0)),
                None,
                Some(Point3f::new(5.0, 0.0, 0.0)),
            ),
        );
        records.insert(2, record(2, Some(Point3f::new(0.0, 0.0, 2.0)), None, None));

        let result = reconstruct(ORIGIN, &records);
        let wo = result[&1].outgoing.unwrap();
        assert_eq!(wo.kind, RayKind::Envmap);
        assert_eq!(wo.end, Point3f::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_gap_breaks_incoming_chain() {
        // key 2 missing: intersection 3 has no incoming ray
        let mut records = BTreeMap::new();
        records.insert(1, record(1, Some(Point3f::new(0.0, 0.0, 1.0)), None, None));
        records.insert(3, record(3, Some(Point3f::new(0.0, 0.0, 3.0)), None, None));

        let result = reconstruct(ORIGIN, &records);
        assert_eq!(result.len(), 2);
        assert!(result[&3].incoming.is_none());
        assert!(result[&3].marker.is_some());
    }

    #[test]
    fn test_unresolved_vertex_skipped() {
        let mut records = BTreeMap::new();
        records.insert(1, record(1, Some(Point3f::new(0.0, 0.0, 1.0)), None, None));
        records.insert(2, record(2, None, None, None));

        let result = reconstruct(ORIGIN, &records);
        assert_eq!(result.len(), 1);
        assert!(!result.contains_key(&2));
        // the unresolved successor contributes no outgoing ray either
        assert!(result[&1].outgoing.is_none());
    }

    #[test]
    fn test_nee_ray_carries_occlusion() {
        let mut records = BTreeMap::new();
        records.insert(
            1,
            record(
                1,
                Some(Point3f::new(0.0, 0.0, 1.0)),
                Some((Point3f::new(0.0, 2.0, 1.0), true)),
                None,
            ),
        );

        let result = reconstruct(ORIGIN, &records);
        let ne = result[&1].nee.expect("nee ray");
        assert_eq!(ne.kind, RayKind::NextEvent);
        assert!(ne.occluded);
        // hidden by default
        assert!(!result[&1].nee_visible);
    }

    #[test]
    fn test_start_key_not_one() {
        // nori-style paths start at 0, mitsuba-style at 1; neither is
        // assumed
        let mut records = BTreeMap::new();
        records.insert(4, record(4, Some(Point3f::new(0.0, 0.0, 4.0)), None, None));
        records.insert(5, record(5, Some(Point3f::new(0.0, 0.0, 5.0)), None, None));

        let result = reconstruct(ORIGIN, &records);
        let wi = result[&4].incoming.unwrap();
        assert_eq!(wi.start, ORIGIN);
    }

    #[test]
    fn test_reconstruction_is_deterministic() {
        let mut records = BTreeMap::new();
        records.insert(1, record(1, Some(Point3f::new(0.0, 0.0, 1.0)), None, None));
        records.insert(
            2,
            record(
                2,
                Some(Point3f::new(1.0, 0.0, 1.0)),
                Some((Point3f::new(1.0, 2.0, 1.0), false)),
                None,
            ),
        );
        records.insert(3, record(3, None, None, Some(Point3f::new(0.0, 1.0, 0.0))));

        let a = reconstruct(ORIGIN, &records);
        let b = reconstruct(ORIGIN, &records);
        assert_eq!(a, b);
    }

    #[test]
    fn test_path_set_rejects_invalid_data() {
        let data = RenderData::new();
        assert!(matches!(
            TracedPathSet::from_render_data(&data),
            Err(Error::InvalidDataSet)
        ));
    }

    #[test]
    fn test_path_visibility_propagates() {
        let mut records = BTreeMap::new();
        records.insert(1, record(1, Some(Point3f::new(0.0, 0.0, 1.0)), None, None));
        let path_data = PathData {
            sample_idx: 0,
            path_depth: 1,
            origin: ORIGIN,
            intersections: records,
            ..PathData::default()
        };

        let mut path = TracedPath::from_path_data(&path_data);
        assert!(path.get(1).unwrap().incoming_visible);
        path.set_visible(false);
        assert!(!path.get(1).unwrap().incoming_visible);
        path.set_nee_visible(true);
        assert!(path.get(1).unwrap().nee_visible);
        path.set_opacity(0.5);
        assert_eq!(path.get(1).unwrap().opacity, 0.5);
        path.reset();
        assert_eq!(path.get(1).unwrap().opacity, 1.0);
    }
}
