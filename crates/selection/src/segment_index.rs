use foundation::math::Vec2;
use formats::SegmentTable;
use tracing::info;

use crate::set::SelectionSet;
use crate::style::{SegmentStyle, SegmentStyler};

/// One point of a segment's geometry boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointMarker {
    /// Row index of the owning segment.
    pub segment: u32,
    /// Stable identifier of the owning segment.
    pub segment_id: String,
    pub position: Vec2,
}

/// Read access to the segment → marker mapping.
///
/// Implemented by [`SegmentIndex`] and by the exported client payload so both
/// tiers run the same transitions.
pub trait MarkerSource {
    fn segment_count(&self) -> u32;
    fn marker_count(&self) -> u32;
    /// Marker indices of `segment`; empty for unlocated or unknown segments.
    fn markers_of(&self, segment: u32) -> &[u32];

    /// Union of the marker lists of every segment in `segments`.
    fn markers_for(&self, segments: &SelectionSet) -> SelectionSet {
        let mut out = SelectionSet::new();
        for segment in segments.iter() {
            out.extend(self.markers_of(segment).iter().copied());
        }
        out
    }

    fn all_markers(&self) -> SelectionSet {
        SelectionSet::full(self.marker_count())
    }
}

/// Immutable mapping from segment rows to their endpoint markers.
///
/// Ordering contract:
/// - Markers are numbered in input row order, then boundary order within a row.
/// - Rows without located geometry have no entry at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentIndex {
    markers: Vec<EndpointMarker>,
    by_segment: Vec<Option<Vec<u32>>>,
    styles: Vec<SegmentStyle>,
}

impl SegmentIndex {
    pub fn build<S>(table: &SegmentTable, styler: &S) -> Self
    where
        S: SegmentStyler + ?Sized,
    {
        let mut markers: Vec<EndpointMarker> = Vec::new();
        let mut by_segment: Vec<Option<Vec<u32>>> = Vec::with_capacity(table.len());
        let mut styles: Vec<SegmentStyle> = Vec::with_capacity(table.len());

        for (row_index, row) in table.rows().iter().enumerate() {
            styles.push(styler.style(row));

            let Some(geometry) = &row.geometry else {
                by_segment.push(None);
                continue;
            };

            let mut own: Vec<u32> = Vec::new();
            for position in geometry.boundary_points() {
                own.push(markers.len() as u32);
                markers.push(EndpointMarker {
                    segment: row_index as u32,
                    segment_id: row.id.clone(),
                    position,
                });
            }
            by_segment.push(Some(own));
        }

        let index = Self {
            markers,
            by_segment,
            styles,
        };
        info!(
            segments = index.by_segment.len(),
            markers = index.markers.len(),
            unlocated = index.by_segment.iter().filter(|m| m.is_none()).count(),
            "segment index built"
        );
        index
    }

    pub fn build_unstyled(table: &SegmentTable) -> Self {
        Self::build(table, &|_: &formats::SegmentRow| SegmentStyle::default())
    }

    pub fn markers(&self) -> &[EndpointMarker] {
        &self.markers
    }

    pub fn marker(&self, index: u32) -> Option<&EndpointMarker> {
        self.markers.get(index as usize)
    }

    /// `false` for rows whose geometry was null or empty.
    pub fn is_located(&self, segment: u32) -> bool {
        self.by_segment
            .get(segment as usize)
            .is_some_and(Option::is_some)
    }

    /// Located segments with their marker lists, in row order.
    pub fn located(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.by_segment
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_deref().map(|m| (i as u32, m)))
    }

    pub fn style(&self, segment: u32) -> Option<&SegmentStyle> {
        self.styles.get(segment as usize)
    }

    pub fn all_segments(&self) -> SelectionSet {
        SelectionSet::full(self.segment_count())
    }
}

impl MarkerSource for SegmentIndex {
    fn segment_count(&self) -> u32 {
        self.by_segment.len() as u32
    }

    fn marker_count(&self) -> u32 {
        self.markers.len() as u32
    }

    fn markers_of(&self, segment: u32) -> &[u32] {
        self.by_segment
            .get(segment as usize)
            .and_then(|m| m.as_deref())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{MarkerSource, SegmentIndex};
    use crate::set::SelectionSet;
    use crate::style::SegmentStyle;
    use formats::{Geometry, SegmentRow, SegmentTable};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value};

    fn line(points: &[(f64, f64)]) -> Option<Geometry> {
        Some(Geometry::LineString(
            points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        ))
    }

    fn row(id: &str, geometry: Option<Geometry>) -> SegmentRow {
        let mut props = Map::new();
        props.insert("name".to_string(), Value::String(format!("segment {id}")));
        SegmentRow::new(id, props, geometry)
    }

    /// Segment 0 → markers {0,1}, segment 1 → {2,3}, segment 2 closed → none.
    pub(crate) fn three_segments() -> SegmentTable {
        SegmentTable::new(vec![
            row("a", line(&[(0.0, 0.0), (1.0, 0.0)])),
            row("b", line(&[(2.0, 0.0), (3.0, 1.0), (4.0, 0.0)])),
            row("c", line(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 5.0)])),
        ])
    }

    #[test]
    fn numbers_markers_in_row_order() {
        let index = SegmentIndex::build_unstyled(&three_segments());
        assert_eq!(index.segment_count(), 3);
        assert_eq!(index.marker_count(), 4);
        assert_eq!(index.markers_of(0), &[0, 1]);
        assert_eq!(index.markers_of(1), &[2, 3]);
        assert_eq!(index.markers_of(2), &[] as &[u32]);
        assert!(index.is_located(2));
        assert_eq!(index.marker(3).map(|m| m.position), Some(Vec2::new(4.0, 0.0)));
        assert_eq!(index.marker(2).map(|m| m.segment_id.as_str()), Some("b"));
    }

    #[test]
    fn unlocated_rows_have_no_entry() {
        let table = SegmentTable::new(vec![
            row("x", None),
            row("y", line(&[(0.0, 0.0), (1.0, 1.0)])),
        ]);
        let index = SegmentIndex::build_unstyled(&table);
        assert!(!index.is_located(0));
        assert!(index.is_located(1));
        assert_eq!(index.markers_of(1), &[0, 1]);
        let located: Vec<u32> = index.located().map(|(s, _)| s).collect();
        assert_eq!(located, vec![1]);
        assert_eq!(index.markers_of(99), &[] as &[u32]);
    }

    #[test]
    fn marker_lists_partition_the_marker_range() {
        let table = SegmentTable::new(vec![
            row("a", line(&[(0.0, 0.0), (1.0, 0.0)])),
            row("b", None),
            row(
                "c",
                Some(Geometry::MultiLineString(vec![
                    vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)],
                    vec![Vec2::new(3.0, 3.0), Vec2::new(4.0, 4.0)],
                ])),
            ),
            row("d", line(&[(9.0, 9.0)])),
            row("e", line(&[(7.0, 0.0), (8.0, 0.0)])),
        ]);
        let index = SegmentIndex::build_unstyled(&table);

        let mut seen = SelectionSet::new();
        let mut total = 0;
        for (_, markers) in index.located() {
            total += markers.len();
            seen.extend(markers.iter().copied());
        }
        assert_eq!(total, seen.len());
        assert_eq!(seen, index.all_markers());
        assert_eq!(index.markers_of(2), &[2, 3, 4, 5]);
    }

    #[test]
    fn markers_for_unions_lists() {
        let index = SegmentIndex::build_unstyled(&three_segments());
        let picked: SelectionSet = [1, 2].into_iter().collect();
        assert_eq!(index.markers_for(&picked).to_vec(), vec![2, 3]);
    }

    #[test]
    fn styler_runs_once_per_row() {
        let styler = |r: &SegmentRow| {
            if r.id == "b" {
                SegmentStyle::new("red", 3.0)
            } else {
                SegmentStyle::default()
            }
        };
        let index = SegmentIndex::build(&three_segments(), &styler);
        assert_eq!(index.style(1), Some(&SegmentStyle::new("red", 3.0)));
        assert_eq!(index.style(0), Some(&SegmentStyle::default()));
        assert_eq!(index.style(3), None);
    }
}
