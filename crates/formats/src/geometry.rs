use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// Geometry of one segment row, in projected map units.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Vec2),
    MultiPoint(Vec<Vec2>),
    LineString(Vec<Vec2>),
    MultiLineString(Vec<Vec<Vec2>>),
    Polygon(Vec<Vec<Vec2>>),
    MultiPolygon(Vec<Vec<Vec<Vec2>>>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Polylines to draw for this geometry. Points contribute nothing; polygon
    /// rings are drawn as closed polylines.
    pub fn polylines(&self) -> Vec<&[Vec2]> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
            Geometry::LineString(line) => vec![line.as_slice()],
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().map(Vec::as_slice).collect()
            }
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::as_slice))
                .collect(),
        }
    }

    /// Endpoints of the geometry's boundary, exploded into single points.
    ///
    /// Only lineal geometries have point boundaries. Endpoints are counted
    /// over every part and kept when they occur an odd number of times (the
    /// mod-2 rule), so closed lines and endpoints shared by two parts drop
    /// out. Output follows first-seen order.
    pub fn boundary_points(&self) -> Vec<Vec2> {
        match self {
            Geometry::LineString(line) => mod2_endpoints(std::iter::once(line.as_slice())),
            Geometry::MultiLineString(lines) => {
                mod2_endpoints(lines.iter().map(Vec::as_slice))
            }
            Geometry::Point(_)
            | Geometry::MultiPoint(_)
            | Geometry::Polygon(_)
            | Geometry::MultiPolygon(_) => Vec::new(),
        }
    }

    pub fn extent(&self) -> Option<Aabb2> {
        match self {
            Geometry::Point(p) => Aabb2::from_points(std::iter::once(p)),
            Geometry::MultiPoint(ps) => Aabb2::from_points(ps),
            _ => self
                .polylines()
                .into_iter()
                .filter_map(Aabb2::from_points)
                .reduce(|a, b| a.union(&b)),
        }
    }
}

fn mod2_endpoints<'a>(parts: impl Iterator<Item = &'a [Vec2]>) -> Vec<Vec2> {
    let mut seen: Vec<(Vec2, usize)> = Vec::new();
    for part in parts {
        let (Some(first), Some(last)) = (part.first(), part.last()) else {
            continue;
        };
        if part.len() < 2 {
            continue;
        }
        for p in [*first, *last] {
            match seen.iter_mut().find(|(q, _)| q.same_position(p)) {
                Some((_, count)) => *count += 1,
                None => seen.push((p, 1)),
            }
        }
    }
    seen.into_iter()
        .filter(|(_, count)| count % 2 == 1)
        .map(|(p, _)| p)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Geometry;
    use foundation::bounds::Aabb2;
    use foundation::math::Vec2;

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn open_line_has_two_endpoints() {
        let g = Geometry::LineString(vec![v(0.0, 0.0), v(1.0, 0.0), v(2.0, 1.0)]);
        assert_eq!(g.boundary_points(), vec![v(0.0, 0.0), v(2.0, 1.0)]);
    }

    #[test]
    fn closed_line_has_no_boundary() {
        let g = Geometry::LineString(vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 0.0)]);
        assert!(g.boundary_points().is_empty());
    }

    #[test]
    fn degenerate_line_has_no_boundary() {
        assert!(Geometry::LineString(vec![v(3.0, 3.0)]).boundary_points().is_empty());
        assert!(Geometry::LineString(Vec::new()).boundary_points().is_empty());
    }

    #[test]
    fn multi_line_drops_shared_endpoints() {
        // Two parts chained at (1, 0): only the outer ends remain.
        let g = Geometry::MultiLineString(vec![
            vec![v(0.0, 0.0), v(1.0, 0.0)],
            vec![v(1.0, 0.0), v(2.0, 0.0)],
        ]);
        assert_eq!(g.boundary_points(), vec![v(0.0, 0.0), v(2.0, 0.0)]);
    }

    #[test]
    fn disjoint_multi_line_keeps_every_end() {
        let g = Geometry::MultiLineString(vec![
            vec![v(0.0, 0.0), v(1.0, 0.0)],
            vec![v(5.0, 5.0), v(6.0, 5.0)],
        ]);
        assert_eq!(
            g.boundary_points(),
            vec![v(0.0, 0.0), v(1.0, 0.0), v(5.0, 5.0), v(6.0, 5.0)]
        );
    }

    #[test]
    fn three_parts_meeting_keep_junction() {
        // A junction shared by three parts is an odd count, so it stays.
        let g = Geometry::MultiLineString(vec![
            vec![v(0.0, 0.0), v(1.0, 1.0)],
            vec![v(1.0, 1.0), v(2.0, 0.0)],
            vec![v(1.0, 1.0), v(1.0, 2.0)],
        ]);
        assert_eq!(
            g.boundary_points(),
            vec![v(0.0, 0.0), v(1.0, 1.0), v(2.0, 0.0), v(1.0, 2.0)]
        );
    }

    #[test]
    fn points_and_polygons_have_no_markers() {
        assert!(Geometry::Point(v(1.0, 1.0)).boundary_points().is_empty());
        let poly = Geometry::Polygon(vec![vec![
            v(0.0, 0.0),
            v(1.0, 0.0),
            v(0.0, 1.0),
            v(0.0, 0.0),
        ]]);
        assert!(poly.boundary_points().is_empty());
    }

    #[test]
    fn extent_spans_all_parts() {
        let g = Geometry::MultiLineString(vec![
            vec![v(0.0, 0.0), v(1.0, 2.0)],
            vec![v(-3.0, 1.0), v(0.0, 5.0)],
        ]);
        assert_eq!(g.extent(), Some(Aabb2::new([-3.0, 0.0], [1.0, 5.0])));
    }
}
