/// Planar point in projected map units (EPSG:3857 metres once loaded).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Exact coordinate equality, used to detect closed lines and shared endpoints.
    pub fn same_position(self, other: Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}
