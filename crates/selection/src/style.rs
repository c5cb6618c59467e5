use formats::SegmentRow;
use serde::{Deserialize, Serialize};

/// Display attributes of one segment on the line layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStyle {
    pub color: String,
    pub width: f32,
}

impl SegmentStyle {
    pub fn new(color: impl Into<String>, width: f32) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

impl Default for SegmentStyle {
    fn default() -> Self {
        Self::new("blue", 2.0)
    }
}

/// Styling strategy injected into [`crate::SegmentIndex`] construction.
pub trait SegmentStyler {
    fn style(&self, row: &SegmentRow) -> SegmentStyle;
}

impl<F> SegmentStyler for F
where
    F: Fn(&SegmentRow) -> SegmentStyle,
{
    fn style(&self, row: &SegmentRow) -> SegmentStyle {
        self(row)
    }
}
