use std::rc::Rc;

use foundation::math::Vec2;
use formats::SegmentTable;
use selection::{SegmentIndex, SegmentStyle, SelectionSet, ViewAdapter, ViewRole};
use serde::Serialize;

use crate::config::EndpointConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFeature {
    pub segment: u32,
    pub id: String,
    pub style: SegmentStyle,
    /// One polyline per line part, in projected coordinates.
    pub parts: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LineLayerSnapshot {
    pub lines: Vec<LineFeature>,
    /// Shown rows without located geometry.
    pub unlocated: usize,
}

/// Segment line layer; draws the segments it is pushed.
#[derive(Debug, Clone)]
pub struct LineLayerView {
    table: Rc<SegmentTable>,
    index: Rc<SegmentIndex>,
    shown: SelectionSet,
}

impl LineLayerView {
    pub fn new(table: Rc<SegmentTable>, index: Rc<SegmentIndex>) -> Self {
        Self {
            table,
            index,
            shown: SelectionSet::new(),
        }
    }

    pub fn shown(&self) -> &SelectionSet {
        &self.shown
    }

    pub fn snapshot(&self) -> LineLayerSnapshot {
        let mut out = LineLayerSnapshot::default();
        for segment in self.shown.iter() {
            let Some(row) = self.table.row(segment) else {
                continue;
            };
            let Some(geometry) = &row.geometry else {
                out.unlocated += 1;
                continue;
            };
            let parts: Vec<Vec<[f64; 2]>> = geometry
                .polylines()
                .into_iter()
                .map(|part| part.iter().map(|p| [p.x, p.y]).collect())
                .collect();
            if parts.is_empty() {
                continue;
            }
            out.lines.push(LineFeature {
                segment,
                id: row.id.clone(),
                style: self.index.style(segment).cloned().unwrap_or_default(),
                parts,
            });
        }
        out
    }
}

impl ViewAdapter for LineLayerView {
    fn role(&self) -> ViewRole {
        ViewRole::Lines
    }

    fn render(&mut self, selected: &SelectionSet) {
        self.shown = selected.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointFeature {
    pub marker: u32,
    pub segment_id: String,
    pub position: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointLayerSnapshot {
    pub visible: bool,
    pub size: f32,
    pub color: String,
    pub points: Vec<EndpointFeature>,
}

/// Endpoint marker layer; hidden until toggled on.
#[derive(Debug, Clone)]
pub struct EndpointLayerView {
    index: Rc<SegmentIndex>,
    style: EndpointConfig,
    visible: bool,
    shown: SelectionSet,
}

impl EndpointLayerView {
    pub fn new(index: Rc<SegmentIndex>, style: EndpointConfig) -> Self {
        let visible = style.visible;
        Self {
            index,
            style,
            visible,
            shown: SelectionSet::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn shown(&self) -> &SelectionSet {
        &self.shown
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.shown
            .iter()
            .filter_map(|m| self.index.marker(m).map(|marker| marker.position))
            .collect()
    }

    pub fn snapshot(&self) -> EndpointLayerSnapshot {
        let points = self
            .shown
            .iter()
            .filter_map(|m| {
                let marker = self.index.marker(m)?;
                Some(EndpointFeature {
                    marker: m,
                    segment_id: marker.segment_id.clone(),
                    position: [marker.position.x, marker.position.y],
                })
            })
            .collect();
        EndpointLayerSnapshot {
            visible: self.visible,
            size: self.style.size,
            color: self.style.color.clone(),
            points,
        }
    }
}

impl ViewAdapter for EndpointLayerView {
    fn role(&self) -> ViewRole {
        ViewRole::Endpoints
    }

    fn render(&mut self, selected: &SelectionSet) {
        self.shown = selected.clone();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
