use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use formats::SegmentTable;
use selection::{
    ClientPayload, LookupIndex, MapEvent, Outcome, Phase, SegmentIndex, SelectionController,
};
use serde::Serialize;
use tracing::info;

use crate::config::MapConfig;
use crate::symbology::LegendEntry;
use crate::table::{TableSnapshot, TableView, hover_fields};
use crate::vector::{EndpointLayerSnapshot, EndpointLayerView, LineLayerSnapshot, LineLayerView};

/// Page geometry: figure and widget sizes in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MapLayout {
    pub tiles: bool,
    pub fig_height: u32,
    pub table_width: u32,
    pub table_height: u32,
    pub lookup_max_width: u32,
}

impl MapLayout {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            tiles: config.tiles,
            fig_height: config.fig_height,
            table_width: config.table.width,
            table_height: config.table.height,
            lookup_max_width: config.lookup.max_width,
        }
    }
}

/// Everything a front-end needs to draw the map at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub title: String,
    pub layout: MapLayout,
    pub help_text: String,
    /// Page file to write, when the config names a save directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    pub phase: Phase,
    pub selected_segments: Vec<u32>,
    pub lookup_title: String,
    pub toggle_label: String,
    pub table_title: String,
    pub table: TableSnapshot,
    pub lines: LineLayerSnapshot,
    pub endpoints: EndpointLayerSnapshot,
    pub legend: Vec<LegendEntry>,
    pub hover: Vec<(String, String)>,
}

/// Segment map with its table, line layer and endpoint layer linked through
/// one selection controller.
pub struct LinkedMap {
    config: MapConfig,
    table: Rc<SegmentTable>,
    controller: SelectionController,
    table_view: Rc<RefCell<TableView>>,
    lines: Rc<RefCell<LineLayerView>>,
    endpoints: Rc<RefCell<EndpointLayerView>>,
}

impl LinkedMap {
    pub fn new(table: SegmentTable, config: MapConfig) -> Self {
        let table = Rc::new(table);
        let index = Rc::new(SegmentIndex::build(&table, &config.style));
        let lookup = LookupIndex::build(&table, &config.lookup.key);
        info!(
            title = %config.title,
            key = config.lookup.key.label(),
            groups = lookup.len(),
            "lookup index built"
        );

        let mut controller = SelectionController::new(index.clone(), lookup, config.sync)
            .with_endpoints_visible(config.endpoints.visible);

        let table_view = Rc::new(RefCell::new(TableView::new(
            table.clone(),
            config.table.columns.clone(),
        )));
        let lines = Rc::new(RefCell::new(LineLayerView::new(table.clone(), index.clone())));
        let endpoints = Rc::new(RefCell::new(EndpointLayerView::new(
            index,
            config.endpoints.clone(),
        )));
        controller.register(Box::new(lines.clone()));
        controller.register(Box::new(endpoints.clone()));
        controller.register(Box::new(table_view.clone()));

        Self {
            config,
            table,
            controller,
            table_view,
            lines,
            endpoints,
        }
    }

    pub fn handle(&mut self, event: MapEvent) -> Outcome {
        self.controller.handle(event)
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn table(&self) -> &SegmentTable {
        &self.table
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SelectionController {
        &mut self.controller
    }

    /// Transition data for a browser-side runtime.
    pub fn client_payload(&self) -> ClientPayload {
        ClientPayload::from_indices(
            self.controller.index(),
            self.controller.lookup(),
            self.controller.policy(),
        )
    }

    pub fn snapshot(&self) -> MapSnapshot {
        let table_view = self.table_view.borrow();
        MapSnapshot {
            title: self.config.title.clone(),
            layout: MapLayout::from_config(&self.config),
            help_text: self.config.help_text.clone(),
            output_path: self.config.output_path(),
            phase: self.controller.phase(),
            selected_segments: self.controller.selected_segments().to_vec(),
            lookup_title: self.config.lookup.title().to_string(),
            toggle_label: self.config.endpoints.label.clone(),
            table_title: self.config.table.title.clone(),
            table: table_view.snapshot(),
            lines: self.lines.borrow().snapshot(),
            endpoints: self.endpoints.borrow().snapshot(),
            legend: self.config.style.legend(),
            hover: hover_fields(table_view.columns()),
        }
    }
}
