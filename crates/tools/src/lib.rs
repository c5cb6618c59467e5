use std::fs;
use std::path::Path;

use clap::ValueEnum;
use formats::{LoadOptions, SegmentTable, prepare_regime_table};
use layers::{LinkedMap, MapConfig, MapSnapshot};
use selection::{ClientPayload, LookupSource, MapEvent, MarkerSource, Outcome, Phase};
use serde::Serialize;
use tracing::info;

/// Built-in map flavours.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// Plain segment map over any GeoJSON line dataset.
    #[default]
    Segments,
    /// Regime-coloured line map over the raw regime dataset.
    #[value(name = "lines", alias = "rail-lines")]
    RailLines,
}

impl Preset {
    pub fn config(self) -> MapConfig {
        match self {
            Preset::Segments => MapConfig::segments(),
            Preset::RailLines => MapConfig::rail_lines(),
        }
    }
}

/// Dataset bytes plus the map built from them.
pub struct LoadedMap {
    pub map: LinkedMap,
    pub dataset_hash: String,
}

pub fn dataset_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Reads a GeoJSON dataset and builds the linked map for `preset`.
///
/// `config_path` overrides the preset entirely when given.
pub fn load_map(
    input: &Path,
    preset: Preset,
    config_path: Option<&Path>,
    project_lon_lat: bool,
) -> Result<LoadedMap, String> {
    let bytes = fs::read(input).map_err(|e| format!("read {input:?}: {e}"))?;
    let text = std::str::from_utf8(&bytes).map_err(|e| format!("decode {input:?}: {e}"))?;
    let options = LoadOptions { project_lon_lat };
    let mut table =
        SegmentTable::from_geojson_str(text, options).map_err(|e| format!("parse {input:?}: {e}"))?;
    if preset == Preset::RailLines {
        table = prepare_regime_table(&table).map_err(|e| format!("prepare {input:?}: {e}"))?;
    }

    let config = match config_path {
        Some(path) => MapConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => preset.config(),
    };
    let hash = dataset_hash(&bytes);
    info!(input = %input.display(), rows = table.len(), hash = %hash, "dataset loaded");
    Ok(LoadedMap {
        map: LinkedMap::new(table, config),
        dataset_hash: hash,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub title: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub unlocated: usize,
    pub markers: u32,
    pub lookup_column: String,
    pub lookup_groups: usize,
    /// `[min_x, min_y, max_x, max_y]` of the located geometry.
    pub extent: Option<[f64; 4]>,
    pub dataset_hash: String,
}

pub fn inspect(loaded: &LoadedMap) -> InspectReport {
    let map = &loaded.map;
    let table = map.table();
    let controller = map.controller();
    InspectReport {
        title: map.config().title.clone(),
        rows: table.len(),
        columns: table.columns(),
        unlocated: table.unlocated_count(),
        markers: controller.index().marker_count(),
        lookup_column: controller.lookup().key().label().to_string(),
        lookup_groups: controller.lookup().len(),
        extent: table
            .extent()
            .map(|b| [b.min[0], b.min[1], b.max[0], b.max[1]]),
        dataset_hash: loaded.dataset_hash.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayStep {
    pub seq: u64,
    pub event: MapEvent,
    pub outcome: Outcome,
    pub phase: Phase,
    pub selected_segments: Vec<u32>,
    pub selected_markers: Vec<u32>,
    pub endpoints_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<MapSnapshot>,
}

pub fn parse_script(text: &str) -> Result<Vec<MapEvent>, String> {
    serde_json::from_str(text).map_err(|e| format!("invalid event script: {e}"))
}

/// Feeds `events` through the map's controller in order.
pub fn replay(map: &mut LinkedMap, events: Vec<MapEvent>, with_snapshot: bool) -> ReplayReport {
    let mut steps = Vec::with_capacity(events.len());
    for (seq, event) in events.into_iter().enumerate() {
        let outcome = map.handle(event.clone());
        let controller = map.controller();
        steps.push(ReplayStep {
            seq: seq as u64,
            event,
            outcome,
            phase: controller.phase(),
            selected_segments: controller.selected_segments().to_vec(),
            selected_markers: controller.selected_markers().to_vec(),
            endpoints_visible: controller.endpoints_visible(),
        });
    }
    ReplayReport {
        steps,
        snapshot: with_snapshot.then(|| map.snapshot()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupReport {
    pub key: String,
    pub column: String,
    pub rows: Vec<u32>,
    pub ids: Vec<String>,
}

pub fn lookup(map: &LinkedMap, key: &str) -> LookupReport {
    let index = map.controller().lookup();
    let rows = index.lookup(key).to_vec();
    let ids = rows
        .iter()
        .filter_map(|&r| map.table().row(r).map(|row| row.id.clone()))
        .collect();
    LookupReport {
        key: key.to_string(),
        column: index.key().label().to_string(),
        rows,
        ids,
    }
}

pub fn export_payload(loaded: &LoadedMap) -> ClientPayload {
    loaded
        .map
        .client_payload()
        .with_dataset_hash(loaded.dataset_hash.clone())
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("serialize: {e}"))
}
