pub mod config;
pub mod map;
pub mod symbology;
pub mod table;
pub mod vector;

pub use config::*;
pub use map::{LinkedMap, MapLayout, MapSnapshot};
pub use symbology::{LegendEntry, StyleStrategy};
pub use table::{NumberFormat, TableColumn, TableSnapshot, TableView};
pub use vector::{EndpointLayerSnapshot, EndpointLayerView, LineLayerSnapshot, LineLayerView};
