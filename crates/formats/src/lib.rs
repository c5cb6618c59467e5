pub mod geometry;
pub mod pk;
pub mod regime;
pub mod segment_table;

pub use geometry::*;
pub use regime::*;
pub use segment_table::*;
