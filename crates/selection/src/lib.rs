pub mod controller;
pub mod events;
pub mod export;
pub mod lookup;
pub mod policy;
pub mod segment_index;
pub mod set;
pub mod state;
pub mod style;
pub mod view;

pub use controller::SelectionController;
pub use events::{EventLog, LoggedEvent, MapEvent, Outcome, transition};
pub use export::{ClientPayload, PAYLOAD_VERSION};
pub use lookup::{LookupIndex, LookupKey, LookupSource};
pub use policy::{LookupPolicy, SyncPolicy, TableFilter};
pub use segment_index::{EndpointMarker, MarkerSource, SegmentIndex};
pub use set::SelectionSet;
pub use state::{Phase, SelectionState};
pub use style::{SegmentStyle, SegmentStyler};
pub use view::{RecordingView, ViewAdapter, ViewRole};
