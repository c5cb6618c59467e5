use serde::{Deserialize, Serialize};

/// What a matched text lookup does to the selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// The matched rows become the segment selection, so the table and the
    /// line layer follow the typed key.
    #[default]
    SyncSegments,
    /// Only the endpoint markers follow the typed key; the segment selection
    /// is left as it was.
    MarkersOnly,
}

/// Which rows the table view shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFilter {
    /// Only the selected rows (every row when nothing is selected).
    #[default]
    FollowSelection,
    /// Every row; selection only shows on the map.
    ShowAll,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncPolicy {
    #[serde(default)]
    pub lookup: LookupPolicy,
    #[serde(default)]
    pub table: TableFilter,
}

impl SyncPolicy {
    /// Segment map: lookup drives the selection and the table is filtered.
    pub const fn segment_map() -> Self {
        Self {
            lookup: LookupPolicy::SyncSegments,
            table: TableFilter::FollowSelection,
        }
    }

    /// Regime line map: lookup only moves the markers, the table lists every line.
    pub const fn line_map() -> Self {
        Self {
            lookup: LookupPolicy::MarkersOnly,
            table: TableFilter::ShowAll,
        }
    }
}
