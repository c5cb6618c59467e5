use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{MapEvent, Outcome, transition};
use crate::lookup::{LookupIndex, LookupSource};
use crate::policy::SyncPolicy;
use crate::segment_index::{MarkerSource, SegmentIndex};
use crate::state::SelectionState;

pub const PAYLOAD_VERSION: u32 = 1;

/// Everything a browser-side runtime needs to reproduce the selection
/// transitions without the server: the marker mapping, the lookup groups
/// and the policy.
///
/// Only located segments appear in `markers_by_segment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayload {
    pub version: u32,
    pub segment_count: u32,
    pub marker_count: u32,
    pub markers_by_segment: BTreeMap<u32, Vec<u32>>,
    pub lookup_column: String,
    pub lookup: BTreeMap<String, Vec<u32>>,
    pub policy: SyncPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_hash: Option<String>,
}

impl ClientPayload {
    pub fn from_indices(index: &SegmentIndex, lookup: &LookupIndex, policy: SyncPolicy) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            segment_count: index.segment_count(),
            marker_count: index.marker_count(),
            markers_by_segment: index
                .located()
                .map(|(segment, markers)| (segment, markers.to_vec()))
                .collect(),
            lookup_column: lookup.key().label().to_string(),
            lookup: lookup.groups().clone(),
            policy,
            dataset_hash: None,
        }
    }

    pub fn with_dataset_hash(mut self, hash: impl Into<String>) -> Self {
        self.dataset_hash = Some(hash.into());
        self
    }

    pub fn initial_state(&self) -> SelectionState {
        SelectionState::new(self)
    }

    pub fn apply(&self, state: &mut SelectionState, event: &MapEvent) -> Outcome {
        transition(state, self, &self.lookup, self.policy, event)
    }
}

impl MarkerSource for ClientPayload {
    fn segment_count(&self) -> u32 {
        self.segment_count
    }

    fn marker_count(&self) -> u32 {
        self.marker_count
    }

    fn markers_of(&self, segment: u32) -> &[u32] {
        self.markers_by_segment
            .get(&segment)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl LookupSource for ClientPayload {
    fn lookup(&self, key: &str) -> &[u32] {
        self.lookup.lookup(key)
    }
}
