use serde::{Deserialize, Serialize};

use crate::lookup::LookupSource;
use crate::policy::{LookupPolicy, SyncPolicy};
use crate::segment_index::MarkerSource;
use crate::state::{Phase, SelectionState, sanitize_indices};
use crate::set::SelectionSet;

/// User interaction accepted by the selection core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MapEvent {
    /// Rows picked on the map or in the table.
    Select { indices: Vec<u32> },
    /// Key typed in the lookup input.
    Lookup { key: String },
    /// Endpoint layer toggle.
    ShowEndpoints { visible: bool },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AllSelected,
    SubsetSelected,
    /// Markers follow a lookup; segment selection untouched.
    MarkersFocused,
    /// Lookup key not in the index; nothing changed.
    UnknownKey,
    /// Every index of a non-empty pick was out of range; nothing changed.
    OutOfRange,
    EndpointsShown,
    EndpointsHidden,
}

impl Outcome {
    /// Whether views must be re-rendered.
    pub fn changes_selection(self) -> bool {
        matches!(
            self,
            Outcome::AllSelected | Outcome::SubsetSelected | Outcome::MarkersFocused
        )
    }
}

impl From<Phase> for Outcome {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::AllSelected => Outcome::AllSelected,
            Phase::SubsetSelected => Outcome::SubsetSelected,
        }
    }
}

/// Applies one event to `state`.
///
/// This is the whole transition logic; the in-process controller and the
/// exported client payload both go through it.
pub fn transition<M, L>(
    state: &mut SelectionState,
    markers: &M,
    lookup: &L,
    policy: SyncPolicy,
    event: &MapEvent,
) -> Outcome
where
    M: MarkerSource + ?Sized,
    L: LookupSource + ?Sized,
{
    match event {
        MapEvent::Select { indices } => select(state, markers, indices.iter().copied()),
        MapEvent::Lookup { key } => {
            let rows = lookup.lookup(key);
            if rows.is_empty() {
                return Outcome::UnknownKey;
            }
            match policy.lookup {
                LookupPolicy::SyncSegments => select(state, markers, rows.iter().copied()),
                LookupPolicy::MarkersOnly => {
                    let (focus, _) = sanitize_indices(markers, rows.iter().copied());
                    if focus.is_empty() {
                        return Outcome::OutOfRange;
                    }
                    state.focus_markers(markers, focus);
                    Outcome::MarkersFocused
                }
            }
        }
        MapEvent::ShowEndpoints { visible: true } => Outcome::EndpointsShown,
        MapEvent::ShowEndpoints { visible: false } => Outcome::EndpointsHidden,
    }
}

fn select<M, I>(state: &mut SelectionState, markers: &M, raw: I) -> Outcome
where
    M: MarkerSource + ?Sized,
    I: IntoIterator<Item = u32>,
{
    let (segments, dropped): (SelectionSet, usize) = sanitize_indices(markers, raw);
    if segments.is_empty() && dropped > 0 {
        return Outcome::OutOfRange;
    }
    state.select(markers, segments).into()
}

/// Applied event with its sequence number, kept for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedEvent {
    pub seq: u64,
    pub event: MapEvent,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct EventLog {
    next_seq: u64,
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: MapEvent, outcome: Outcome) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(LoggedEvent {
            seq,
            event,
            outcome,
        });
        seq
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Takes the recorded events; sequence numbers keep counting.
    pub fn drain(&mut self) -> Vec<LoggedEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventLog, MapEvent, Outcome, transition};
    use crate::lookup::{LookupIndex, LookupKey};
    use crate::policy::SyncPolicy;
    use crate::segment_index::SegmentIndex;
    use crate::segment_index::tests::three_segments;
    use crate::state::SelectionState;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn lookup() -> LookupIndex {
        let mut groups = BTreeMap::new();
        groups.insert("001-1".to_string(), vec![0]);
        groups.insert("001-2".to_string(), vec![1, 2]);
        groups.insert("broken".to_string(), vec![40]);
        LookupIndex::from_groups(LookupKey::column("lig_rg"), groups)
    }

    fn select(indices: &[u32]) -> MapEvent {
        MapEvent::Select {
            indices: indices.to_vec(),
        }
    }

    #[test]
    fn events_parse_from_tagged_json() {
        let events: Vec<MapEvent> = serde_json::from_str(
            r#"[{"event":"select","indices":[1,2]},
                {"event":"lookup","key":"001-2"},
                {"event":"show_endpoints","visible":true}]"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                select(&[1, 2]),
                MapEvent::Lookup {
                    key: "001-2".to_string()
                },
                MapEvent::ShowEndpoints { visible: true },
            ]
        );
    }

    #[test]
    fn partially_out_of_range_pick_keeps_valid_rows() {
        let index = SegmentIndex::build_unstyled(&three_segments());
        let mut state = SelectionState::new(&index);
        let out = transition(
            &mut state,
            &index,
            &lookup(),
            SyncPolicy::default(),
            &select(&[1, 9]),
        );
        assert_eq!(out, Outcome::SubsetSelected);
        assert_eq!(state.selected_segments().to_vec(), vec![1]);
        assert_eq!(state.selected_markers().to_vec(), vec![2, 3]);
    }

    #[test]
    fn fully_out_of_range_pick_is_ignored() {
        let index = SegmentIndex::build_unstyled(&three_segments());
        let mut state = SelectionState::new(&index);
        transition(&mut state, &index, &lookup(), SyncPolicy::default(), &select(&[0]));
        let before = state.clone();
        let out = transition(
            &mut state,
            &index,
            &lookup(),
            SyncPolicy::default(),
            &select(&[7, 8]),
        );
        assert_eq!(out, Outcome::OutOfRange);
        assert_eq!(state, before);
        assert!(state.is_consistent(&index));
    }

    #[test]
    fn broken_lookup_group_is_ignored() {
        let index = SegmentIndex::build_unstyled(&three_segments());
        for policy in [SyncPolicy::segment_map(), SyncPolicy::line_map()] {
            let mut state = SelectionState::new(&index);
            let lookup_broken = MapEvent::Lookup {
                key: "broken".to_string(),
            };
            let out = transition(&mut state, &index, &lookup(), policy, &lookup_broken);
            assert_eq!(out, Outcome::OutOfRange);
            assert_eq!(state, SelectionState::new(&index));
        }
    }

    #[test]
    fn toggle_never_touches_state() {
        let index = SegmentIndex::build_unstyled(&three_segments());
        let mut state = SelectionState::new(&index);
        transition(&mut state, &index, &lookup(), SyncPolicy::default(), &select(&[1]));
        let before = state.clone();
        for visible in [false, true, false] {
            let out = transition(
                &mut state,
                &index,
                &lookup(),
                SyncPolicy::default(),
                &MapEvent::ShowEndpoints { visible },
            );
            assert!(!out.changes_selection());
            assert_eq!(state, before);
        }
    }

    #[test]
    fn log_numbers_events() {
        let mut log = EventLog::new();
        assert_eq!(log.record(select(&[]), Outcome::AllSelected), 0);
        assert_eq!(log.record(select(&[1]), Outcome::SubsetSelected), 1);
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.events().is_empty());
        assert_eq!(log.record(select(&[2]), Outcome::SubsetSelected), 2);
    }
}
