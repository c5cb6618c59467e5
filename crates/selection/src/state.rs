use serde::Serialize;
use tracing::warn;

use crate::segment_index::MarkerSource;
use crate::set::SelectionSet;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing selected: every segment and every marker is shown.
    AllSelected,
    SubsetSelected,
}

/// Shared selection driving every linked view.
///
/// `selected_markers` is always derived from `marker_focus`: the union of the
/// focused segments' marker lists, or every marker when the focus is empty.
/// The focus equals `selected_segments` except after a markers-only lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    selected_segments: SelectionSet,
    selected_markers: SelectionSet,
    marker_focus: SelectionSet,
}

impl SelectionState {
    /// Initial state: nothing selected.
    pub fn new<S: MarkerSource + ?Sized>(source: &S) -> Self {
        Self {
            selected_segments: SelectionSet::new(),
            selected_markers: source.all_markers(),
            marker_focus: SelectionSet::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.selected_segments.is_empty() {
            Phase::AllSelected
        } else {
            Phase::SubsetSelected
        }
    }

    pub fn selected_segments(&self) -> &SelectionSet {
        &self.selected_segments
    }

    pub fn selected_markers(&self) -> &SelectionSet {
        &self.selected_markers
    }

    pub fn marker_focus(&self) -> &SelectionSet {
        &self.marker_focus
    }

    /// Segments to show: the selection, or all of them when nothing is selected.
    pub fn visible_segments<S: MarkerSource + ?Sized>(&self, source: &S) -> SelectionSet {
        if self.selected_segments.is_empty() {
            SelectionSet::full(source.segment_count())
        } else {
            self.selected_segments.clone()
        }
    }

    /// Replaces the segment selection and re-derives the markers.
    pub fn select<S: MarkerSource + ?Sized>(
        &mut self,
        source: &S,
        segments: SelectionSet,
    ) -> Phase {
        self.marker_focus = segments.clone();
        self.selected_segments = segments;
        self.selected_markers = derive_markers(source, &self.marker_focus);
        self.phase()
    }

    /// Re-derives the markers from `segments` without touching the segment selection.
    pub fn focus_markers<S: MarkerSource + ?Sized>(&mut self, source: &S, segments: SelectionSet) {
        self.marker_focus = segments;
        self.selected_markers = derive_markers(source, &self.marker_focus);
    }

    /// Checks the marker derivation against `source`.
    pub fn is_consistent<S: MarkerSource + ?Sized>(&self, source: &S) -> bool {
        self.selected_markers == derive_markers(source, &self.marker_focus)
    }
}

fn derive_markers<S: MarkerSource + ?Sized>(source: &S, focus: &SelectionSet) -> SelectionSet {
    if focus.is_empty() {
        source.all_markers()
    } else {
        source.markers_for(focus)
    }
}

/// Keeps the indices that name an existing segment.
///
/// Returns the kept set and how many raw indices were dropped.
pub fn sanitize_indices<S, I>(source: &S, raw: I) -> (SelectionSet, usize)
where
    S: MarkerSource + ?Sized,
    I: IntoIterator<Item = u32>,
{
    let limit = source.segment_count();
    let mut kept = SelectionSet::new();
    let mut dropped = 0usize;
    for index in raw {
        if index < limit {
            kept.insert(index);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!(dropped, segment_count = limit, "ignoring out-of-range segment indices");
    }
    (kept, dropped)
}
