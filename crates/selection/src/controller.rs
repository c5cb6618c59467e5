use std::rc::Rc;

use tracing::{debug, trace};

use crate::events::{EventLog, LoggedEvent, MapEvent, Outcome, transition};
use crate::lookup::LookupIndex;
use crate::policy::{SyncPolicy, TableFilter};
use crate::segment_index::SegmentIndex;
use crate::set::SelectionSet;
use crate::state::{Phase, SelectionState};
use crate::view::{ViewAdapter, ViewRole};

/// Owns the selection state and pushes it to every registered view.
///
/// Views are rendered in registration order. All of them are updated before
/// [`handle`](Self::handle) returns.
pub struct SelectionController {
    index: Rc<SegmentIndex>,
    lookup: LookupIndex,
    policy: SyncPolicy,
    state: SelectionState,
    endpoints_visible: bool,
    views: Vec<Box<dyn ViewAdapter>>,
    log: EventLog,
}

impl SelectionController {
    /// Starts with nothing selected and the endpoint layer hidden.
    pub fn new(index: Rc<SegmentIndex>, lookup: LookupIndex, policy: SyncPolicy) -> Self {
        let state = SelectionState::new(&*index);
        Self {
            index,
            lookup,
            policy,
            state,
            endpoints_visible: false,
            views: Vec::new(),
            log: EventLog::new(),
        }
    }

    pub fn with_endpoints_visible(mut self, visible: bool) -> Self {
        self.endpoints_visible = visible;
        self
    }

    /// Adds a view and brings it in line with the current state.
    pub fn register(&mut self, mut view: Box<dyn ViewAdapter>) {
        let role = view.role();
        view.render(&self.render_set(role));
        if role == ViewRole::Endpoints {
            view.set_visible(self.endpoints_visible);
        }
        debug!(?role, views = self.views.len() + 1, "view registered");
        self.views.push(view);
    }

    pub fn handle(&mut self, event: MapEvent) -> Outcome {
        let outcome = transition(
            &mut self.state,
            &*self.index,
            &self.lookup,
            self.policy,
            &event,
        );
        debug!(?event, ?outcome, "selection event");

        match outcome {
            Outcome::EndpointsShown => self.push_visibility(true),
            Outcome::EndpointsHidden => self.push_visibility(false),
            o if o.changes_selection() => self.push_selection(),
            _ => {}
        }
        self.log.record(event, outcome);
        outcome
    }

    /// Map or table pick; an empty pick clears the selection.
    pub fn select(&mut self, indices: impl IntoIterator<Item = u32>) -> Outcome {
        self.handle(MapEvent::Select {
            indices: indices.into_iter().collect(),
        })
    }

    pub fn submit_key(&mut self, key: impl Into<String>) -> Outcome {
        self.handle(MapEvent::Lookup { key: key.into() })
    }

    pub fn set_endpoints_visible(&mut self, visible: bool) -> Outcome {
        self.handle(MapEvent::ShowEndpoints { visible })
    }

    pub fn toggle_endpoints(&mut self) -> Outcome {
        self.set_endpoints_visible(!self.endpoints_visible)
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn selected_segments(&self) -> &SelectionSet {
        self.state.selected_segments()
    }

    pub fn selected_markers(&self) -> &SelectionSet {
        self.state.selected_markers()
    }

    pub fn endpoints_visible(&self) -> bool {
        self.endpoints_visible
    }

    pub fn index(&self) -> &SegmentIndex {
        &self.index
    }

    pub fn lookup(&self) -> &LookupIndex {
        &self.lookup
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn events(&self) -> &[LoggedEvent] {
        self.log.events()
    }

    pub fn drain_events(&mut self) -> Vec<LoggedEvent> {
        self.log.drain()
    }

    /// Index set a view of `role` should show for the current state.
    pub fn render_set(&self, role: ViewRole) -> SelectionSet {
        match (role, self.policy.table) {
            (ViewRole::Table, TableFilter::ShowAll) => self.index.all_segments(),
            (ViewRole::Table, TableFilter::FollowSelection) | (ViewRole::Lines, _) => {
                self.state.visible_segments(&*self.index)
            }
            (ViewRole::Endpoints, _) => self.state.selected_markers().clone(),
        }
    }

    fn push_selection(&mut self) {
        let segments = self.render_set(ViewRole::Lines);
        let table = self.render_set(ViewRole::Table);
        let markers = self.render_set(ViewRole::Endpoints);
        for view in &mut self.views {
            let role = view.role();
            let set = match role {
                ViewRole::Table => &table,
                ViewRole::Lines => &segments,
                ViewRole::Endpoints => &markers,
            };
            trace!(?role, count = set.len(), "render");
            view.render(set);
        }
    }

    fn push_visibility(&mut self, visible: bool) {
        self.endpoints_visible = visible;
        for view in &mut self.views {
            if view.role() == ViewRole::Endpoints {
                trace!(visible, "endpoint visibility");
                view.set_visible(visible);
            }
        }
    }
}
