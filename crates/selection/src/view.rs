use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::set::SelectionSet;

/// Which linked view an adapter is; decides the index set it is pushed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewRole {
    /// Data table; receives segment rows.
    Table,
    /// Map line layer; receives segment rows.
    Lines,
    /// Endpoint marker layer; receives marker indices.
    Endpoints,
}

/// Rendering surface driven by the controller.
///
/// Adapters never mutate the selection; they only draw what they are pushed.
pub trait ViewAdapter {
    fn role(&self) -> ViewRole;

    fn render(&mut self, selected: &SelectionSet);

    /// Only the endpoint layer reacts to visibility.
    fn set_visible(&mut self, _visible: bool) {}
}

// Lets a caller keep a handle on a view it registered with the controller.
impl<T: ViewAdapter + ?Sized> ViewAdapter for Rc<RefCell<T>> {
    fn role(&self) -> ViewRole {
        self.borrow().role()
    }

    fn render(&mut self, selected: &SelectionSet) {
        self.borrow_mut().render(selected);
    }

    fn set_visible(&mut self, visible: bool) {
        self.borrow_mut().set_visible(visible);
    }
}

/// Adapter that keeps every call it receives. Useful for headless sessions
/// and for checking what a front-end would have been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingView {
    role: ViewRole,
    renders: Vec<SelectionSet>,
    visible: Option<bool>,
}

impl RecordingView {
    pub fn new(role: ViewRole) -> Self {
        Self {
            role,
            renders: Vec::new(),
            visible: None,
        }
    }

    pub fn shared(role: ViewRole) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(role)))
    }

    pub fn renders(&self) -> &[SelectionSet] {
        &self.renders
    }

    pub fn last(&self) -> Option<&SelectionSet> {
        self.renders.last()
    }

    /// Last visibility pushed, `None` if never set.
    pub fn visible(&self) -> Option<bool> {
        self.visible
    }
}

impl ViewAdapter for RecordingView {
    fn role(&self) -> ViewRole {
        self.role
    }

    fn render(&mut self, selected: &SelectionSet) {
        self.renders.push(selected.clone());
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = Some(visible);
    }
}
