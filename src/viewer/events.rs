//! Outbound grid events and their listeners.

use serde::Serialize;

use crate::columns::ActiveListChange;
use crate::layout::{CellPoolOrder, ColumnsViewWidthsChange, InvalidateAction, ScrollerState};

/// Something observable happened to the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "detail")]
pub enum GridEvent {
    LayoutInvalidated(InvalidateAction),
    ColumnsViewWidthsChanged(ColumnsViewWidthsChange),
    CellPoolComputed(CellPoolOrder),
    #[serde(rename_all = "camelCase")]
    ActiveColumnListChanged {
        change: ActiveListChange,
        index: usize,
        count: usize,
        target_index: Option<usize>,
        ui: bool,
    },
    #[serde(rename_all = "camelCase")]
    ColumnsWidthChanged { field_indices: Vec<usize>, ui: bool },
    ScrollerChanged(ScrollerState),
}

/// Handle returned by [`EventHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&GridEvent)>;

/// Fan-out of grid events. Every listener sees every event, in subscription
/// order.
#[derive(Default)]
pub struct EventHub {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn dispatch(&mut self, event: &GridEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}
