//! Explorer bar widgets
//!
//! A `TaskPane` stacks collapsible `Expando` panels; each expando stacks its
//! child items. Widgets do not hold back-references: operations report what
//! the caller has to do next through an `Effects` value.

pub mod base;
pub mod drag;
pub mod expando;
pub mod item;
pub mod taskitem;
pub mod taskpane;

use std::fmt;

pub use base::{LayoutGuard, UpdateScope};
pub use drag::{DragReorder, DropTarget};
pub use expando::{CaptureMode, Expando};
pub use item::{FixedItem, Item, ItemCollection, ItemState, ItemVisibility};
pub use taskitem::TaskItem;
pub use taskpane::TaskPane;

/// Identity of an expando within a task pane
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpandoId(pub u64);

impl fmt::Display for ExpandoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expando#{}", self.0)
    }
}

/// Identity of an item within an expando
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Notifications queued by the task pane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneEvent {
    /// An expando's collapsed flag flipped
    StateChanged { expando: ExpandoId, collapsed: bool },
    /// A link item was clicked
    ItemClicked { expando: ExpandoId, item: ItemId },
    /// An expando was moved by drag and drop
    Reordered { expando: ExpandoId, index: usize },
}

/// Result of an expando operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Effects {
    /// Widget wants to be repainted
    pub needs_repaint: bool,
    /// Event was consumed (don't propagate)
    pub consumed: bool,
    /// The owning pane must re-run its layout pass
    pub parent_layout: bool,
    /// Notifications for the owner
    pub events: Vec<PaneEvent>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            consumed: true,
            ..Default::default()
        }
    }

    pub fn repaint() -> Self {
        Self {
            needs_repaint: true,
            ..Default::default()
        }
    }

    pub fn relayout() -> Self {
        Self {
            needs_repaint: true,
            parent_layout: true,
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event: PaneEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: Effects) {
        self.needs_repaint |= other.needs_repaint;
        self.consumed |= other.consumed;
        self.parent_layout |= other.parent_layout;
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        !self.needs_repaint && !self.consumed && !self.parent_layout && self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_events_in_order() {
        let mut a = Effects::repaint().with_event(PaneEvent::StateChanged {
            expando: ExpandoId(1),
            collapsed: true,
        });
        a.merge(Effects::relayout().with_event(PaneEvent::ItemClicked {
            expando: ExpandoId(1),
            item: ItemId(3),
        }));

        assert!(a.parent_layout && a.needs_repaint && !a.consumed);
        assert_eq!(a.events.len(), 2);
        assert!(matches!(a.events[1], PaneEvent::ItemClicked { .. }));
    }

    #[test]
    fn test_none_is_empty() {
        assert!(Effects::none().is_empty());
        assert!(!Effects::consumed().is_empty());
    }
}
