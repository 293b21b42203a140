//! Drag-and-drop reordering of expandos inside a task pane

use crate::theme::types::{Padding, Point, Rect};

use super::ExpandoId;

/// Pointer travel before a press on a header turns into a drag
pub const DRAG_THRESHOLD: i32 = 4;

/// Where a dragged expando would land
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropTarget {
    /// Insertion slot among the laid out expandos (0..=len)
    pub slot: usize,
    /// Pixel row of the drop indicator
    pub row: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DragState {
    #[default]
    Idle,
    /// Button down on a header, not yet moved far enough
    Pressed { expando: ExpandoId, origin: Point },
    Dragging {
        expando: ExpandoId,
        original_index: usize,
        target: Option<DropTarget>,
    },
}

/// Drag state machine
#[derive(Clone, Copy, Debug, Default)]
pub struct DragReorder {
    state: DragState,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Expando being pressed or dragged
    pub fn subject(&self) -> Option<ExpandoId> {
        match self.state {
            DragState::Idle => None,
            DragState::Pressed { expando, .. } | DragState::Dragging { expando, .. } => {
                Some(expando)
            }
        }
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        match self.state {
            DragState::Dragging { target, .. } => target,
            _ => None,
        }
    }

    /// Button went down on an expando header
    pub fn press(&mut self, expando: ExpandoId, origin: Point) {
        self.state = DragState::Pressed { expando, origin };
    }

    /// Whether `point` is far enough from the press to start dragging
    pub fn exceeds_threshold(&self, point: Point) -> bool {
        match self.state {
            DragState::Pressed { origin, .. } => {
                (point.x - origin.x).abs() > DRAG_THRESHOLD
                    || (point.y - origin.y).abs() > DRAG_THRESHOLD
            }
            _ => false,
        }
    }

    /// Enter the dragging state for `expando` at its current index
    pub fn begin(&mut self, expando: ExpandoId, original_index: usize) {
        log!("Drag: {} picked up at index {}", expando, original_index);
        self.state = DragState::Dragging {
            expando,
            original_index,
            target: None,
        };
    }

    pub fn set_target(&mut self, target: Option<DropTarget>) -> bool {
        match &mut self.state {
            DragState::Dragging { target: current, .. } => {
                let changed = *current != target;
                *current = target;
                changed
            }
            _ => false,
        }
    }

    /// Finish the drag. Returns the expando, its original index and the
    /// drop target when there is one.
    pub fn finish(&mut self) -> Option<(ExpandoId, usize, DropTarget)> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging {
                expando,
                original_index,
                target: Some(target),
            } => Some((expando, original_index, target)),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Find the insertion slot for a pointer.
///
/// `panels` are the laid out expando bounds in stacking order and `pane` the
/// pane's client area. Returns `None` when the pointer is outside the pane.
pub fn compute_drop_target(
    panels: &[Rect],
    point: Point,
    pane: Rect,
    padding: &Padding,
) -> Option<DropTarget> {
    if !pane.contains(point) {
        return None;
    }

    // Midpoints are ordered, so the slot is a partition point
    let slot = panels.partition_point(|rect| rect.y + rect.height / 2 <= point.y);

    let row = match (slot.checked_sub(1).and_then(|i| panels.get(i)), panels.get(slot)) {
        (None, Some(first)) => first.y - padding.top / 2,
        (Some(above), Some(below)) => (above.bottom() + below.y) / 2,
        (Some(last), None) => last.bottom() + padding.bottom / 2,
        (None, None) => pane.y + padding.top / 2,
    };

    Some(DropTarget { slot, row })
}

/// Index the dragged expando ends up at once removed from `original`
pub fn final_index(original: usize, slot: usize) -> usize {
    if slot > original {
        slot - 1
    } else {
        slot
    }
}
