//! Platform abstraction layer
//!
//! The widgets never talk to a window system directly. Everything they need
//! from the host (timers, invalidation, layout suspension, coordinate
//! mapping) goes through the `Host` trait. A headless implementation is
//! always available; a Win32 one is provided on Windows.

pub mod headless;

#[cfg(target_os = "windows")]
pub mod win32;

use crate::theme::types::{Point, Rect};
use crate::timer::TimerId;

/// Services the hosting window system provides to the widgets.
///
/// All calls are synchronous and made on the UI thread.
pub trait Host {
    /// Stop the host from recalculating layout until `resume_layout`
    fn suspend_layout(&mut self);

    /// Undo one `suspend_layout`
    fn resume_layout(&mut self);

    /// Schedule a repaint of a region (pane client coordinates)
    fn invalidate(&mut self, rect: Rect);

    /// Start delivering ticks for `timer` every `interval_ms`
    fn start_timer(&mut self, timer: TimerId, interval_ms: u32);

    /// Stop delivering ticks for `timer`
    fn stop_timer(&mut self, timer: TimerId);

    /// Map a screen position to pane client coordinates
    fn screen_to_client(&self, point: Point) -> Point;
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the widgets react to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Enter,
    Up,
    Down,
    Tab,
    Escape,
    Other(u32),
}

/// Platform-neutral input events, positions in pane client coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    MouseMove { x: i32, y: i32 },
    MouseDown { x: i32, y: i32, button: MouseButton },
    MouseUp { x: i32, y: i32, button: MouseButton },
    MouseLeave,
    KeyDown { key: KeyCode },
    Resize { width: i32, height: i32 },
}

impl Event {
    /// Pointer position carried by mouse events
    pub fn position(&self) -> Option<Point> {
        match *self {
            Event::MouseMove { x, y }
            | Event::MouseDown { x, y, .. }
            | Event::MouseUp { x, y, .. } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}
