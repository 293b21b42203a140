//! Headless host with manually pumped timers
//!
//! Records every call the widgets make so tests can assert on ordering, and
//! keeps a virtual clock so animations can be driven deterministically.

use std::collections::BTreeMap;

use crate::theme::types::{Point, Rect};
use crate::timer::TimerId;

use super::Host;

/// A recorded host call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    SuspendLayout,
    ResumeLayout,
    Invalidate(Rect),
    StartTimer(TimerId, u32),
    StopTimer(TimerId),
}

#[derive(Clone, Copy, Debug)]
struct ActiveTimer {
    id: TimerId,
    interval_ms: u32,
    next_due_ms: u64,
}

/// In-memory host
#[derive(Debug, Default)]
pub struct HeadlessHost {
    calls: Vec<HostCall>,
    /// Active timers keyed by raw id for a stable firing order
    timers: BTreeMap<usize, ActiveTimer>,
    now_ms: u64,
    suspend_depth: u32,
    /// Position of the pane's client area on screen
    client_origin: Point,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the pane's client origin at a screen position
    pub fn with_client_origin(mut self, origin: Point) -> Self {
        self.client_origin = origin;
        self
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn suspend_depth(&self) -> u32 {
        self.suspend_depth
    }

    pub fn timer_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id.to_raw())
    }

    pub fn has_active_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Earliest due timer, if any
    pub fn next_due(&self) -> Option<(u64, TimerId)> {
        self.timers
            .values()
            .min_by_key(|t| (t.next_due_ms, t.id.to_raw()))
            .map(|t| (t.next_due_ms, t.id))
    }

    /// Advance the clock to the next due timer and return its id.
    ///
    /// The caller delivers the tick to the widget that owns the timer.
    pub fn pop_due(&mut self) -> Option<TimerId> {
        let (due, id) = self.next_due()?;
        self.now_ms = self.now_ms.max(due);
        if let Some(timer) = self.timers.get_mut(&id.to_raw()) {
            timer.next_due_ms = due + timer.interval_ms as u64;
        }
        Some(id)
    }

    /// Deliver timer ticks until no timer is active or `max_ticks` elapsed.
    ///
    /// Returns the number of ticks delivered.
    pub fn pump<F>(&mut self, max_ticks: usize, mut deliver: F) -> usize
    where
        F: FnMut(TimerId, &mut HeadlessHost),
    {
        let mut delivered = 0;
        while delivered < max_ticks {
            let Some(id) = self.pop_due() else {
                break;
            };
            deliver(id, self);
            delivered += 1;
        }
        delivered
    }
}

impl Host for HeadlessHost {
    fn suspend_layout(&mut self) {
        self.suspend_depth += 1;
        self.calls.push(HostCall::SuspendLayout);
    }

    fn resume_layout(&mut self) {
        self.suspend_depth = self.suspend_depth.saturating_sub(1);
        self.calls.push(HostCall::ResumeLayout);
    }

    fn invalidate(&mut self, rect: Rect) {
        self.calls.push(HostCall::Invalidate(rect));
    }

    fn start_timer(&mut self, timer: TimerId, interval_ms: u32) {
        self.timers.insert(
            timer.to_raw(),
            ActiveTimer {
                id: timer,
                interval_ms,
                next_due_ms: self.now_ms + interval_ms as u64,
            },
        );
        self.calls.push(HostCall::StartTimer(timer, interval_ms));
    }

    fn stop_timer(&mut self, timer: TimerId) {
        self.timers.remove(&timer.to_raw());
        self.calls.push(HostCall::StopTimer(timer));
    }

    fn screen_to_client(&self, point: Point) -> Point {
        point.offset(-self.client_origin.x, -self.client_origin.y)
    }
}
