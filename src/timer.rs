//! Frame scheduling for expando animations
//!
//! A `FrameScheduler` counts discrete animation steps. The host owns the real
//! timer: the scheduler asks it to start/stop ticking through the `Host`
//! trait and is advanced once per delivered tick.

use crate::animation::FRAME_INTERVAL_MS;
use crate::platform::Host;
use crate::widget::ExpandoId;

/// Kind of animation a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Cross-fade used for collapse/expand
    Fade,
    /// Height interpolation used for showing/hiding items
    Slide,
}

/// Timer identifier: one timer per expando and animation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    pub owner: ExpandoId,
    pub kind: AnimationKind,
}

impl TimerId {
    pub fn new(owner: ExpandoId, kind: AnimationKind) -> Self {
        Self { owner, kind }
    }

    /// Pack into a single integer (for platforms with numeric timer ids)
    pub fn to_raw(&self) -> usize {
        let kind = match self.kind {
            AnimationKind::Fade => 0,
            AnimationKind::Slide => 1,
        };
        ((self.owner.0 as usize) << 1) | kind
    }

    /// Inverse of `to_raw`
    pub fn from_raw(raw: usize) -> Self {
        let kind = if raw & 1 == 0 {
            AnimationKind::Fade
        } else {
            AnimationKind::Slide
        };
        Self {
            owner: ExpandoId((raw >> 1) as u64),
            kind,
        }
    }
}

/// One delivered animation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// One-based step index
    pub step: u32,
    pub total: u32,
}

impl FrameTick {
    pub fn is_last(&self) -> bool {
        self.step >= self.total
    }
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running { step: u32 },
    Finished,
}

/// Fixed-interval, fixed-step animation scheduler
#[derive(Debug)]
pub struct FrameScheduler {
    id: TimerId,
    interval_ms: u32,
    total_steps: u32,
    state: SchedulerState,
}

impl FrameScheduler {
    /// Create a stopped scheduler
    pub fn new(id: TimerId, total_steps: u32) -> Self {
        Self {
            id,
            interval_ms: FRAME_INTERVAL_MS,
            total_steps: total_steps.max(1),
            state: SchedulerState::Stopped,
        }
    }

    pub fn with_interval(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// Change the step count. Ignored while a run is active.
    pub fn set_total_steps(&mut self, total_steps: u32) -> bool {
        if self.is_running() {
            log!(
                "FrameScheduler {:?}: ignoring step count change to {} mid-run",
                self.id,
                total_steps
            );
            return false;
        }
        self.total_steps = total_steps.max(1);
        true
    }

    /// Change the tick interval. Ignored while a run is active.
    pub fn set_interval_ms(&mut self, interval_ms: u32) -> bool {
        if self.is_running() {
            log!(
                "FrameScheduler {:?}: ignoring interval change to {}ms mid-run",
                self.id,
                interval_ms
            );
            return false;
        }
        self.interval_ms = interval_ms.max(1);
        true
    }

    /// Begin ticking from step 0
    pub fn start(&mut self, host: &mut dyn Host) {
        if self.is_running() {
            host.stop_timer(self.id);
        }
        self.state = SchedulerState::Running { step: 0 };
        host.start_timer(self.id, self.interval_ms);
    }

    /// Stop ticking. Safe to call at any time.
    pub fn stop(&mut self, host: &mut dyn Host) {
        if self.is_running() {
            host.stop_timer(self.id);
            self.state = SchedulerState::Stopped;
        }
    }

    /// Advance by one step.
    ///
    /// Returns `None` when the scheduler is not running. After the final
    /// step the host timer is stopped and the state becomes `Finished`.
    pub fn advance(&mut self, host: &mut dyn Host) -> Option<FrameTick> {
        let SchedulerState::Running { step } = self.state else {
            return None;
        };

        let tick = FrameTick {
            step: step + 1,
            total: self.total_steps,
        };

        if tick.is_last() {
            host.stop_timer(self.id);
            self.state = SchedulerState::Finished;
        } else {
            self.state = SchedulerState::Running { step: tick.step };
        }

        Some(tick)
    }
}
