//! Fade and slide animations
//!
//! Collapse/expand cross-fades a snapshot of the content while the height
//! follows the easing table. Showing or hiding items slides the height
//! towards the previewed layout height. Only one run is active at a time.

use std::rc::Rc;

use crate::animation::{slide_height, FadeDirection};
use crate::platform::Host;
use crate::render::Bitmap;
use crate::theme::types::Point;
use crate::timer::{AnimationKind, TimerId};
use crate::widget::Effects;

use super::Expando;

/// How the fade snapshot was produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureMode {
    /// Content painted as currently laid out
    Live,
    /// Content laid out as if expanded, painted offscreen
    AsExpanded,
}

#[derive(Debug)]
pub(super) struct FadeRun {
    pub(super) direction: FadeDirection,
    pub(super) snapshot: Rc<Bitmap>,
    pub(super) capture: CaptureMode,
    pub(super) step: u32,
    pub(super) total: u32,
}

impl FadeRun {
    pub(super) fn opacity(&self) -> f32 {
        self.direction.opacity_at(self.step, self.total)
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct SlideRun {
    pub(super) target: i32,
}

#[derive(Debug, Default)]
pub(super) enum AnimationState {
    #[default]
    Idle,
    Fading(FadeRun),
    Sliding(SlideRun),
}

impl Expando {
    pub fn is_animating(&self) -> bool {
        !matches!(self.animation, AnimationState::Idle)
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.animation, AnimationState::Fading(_))
    }

    pub fn is_sliding(&self) -> bool {
        matches!(self.animation, AnimationState::Sliding(_))
    }

    /// Snapshot shown during a fade
    pub fn snapshot(&self) -> Option<&Rc<Bitmap>> {
        match &self.animation {
            AnimationState::Fading(run) => Some(&run.snapshot),
            _ => None,
        }
    }

    pub fn capture_mode(&self) -> Option<CaptureMode> {
        match &self.animation {
            AnimationState::Fading(run) => Some(run.capture),
            _ => None,
        }
    }

    /// Height a running slide is heading for
    pub fn slide_target(&self) -> Option<i32> {
        match &self.animation {
            AnimationState::Sliding(run) => Some(run.target),
            _ => None,
        }
    }

    pub(super) fn can_animate(&self) -> bool {
        self.animate
            && !self.design_mode
            && !self.initialising
            && self.visible
            && self.bounds.width > 0
    }

    pub(super) fn can_slide(&self) -> bool {
        self.can_animate() && self.auto_layout && !self.collapsed
    }

    /// Start a fade towards the current collapsed flag
    pub(super) fn start_fade(&mut self, host: &mut dyn Host) -> Effects {
        self.stop_active_run(host);

        let direction = if self.collapsed {
            FadeDirection::Collapsing
        } else {
            FadeDirection::Expanding
        };
        // A collapsed expando has nothing laid out to print
        let capture = match direction {
            FadeDirection::Collapsing => CaptureMode::Live,
            FadeDirection::Expanding => CaptureMode::AsExpanded,
        };

        host.suspend_layout();
        let snapshot = Rc::new(self.capture_content(capture));
        for item in self.items.iter_mut() {
            let state = item.state_mut();
            if state.visible {
                state.suppressed = true;
            }
        }
        host.resume_layout();

        log!(
            "Expando {}: fade {:?} started ({:?} capture, {}x{})",
            self.id,
            direction,
            capture,
            snapshot.width(),
            snapshot.height()
        );

        self.animation = AnimationState::Fading(FadeRun {
            direction,
            snapshot,
            capture,
            step: 0,
            total: self.fade_timer.total_steps(),
        });
        self.fade_timer.start(host);
        Effects::repaint()
    }

    /// Paint the content area (below the header) at full expanded height
    fn capture_content(&self, mode: CaptureMode) -> Bitmap {
        let content_height = (self.expanded_height - self.header_height).max(1);
        let mut bitmap = Bitmap::new(self.bounds.width, content_height);
        let origin = Point::new(0, -self.header_height);
        match mode {
            CaptureMode::Live => {
                self.paint_content(&mut bitmap, origin, self.expanded_height, None);
            }
            CaptureMode::AsExpanded => {
                let plan = self.plan_layout();
                self.paint_content(&mut bitmap, origin, plan.expanded_height, Some(&plan));
            }
        }
        bitmap
    }

    /// Start sliding to the height the current item visibility implies
    pub(super) fn start_slide(&mut self, host: &mut dyn Host) -> Effects {
        self.stop_active_run(host);

        let plan = self.plan_layout();
        if plan.expanded_height == self.expanded_height {
            return self.perform_layout();
        }

        // Items move to their final places; only the height animates
        for (id, rect) in &plan.item_bounds {
            if let Some(item) = self.items.get_mut(*id) {
                item.state_mut().bounds = *rect;
            }
        }

        log!(
            "Expando {}: slide {} -> {} started",
            self.id,
            self.expanded_height,
            plan.expanded_height
        );
        self.animation = AnimationState::Sliding(SlideRun {
            target: plan.expanded_height,
        });
        self.slide_timer.start(host);
        Effects::repaint()
    }

    /// Deliver one timer tick
    pub fn on_timer(&mut self, timer: TimerId, host: &mut dyn Host) -> Effects {
        if timer.owner != self.id {
            return Effects::none();
        }

        let tick = match timer.kind {
            AnimationKind::Fade => self.fade_timer.advance(host),
            AnimationKind::Slide => self.slide_timer.advance(host),
        };
        let Some(tick) = tick else {
            return Effects::none();
        };

        if self.bounds.width == 0 {
            return self.cancel_animation(host);
        }

        match (&mut self.animation, timer.kind) {
            (AnimationState::Fading(run), AnimationKind::Fade) => {
                if tick.is_last() {
                    return self.finish_fade(host);
                }
                run.step = tick.step;
                let height = run.direction.height_at(
                    &self.easing,
                    tick.step,
                    self.expanded_height,
                    self.header_height,
                );
                self.apply_animated_height(height, host)
            }
            (AnimationState::Sliding(run), AnimationKind::Slide) => {
                if tick.is_last() {
                    return self.finish_slide(host);
                }
                let height =
                    slide_height(self.expanded_height, run.target, tick.step, tick.total);
                self.apply_animated_height(height, host)
            }
            _ => {
                // Stray tick from a run that was replaced
                match timer.kind {
                    AnimationKind::Fade => self.fade_timer.stop(host),
                    AnimationKind::Slide => self.slide_timer.stop(host),
                }
                Effects::none()
            }
        }
    }

    fn apply_animated_height(&mut self, height: i32, host: &mut dyn Host) -> Effects {
        self.bounds.height = height;
        self.notify_owner(host)
    }

    /// Ask the pane to re-stack, or repaint ourselves when stand-alone
    fn notify_owner(&mut self, host: &mut dyn Host) -> Effects {
        if self.in_container {
            Effects::relayout()
        } else {
            host.invalidate(self.bounds);
            Effects::repaint()
        }
    }

    fn finish_fade(&mut self, host: &mut dyn Host) -> Effects {
        host.suspend_layout();
        // Dropping the run releases the snapshot
        self.animation = AnimationState::Idle;
        self.restore_items();
        self.bounds.height = self.settled_height();
        self.perform_layout();
        host.resume_layout();

        log!(
            "Expando {}: fade finished, height {}",
            self.id,
            self.bounds.height
        );
        self.notify_owner(host)
    }

    fn finish_slide(&mut self, host: &mut dyn Host) -> Effects {
        if let AnimationState::Sliding(run) = std::mem::take(&mut self.animation) {
            self.bounds.height = run.target;
        }
        self.perform_layout();

        log!(
            "Expando {}: slide finished, height {}",
            self.id,
            self.bounds.height
        );
        self.notify_owner(host)
    }

    /// Abort the active run (the expando lost its width).
    ///
    /// The snapshot is released, items are restored and the height snaps to
    /// where a layout pass puts it.
    pub(crate) fn cancel_animation(&mut self, host: &mut dyn Host) -> Effects {
        if !self.is_animating() {
            return Effects::none();
        }
        log!("Expando {}: animation cancelled (zero width)", self.id);
        self.stop_active_run(host);
        let mut effects = self.perform_layout();
        self.bounds.height = self.settled_height();
        effects.parent_layout = true;
        effects
    }

    /// Stop timers and drop any run without finishing it
    pub(super) fn stop_active_run(&mut self, host: &mut dyn Host) {
        self.fade_timer.stop(host);
        self.slide_timer.stop(host);
        if let AnimationState::Fading(_) = std::mem::take(&mut self.animation) {
            self.restore_items();
        }
    }

    fn restore_items(&mut self) {
        for item in self.items.iter_mut() {
            item.state_mut().suppressed = false;
        }
    }

    /// Release animation resources before the expando is dropped or removed
    pub(crate) fn dispose(&mut self, host: &mut dyn Host) {
        if self.is_animating() {
            log!("Expando {}: disposing running animation", self.id);
        }
        self.stop_active_run(host);
        self.perform_layout();
        self.bounds.height = self.settled_height();
    }
}
