//! Task pane: a scrollable stack of expandos
//!
//! The pane owns its expandos, stacks them top to bottom and routes input,
//! timer ticks and expando notifications. Expandos report what they need
//! through `Effects`; the pane applies them.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::animation::AnimationSettings;
use crate::error::{ExplorerBarError, Result};
use crate::platform::{Event, Host, MouseButton};
use crate::render::Surface;
use crate::theme::types::{Point, Rect, Size};
use crate::theme::ThemeSettings;
use crate::timer::TimerId;

use super::base::{LayoutGuard, UpdateScope};
use super::drag::{compute_drop_target, final_index, DragReorder, DropTarget};
use super::expando::Expando;
use super::{Effects, ExpandoId, PaneEvent};

/// Container of expandos
#[derive(Debug)]
pub struct TaskPane {
    theme: Rc<ThemeSettings>,
    animation: AnimationSettings,
    expandos: Vec<Expando>,
    /// Client area size
    size: Size,
    visible: bool,
    allow_dragging: bool,
    prevent_auto_scroll: bool,

    scroll_position: i32,
    content_height: i32,

    layout_guard: LayoutGuard,
    update: UpdateScope,
    layout_passes: u32,

    drag: DragReorder,
    events: VecDeque<PaneEvent>,
    /// Expando under the pointer
    hot: Option<ExpandoId>,
    /// Expando that received the last button press
    captured: Option<ExpandoId>,
    focused: Option<ExpandoId>,
}

impl TaskPane {
    pub fn new(theme: Rc<ThemeSettings>) -> Self {
        Self {
            theme,
            animation: AnimationSettings::default(),
            expandos: Vec::new(),
            size: Size::ZERO,
            visible: true,
            allow_dragging: false,
            prevent_auto_scroll: false,
            scroll_position: 0,
            content_height: 0,
            layout_guard: LayoutGuard::new(),
            update: UpdateScope::default(),
            layout_passes: 0,
            drag: DragReorder::new(),
            events: VecDeque::new(),
            hot: None,
            captured: None,
            focused: None,
        }
    }

    // ---- properties ----

    pub fn theme(&self) -> &Rc<ThemeSettings> {
        &self.theme
    }

    /// Switch theme: every expando recomputes its metrics, then one layout
    pub fn set_theme(&mut self, theme: Rc<ThemeSettings>, host: &mut dyn Host) {
        log!("TaskPane: theme changed");
        self.theme = theme;
        for expando in &mut self.expandos {
            let effects = expando.set_theme(Rc::clone(&self.theme));
            self.events.extend(effects.events);
        }
        self.perform_layout(host);
    }

    pub fn animation_settings(&self) -> AnimationSettings {
        self.animation
    }

    /// Apply animation settings to every expando.
    ///
    /// Returns `false` if any expando refused because it is animating.
    pub fn set_animation_settings(&mut self, settings: AnimationSettings) -> bool {
        self.animation = settings;
        self.expandos
            .iter_mut()
            .fold(true, |ok, expando| expando.set_animation_settings(settings) && ok)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size, host: &mut dyn Host) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.perform_layout(host);
    }

    pub fn client_rect(&self) -> Rect {
        Rect::new(0, 0, self.size.width, self.size.height)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// An invisible pane lays out every expando, hidden ones included
    pub fn set_visible(&mut self, visible: bool, host: &mut dyn Host) {
        self.visible = visible;
        self.perform_layout(host);
    }

    pub fn allow_dragging(&self) -> bool {
        self.allow_dragging
    }

    pub fn set_allow_dragging(&mut self, allow: bool) {
        self.allow_dragging = allow;
        if !allow {
            self.drag.cancel();
        }
    }

    pub fn prevent_auto_scroll(&self) -> bool {
        self.prevent_auto_scroll
    }

    pub fn set_prevent_auto_scroll(&mut self, prevent: bool) {
        self.prevent_auto_scroll = prevent;
    }

    pub fn layout_passes(&self) -> u32 {
        self.layout_passes
    }

    /// Whether any expando is animating
    pub fn is_animating(&self) -> bool {
        self.expandos.iter().any(Expando::is_animating)
    }

    // ---- expando collection ----

    pub fn expandos(&self) -> &[Expando] {
        &self.expandos
    }

    pub fn expando(&self, id: ExpandoId) -> Option<&Expando> {
        self.expandos.iter().find(|e| e.id() == id)
    }

    pub fn index_of(&self, id: ExpandoId) -> Option<usize> {
        self.expandos.iter().position(|e| e.id() == id)
    }

    /// Ids in stacking order
    pub fn order(&self) -> Vec<ExpandoId> {
        self.expandos.iter().map(Expando::id).collect()
    }

    pub fn add_expando(&mut self, expando: Expando, host: &mut dyn Host) -> Result<usize> {
        let index = self.expandos.len();
        self.insert_expando(index, expando, host)
    }

    /// Insert at `index` (clamped). The expando adopts the pane's theme and
    /// animation settings.
    pub fn insert_expando(
        &mut self,
        index: usize,
        mut expando: Expando,
        host: &mut dyn Host,
    ) -> Result<usize> {
        if self.index_of(expando.id()).is_some() {
            return Err(ExplorerBarError::InvalidArgument(format!(
                "{} is already in the task pane",
                expando.id()
            )));
        }

        expando.set_in_container(true);
        if !Rc::ptr_eq(expando.theme(), &self.theme) {
            expando.set_theme(Rc::clone(&self.theme));
        }
        expando.set_animation_settings(self.animation);

        let index = index.min(self.expandos.len());
        self.expandos.insert(index, expando);
        self.perform_layout(host);
        Ok(index)
    }

    /// Remove an expando, releasing its animation resources
    pub fn remove_expando(&mut self, id: ExpandoId, host: &mut dyn Host) -> Result<Expando> {
        let index = self
            .index_of(id)
            .ok_or(ExplorerBarError::ExpandoNotFound(id))?;
        let mut expando = self.expandos.remove(index);
        expando.dispose(host);
        expando.set_in_container(false);

        for slot in [&mut self.hot, &mut self.captured, &mut self.focused] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        if self.drag.subject() == Some(id) {
            self.drag.cancel();
        }

        self.perform_layout(host);
        Ok(expando)
    }

    /// Move an expando to `index` (clamped). Returns the final index.
    pub fn move_expando(
        &mut self,
        id: ExpandoId,
        index: usize,
        host: &mut dyn Host,
    ) -> Result<usize> {
        let from = self
            .index_of(id)
            .ok_or(ExplorerBarError::ExpandoNotFound(id))?;
        let expando = self.expandos.remove(from);
        let index = index.min(self.expandos.len());
        self.expandos.insert(index, expando);
        self.perform_layout(host);
        Ok(index)
    }

    /// Run an operation on one expando and apply what it reports
    pub fn with_expando<F>(&mut self, id: ExpandoId, host: &mut dyn Host, f: F) -> Result<()>
    where
        F: FnOnce(&mut Expando, &mut dyn Host) -> Result<Effects>,
    {
        let index = self
            .index_of(id)
            .ok_or(ExplorerBarError::ExpandoNotFound(id))?;
        let was_collapsed = self.expandos[index].is_collapsed();
        let effects = f(&mut self.expandos[index], host)?;
        self.apply(id, effects, host);

        let expando = &self.expandos[index];
        if was_collapsed && !expando.is_collapsed() && !expando.is_animating() {
            self.auto_scroll(id, host);
        }
        Ok(())
    }

    pub fn collapse(&mut self, id: ExpandoId, host: &mut dyn Host) -> Result<()> {
        self.with_expando(id, host, |e, host| Ok(e.collapse(host)))
    }

    pub fn expand(&mut self, id: ExpandoId, host: &mut dyn Host) -> Result<()> {
        self.with_expando(id, host, |e, host| Ok(e.expand(host)))
    }

    pub fn toggle(&mut self, id: ExpandoId, host: &mut dyn Host) -> Result<()> {
        self.with_expando(id, host, |e, host| Ok(e.toggle(host)))
    }

    pub fn collapse_all(&mut self, host: &mut dyn Host) {
        self.set_all_collapsed(true, None, host);
    }

    pub fn expand_all(&mut self, host: &mut dyn Host) {
        self.set_all_collapsed(false, None, host);
    }

    /// Collapse every expando except `id`, which is expanded
    pub fn collapse_all_but_one(&mut self, id: ExpandoId, host: &mut dyn Host) -> Result<()> {
        if self.index_of(id).is_none() {
            return Err(ExplorerBarError::ExpandoNotFound(id));
        }
        self.set_all_collapsed(true, Some(id), host);
        Ok(())
    }

    fn set_all_collapsed(&mut self, collapsed: bool, except: Option<ExpandoId>, host: &mut dyn Host) {
        self.begin_update(host);
        for index in 0..self.expandos.len() {
            let expando = &mut self.expandos[index];
            let id = expando.id();
            let target = if Some(id) == except {
                !collapsed
            } else {
                collapsed
            };
            let effects = expando.set_collapsed(target, host);
            self.apply(id, effects, host);
        }
        self.end_update(host);
    }

    fn apply(&mut self, id: ExpandoId, effects: Effects, host: &mut dyn Host) {
        self.events.extend(effects.events);
        if effects.parent_layout {
            self.perform_layout(host);
        } else if effects.needs_repaint {
            if let Some(expando) = self.expando(id) {
                host.invalidate(expando.bounds());
            }
        }
    }

    /// Take queued notifications, oldest first
    pub fn drain_events(&mut self) -> Vec<PaneEvent> {
        self.events.drain(..).collect()
    }

    // ---- layout ----

    /// Suspend layout until the matching `end_update`
    pub fn begin_update(&mut self, host: &mut dyn Host) {
        if !self.update.is_updating() {
            host.suspend_layout();
        }
        self.update.begin();
    }

    /// Close one level; at depth zero run one layout pass if anything changed
    pub fn end_update(&mut self, host: &mut dyn Host) {
        if !self.update.is_updating() {
            return;
        }
        let run_layout = self.update.end();
        if !self.update.is_updating() {
            host.resume_layout();
        }
        if run_layout {
            self.perform_layout(host);
        }
    }

    pub fn is_updating(&self) -> bool {
        self.update.is_updating()
    }

    /// Stack visible expandos from the top padding down
    pub fn perform_layout(&mut self, host: &mut dyn Host) {
        if self.update.is_updating() {
            self.update.defer();
            return;
        }
        if !self.layout_guard.try_enter() {
            return;
        }
        self.layout_passes += 1;

        let padding = self.theme.taskpane.padding;
        let width = (self.size.width - padding.horizontal()).max(0);
        let mut y = padding.top - self.scroll_position;

        for expando in &mut self.expandos {
            // Hidden while we are shown: skip. Not shown yet: lay out anyway.
            if !expando.is_visible() && self.visible {
                continue;
            }
            let effects = expando.arrange(Point::new(padding.left, y), width, host);
            self.events.extend(effects.events);
            y += expando.height() + padding.bottom;
        }
        self.content_height = y + self.scroll_position;

        let max_scroll = self.max_scroll();
        if self.scroll_position > max_scroll {
            let shift = self.scroll_position - max_scroll;
            self.scroll_position = max_scroll;
            for expando in &mut self.expandos {
                let bounds = expando.bounds();
                expando.set_location(Point::new(bounds.x, bounds.y + shift));
            }
        }

        self.layout_guard.exit();
        host.invalidate(self.client_rect());
    }

    // ---- scrolling ----

    /// Total height of the stacked expandos including padding
    pub fn content_height(&self) -> i32 {
        self.content_height
    }

    pub fn scroll_position(&self) -> i32 {
        self.scroll_position
    }

    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.size.height).max(0)
    }

    /// Scroll to `position` (clamped)
    pub fn set_scroll_position(&mut self, position: i32, host: &mut dyn Host) {
        let position = position.clamp(0, self.max_scroll());
        if position == self.scroll_position {
            return;
        }
        self.scroll_position = position;
        self.perform_layout(host);
    }

    /// Scroll the least amount that brings the expando fully into view
    pub fn scroll_into_view(&mut self, id: ExpandoId, host: &mut dyn Host) {
        let Some(expando) = self.expando(id) else {
            return;
        };
        let padding = self.theme.taskpane.padding;
        let top = expando.bounds().y + self.scroll_position;
        let bottom = top + expando.height();

        let mut target = self.scroll_position;
        if bottom + padding.bottom > target + self.size.height {
            target = bottom + padding.bottom - self.size.height;
        }
        if top - padding.top < target {
            target = top - padding.top;
        }
        self.set_scroll_position(target, host);
    }

    fn auto_scroll(&mut self, id: ExpandoId, host: &mut dyn Host) {
        if !self.prevent_auto_scroll {
            self.scroll_into_view(id, host);
        }
    }

    // ---- timers ----

    /// Deliver a timer tick to the expando that owns it
    pub fn on_timer(&mut self, timer: TimerId, host: &mut dyn Host) {
        let Some(index) = self.index_of(timer.owner) else {
            // Owner is gone
            host.stop_timer(timer);
            return;
        };

        let expanding = {
            let expando = &self.expandos[index];
            expando.is_fading() && !expando.is_collapsed()
        };
        let effects = self.expandos[index].on_timer(timer, host);
        self.apply(timer.owner, effects, host);

        if expanding && !self.expandos[index].is_animating() {
            self.auto_scroll(timer.owner, host);
        }
    }

    // ---- input ----

    /// Visible expando containing a point
    pub fn expando_at(&self, point: Point) -> Option<ExpandoId> {
        self.expandos
            .iter()
            .find(|e| e.is_visible() && e.bounds().contains(point))
            .map(Expando::id)
    }

    /// Handle an event in pane coordinates. Returns whether to repaint.
    pub fn handle_event(&mut self, event: &Event, host: &mut dyn Host) -> bool {
        match *event {
            Event::Resize { width, height } => {
                self.set_size(Size::new(width, height), host);
                true
            }
            Event::MouseDown { x, y, button } => {
                let point = Point::new(x, y);
                let target = self.expando_at(point);
                self.set_focus(target);
                self.captured = target;

                let Some(id) = target else {
                    return false;
                };
                if button == MouseButton::Left && self.can_drag() {
                    let on_header = self
                        .expando(id)
                        .is_some_and(|e| e.header_bounds().contains(to_local(point, e)));
                    if on_header {
                        self.drag.press(id, point);
                    }
                }
                self.forward(id, event, host)
            }
            Event::MouseMove { x, y } => {
                let point = Point::new(x, y);
                if self.drag.exceeds_threshold(point) {
                    if let Some(id) = self.drag.subject() {
                        self.begin_drag(id);
                    }
                }
                if self.drag.is_dragging() {
                    return self.update_drop_point(point);
                }
                self.track_hot(point, event, host)
            }
            Event::MouseUp { .. } => {
                if self.drag.is_dragging() {
                    self.drop(host);
                    self.captured = None;
                    return true;
                }
                self.drag.cancel();
                match self.captured.take() {
                    Some(id) => self.forward(id, event, host),
                    None => false,
                }
            }
            Event::MouseLeave => match self.hot.take() {
                Some(id) => self.forward(id, event, host),
                None => false,
            },
            Event::KeyDown { .. } => match self.focused {
                Some(id) => self.forward(id, event, host),
                None => false,
            },
        }
    }

    fn set_focus(&mut self, target: Option<ExpandoId>) {
        if self.focused == target {
            return;
        }
        for expando in &mut self.expandos {
            let focused = Some(expando.id()) == target;
            if expando.is_focused() != focused {
                expando.set_focused(focused);
            }
        }
        self.focused = target;
    }

    fn track_hot(&mut self, point: Point, event: &Event, host: &mut dyn Host) -> bool {
        let target = self.expando_at(point);
        let mut repaint = false;
        if target != self.hot {
            if let Some(old) = self.hot.take() {
                repaint |= self.forward(old, &Event::MouseLeave, host);
            }
            self.hot = target;
        }
        if let Some(id) = target {
            repaint |= self.forward(id, event, host);
        }
        repaint
    }

    /// Send an event to an expando in its own coordinates
    fn forward(&mut self, id: ExpandoId, event: &Event, host: &mut dyn Host) -> bool {
        let mut repaint = false;
        let result = self.with_expando(id, host, |expando, host| {
            let local = to_local_event(event, expando);
            let effects = expando.handle_event(&local, host);
            repaint = effects.needs_repaint || effects.parent_layout;
            Ok(effects)
        });
        result.is_ok() && repaint
    }

    // ---- drag and drop ----

    fn can_drag(&self) -> bool {
        self.allow_dragging && !self.is_animating()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Start dragging an expando. Refused unless dragging is allowed and
    /// nothing is animating.
    pub fn begin_drag(&mut self, id: ExpandoId) -> bool {
        if !self.can_drag() {
            self.drag.cancel();
            return false;
        }
        match self.index_of(id) {
            Some(index) => {
                self.drag.begin(id, index);
                true
            }
            None => false,
        }
    }

    /// Pointer moved during a drag (screen coordinates)
    pub fn drag_over(&mut self, screen: Point, host: &mut dyn Host) -> bool {
        let point = host.screen_to_client(screen);
        self.update_drop_point(point)
    }

    fn update_drop_point(&mut self, point: Point) -> bool {
        if !self.drag.is_dragging() {
            return false;
        }
        let laid_out: Vec<(usize, Rect)> = self
            .expandos
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_visible())
            .map(|(index, e)| (index, e.bounds()))
            .collect();
        let rects: Vec<Rect> = laid_out.iter().map(|(_, rect)| *rect).collect();

        let padding = self.theme.taskpane.padding;
        let target = compute_drop_target(&rects, point, self.client_rect(), &padding).map(
            |target| DropTarget {
                // Slot among visible expandos -> collection index
                slot: laid_out
                    .get(target.slot)
                    .map(|(index, _)| *index)
                    .unwrap_or(self.expandos.len()),
                row: target.row,
            },
        );
        self.drag.set_target(target)
    }

    /// Drop the dragged expando. Returns its new index.
    pub fn drop(&mut self, host: &mut dyn Host) -> Option<usize> {
        let (id, original, target) = self.drag.finish()?;
        let index = final_index(original, target.slot);
        log!(
            "TaskPane: dropped {} from {} into slot {} -> index {}",
            id,
            original,
            target.slot,
            index
        );
        let index = self.move_expando(id, index, host).ok()?;
        self.events.push_back(PaneEvent::Reordered { expando: id, index });
        Some(index)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Drop indicator bar, while a drag has a target
    pub fn drop_indicator(&self) -> Option<Rect> {
        let target = self.drag.drop_target()?;
        let style = &self.theme.taskpane;
        let thickness = style.insertion_thickness.max(1);
        Some(Rect::new(
            style.padding.left,
            target.row - thickness / 2,
            (self.size.width - style.padding.horizontal()).max(0),
            thickness,
        ))
    }

    // ---- painting ----

    pub fn paint(&self, surface: &mut dyn Surface) {
        let style = &self.theme.taskpane;
        let client = self.client_rect();
        surface.fill_rect(client, style.background_color);

        for expando in &self.expandos {
            let bounds = expando.bounds();
            if !expando.is_visible() || bounds.intersect(&client).is_empty() {
                continue;
            }
            expando.paint(surface, bounds.location());
        }

        if let Some(bar) = self.drop_indicator() {
            surface.fill_rect(bar, style.insertion_color);
        }
    }
}

fn to_local(point: Point, expando: &Expando) -> Point {
    let bounds = expando.bounds();
    point.offset(-bounds.x, -bounds.y)
}

fn to_local_event(event: &Event, expando: &Expando) -> Event {
    match *event {
        Event::MouseMove { x, y } => {
            let p = to_local(Point::new(x, y), expando);
            Event::MouseMove { x: p.x, y: p.y }
        }
        Event::MouseDown { x, y, button } => {
            let p = to_local(Point::new(x, y), expando);
            Event::MouseDown { x: p.x, y: p.y, button }
        }
        Event::MouseUp { x, y, button } => {
            let p = to_local(Point::new(x, y), expando);
            Event::MouseUp { x: p.x, y: p.y, button }
        }
        other => other,
    }
}
