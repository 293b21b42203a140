//! Expando: a collapsible, titled group of items
//!
//! The expando owns its items, its layout state and its animation state.
//! Layout lives in `layout.rs`, the fade/slide state machine in
//! `animator.rs` and drawing in `paint.rs`.

mod animator;
mod layout;
mod paint;

use std::rc::Rc;

use crate::animation::{AnimationSettings, EasingTable};
use crate::error::Result;
use crate::platform::{Event, Host, KeyCode, MouseButton};
use crate::theme::types::{Point, Rect, Size};
use crate::theme::{ExpandoStyle, ThemeSettings};
use crate::timer::{AnimationKind, FrameScheduler, TimerId};

use super::base::{LayoutGuard, UpdateScope};
use super::item::{Item, ItemCollection, ItemVisibility};
use super::{Effects, ExpandoId, ItemId, PaneEvent};

pub use animator::CaptureMode;
pub use layout::{header_height_for, LayoutPlan};

use animator::AnimationState;

/// What the mouse button went down on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pressed {
    Header,
    Item(ItemId),
}

/// A collapsible panel
#[derive(Debug)]
pub struct Expando {
    id: ExpandoId,
    text: String,
    theme: Rc<ThemeSettings>,
    /// Replaces the theme's style when set
    custom_style: Option<ExpandoStyle>,
    special: bool,

    collapsed: bool,
    can_collapse: bool,
    animate: bool,
    auto_layout: bool,
    right_to_left: bool,
    visible: bool,
    design_mode: bool,
    focused: bool,
    initialising: bool,
    in_container: bool,
    /// Size of the title image, if one is shown
    title_image: Option<Size>,

    /// Position in the owner and rendered size
    bounds: Rect,
    header_height: i32,
    expanded_height: i32,

    items: ItemCollection,
    easing: EasingTable,
    fade_timer: FrameScheduler,
    slide_timer: FrameScheduler,
    animation: AnimationState,

    layout_guard: LayoutGuard,
    update: UpdateScope,
    /// A show/hide happened inside the update scope
    slide_requested: bool,
    layout_passes: u32,

    header_hot: bool,
    pressed: Option<Pressed>,
}

impl Expando {
    /// Create an empty, expanded expando
    pub fn new(id: ExpandoId, text: impl Into<String>, theme: Rc<ThemeSettings>) -> Self {
        let settings = AnimationSettings::default();
        let header_height = theme.expando.title_bar_height;

        let mut expando = Self {
            id,
            text: text.into(),
            theme,
            custom_style: None,
            special: false,
            collapsed: false,
            can_collapse: true,
            animate: settings.enabled,
            auto_layout: true,
            right_to_left: false,
            visible: true,
            design_mode: false,
            focused: false,
            initialising: false,
            in_container: false,
            title_image: None,
            bounds: Rect::new(0, 0, 0, header_height),
            header_height,
            expanded_height: header_height,
            items: ItemCollection::new(),
            easing: EasingTable::default(),
            fade_timer: FrameScheduler::new(
                TimerId::new(id, AnimationKind::Fade),
                settings.fade_frames,
            )
            .with_interval(settings.interval_ms),
            slide_timer: FrameScheduler::new(
                TimerId::new(id, AnimationKind::Slide),
                settings.slide_frames,
            )
            .with_interval(settings.interval_ms),
            animation: AnimationState::Idle,
            layout_guard: LayoutGuard::new(),
            update: UpdateScope::default(),
            slide_requested: false,
            layout_passes: 0,
            header_hot: false,
            pressed: None,
        };
        expando.perform_layout();
        expando.recompute_easing();
        expando
    }

    pub fn id(&self) -> ExpandoId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Effects {
        self.text = text.into();
        Effects::repaint()
    }

    // ---- geometry ----

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Current rendered height (differs from the expanded height mid-animation)
    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    pub fn header_height(&self) -> i32 {
        self.header_height
    }

    pub fn expanded_height(&self) -> i32 {
        self.expanded_height
    }

    /// Set the expanded height by hand (meaningful when auto layout is off)
    pub fn set_expanded_height(&mut self, height: i32) -> Effects {
        let height = height.max(self.header_height);
        if height == self.expanded_height {
            return Effects::none();
        }
        self.expanded_height = height;
        self.recompute_easing();
        if !self.collapsed && !self.is_animating() {
            self.bounds.height = height;
            return Effects::relayout();
        }
        Effects::repaint()
    }

    pub fn set_location(&mut self, location: Point) {
        self.bounds.x = location.x;
        self.bounds.y = location.y;
    }

    /// Resize horizontally. A zero width cancels a running animation.
    pub fn set_width(&mut self, width: i32, host: &mut dyn Host) -> Effects {
        let width = width.max(0);
        if width == self.bounds.width {
            return Effects::none();
        }
        self.bounds.width = width;
        if width == 0 && self.is_animating() {
            return self.cancel_animation(host);
        }
        self.perform_layout()
    }

    /// Place the expando inside its owner
    pub(crate) fn arrange(
        &mut self,
        location: Point,
        width: i32,
        host: &mut dyn Host,
    ) -> Effects {
        self.set_location(location);
        self.set_width(width, host)
    }

    pub(crate) fn set_in_container(&mut self, in_container: bool) {
        self.in_container = in_container;
    }

    /// Title bar rectangle in expando coordinates
    pub fn header_bounds(&self) -> Rect {
        Rect::new(0, 0, self.bounds.width, self.header_height)
    }

    /// Collapse/expand arrow rectangle in expando coordinates
    pub fn arrow_bounds(&self) -> Rect {
        let style = self.style();
        let size = style.arrow_size;
        let rect = Rect::new(
            self.bounds.width - style.title_padding.right - size.width,
            (self.header_height - size.height) / 2,
            size.width,
            size.height,
        );
        if self.right_to_left {
            rect.mirror(self.bounds.width)
        } else {
            rect
        }
    }

    // ---- style ----

    /// The style in effect: custom override, else the theme's variant
    pub fn style(&self) -> &ExpandoStyle {
        match &self.custom_style {
            Some(style) => style,
            None => self.theme.expando_style(self.special),
        }
    }

    pub fn theme(&self) -> &Rc<ThemeSettings> {
        &self.theme
    }

    /// Switch to another theme and recompute everything derived from it
    pub fn set_theme(&mut self, theme: Rc<ThemeSettings>) -> Effects {
        self.theme = theme;
        self.style_changed()
    }

    pub fn set_custom_style(&mut self, style: Option<ExpandoStyle>) -> Effects {
        self.custom_style = style;
        self.style_changed()
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    pub fn set_special(&mut self, special: bool) -> Effects {
        if self.special == special {
            return Effects::none();
        }
        self.special = special;
        self.style_changed()
    }

    pub fn title_image(&self) -> Option<Size> {
        self.title_image
    }

    pub fn set_title_image(&mut self, size: Option<Size>) -> Effects {
        self.title_image = size;
        self.style_changed()
    }

    fn style_changed(&mut self) -> Effects {
        let mut effects = self.perform_layout();
        self.recompute_easing();
        effects.needs_repaint = true;
        effects
    }

    // ---- flags ----

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn can_collapse(&self) -> bool {
        self.can_collapse
    }

    /// Forbidding collapse while collapsed expands the expando
    pub fn set_can_collapse(&mut self, can_collapse: bool, host: &mut dyn Host) -> Effects {
        self.can_collapse = can_collapse;
        if !can_collapse && self.collapsed {
            return self.set_collapsed(false, host);
        }
        Effects::repaint()
    }

    pub fn animate(&self) -> bool {
        self.animate
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    /// Apply frame counts and interval. Refused while an animation runs.
    pub fn set_animation_settings(&mut self, settings: AnimationSettings) -> bool {
        self.animate = settings.enabled;
        if self.is_animating() {
            log!(
                "Expando {}: animation settings change refused mid-run",
                self.id
            );
            return false;
        }
        let applied = self.fade_timer.set_total_steps(settings.fade_frames)
            && self.slide_timer.set_total_steps(settings.slide_frames)
            && self.fade_timer.set_interval_ms(settings.interval_ms)
            && self.slide_timer.set_interval_ms(settings.interval_ms);
        self.recompute_easing();
        applied
    }

    pub fn auto_layout(&self) -> bool {
        self.auto_layout
    }

    pub fn set_auto_layout(&mut self, auto_layout: bool) -> Effects {
        self.auto_layout = auto_layout;
        if auto_layout {
            self.perform_layout()
        } else {
            Effects::none()
        }
    }

    pub fn right_to_left(&self) -> bool {
        self.right_to_left
    }

    pub fn set_right_to_left(&mut self, right_to_left: bool) -> Effects {
        if self.right_to_left == right_to_left {
            return Effects::none();
        }
        self.right_to_left = right_to_left;
        let mut effects = self.perform_layout();
        effects.needs_repaint = true;
        effects
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) -> Effects {
        if self.visible == visible {
            return Effects::none();
        }
        self.visible = visible;
        Effects::relayout()
    }

    pub fn design_mode(&self) -> bool {
        self.design_mode
    }

    /// While designing, state changes never animate
    pub fn set_design_mode(&mut self, design_mode: bool) {
        self.design_mode = design_mode;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) -> Effects {
        if self.focused == focused {
            return Effects::none();
        }
        self.focused = focused;
        Effects::repaint()
    }

    pub fn is_header_hot(&self) -> bool {
        self.header_hot
    }

    /// Number of layout passes run so far
    pub fn layout_passes(&self) -> u32 {
        self.layout_passes
    }

    // ---- initialisation ----

    /// Start bulk initialisation: no layout or animation until `end_init`
    pub fn begin_init(&mut self) {
        self.initialising = true;
    }

    pub fn end_init(&mut self) -> Effects {
        self.initialising = false;
        let mut effects = self.perform_layout();
        self.recompute_easing();
        if !self.is_animating() {
            let target = self.settled_height();
            if self.bounds.height != target {
                self.bounds.height = target;
                effects.parent_layout = true;
            }
        }
        effects.needs_repaint = true;
        effects
    }

    pub fn is_initialising(&self) -> bool {
        self.initialising
    }

    // ---- collapse / expand ----

    pub fn collapse(&mut self, host: &mut dyn Host) -> Effects {
        self.set_collapsed(true, host)
    }

    pub fn expand(&mut self, host: &mut dyn Host) -> Effects {
        self.set_collapsed(false, host)
    }

    pub fn toggle(&mut self, host: &mut dyn Host) -> Effects {
        self.set_collapsed(!self.collapsed, host)
    }

    /// Change the collapsed state, animating when allowed.
    ///
    /// Collapsing an expando that cannot collapse is ignored.
    pub fn set_collapsed(&mut self, collapsed: bool, host: &mut dyn Host) -> Effects {
        if collapsed == self.collapsed {
            return Effects::none();
        }
        if collapsed && !self.can_collapse {
            return Effects::none();
        }

        let animated = self.can_animate();
        self.collapsed = collapsed;
        log!(
            "Expando {}: {} ({})",
            self.id,
            if collapsed { "collapsing" } else { "expanding" },
            if animated { "animated" } else { "immediate" }
        );

        let effects = if animated {
            self.start_fade(host)
        } else {
            self.stop_active_run(host);
            self.bounds.height = self.settled_height();
            Effects::relayout()
        };

        effects.with_event(PaneEvent::StateChanged {
            expando: self.id,
            collapsed,
        })
    }

    /// Height when no animation runs
    fn settled_height(&self) -> i32 {
        if self.collapsed {
            self.header_height
        } else {
            self.expanded_height
        }
    }

    // ---- items ----

    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&dyn Item> {
        self.items.get(id)
    }

    pub fn add_item(&mut self, item: Box<dyn Item>) -> Result<Effects> {
        let index = self.items.len();
        self.insert_item(index, item)
    }

    /// Insert at `index` (clamped)
    pub fn insert_item(&mut self, index: usize, item: Box<dyn Item>) -> Result<Effects> {
        self.items.insert(index, item)?;
        Ok(self.items_changed())
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<(Box<dyn Item>, Effects)> {
        let item = self.items.remove(id)?;
        if self.pressed == Some(Pressed::Item(id)) {
            self.pressed = None;
        }
        Ok((item, self.items_changed()))
    }

    /// Move an item to `index` (clamped)
    pub fn move_item(&mut self, id: ItemId, index: usize) -> Result<Effects> {
        self.items.move_to(id, index)?;
        Ok(self.items_changed())
    }

    pub fn hide_item(&mut self, id: ItemId, host: &mut dyn Host) -> Result<Effects> {
        self.hide_items(&[id], host)
    }

    pub fn show_item(&mut self, id: ItemId, host: &mut dyn Host) -> Result<Effects> {
        self.show_items(&[id], host)
    }

    /// Hide several items with a single layout or slide
    pub fn hide_items(&mut self, ids: &[ItemId], host: &mut dyn Host) -> Result<Effects> {
        self.set_items_visible(ids, false, host)
    }

    /// Show several items with a single layout or slide
    pub fn show_items(&mut self, ids: &[ItemId], host: &mut dyn Host) -> Result<Effects> {
        self.set_items_visible(ids, true, host)
    }

    fn set_items_visible(
        &mut self,
        ids: &[ItemId],
        visible: bool,
        host: &mut dyn Host,
    ) -> Result<Effects> {
        // Validate everything first so a bad id leaves no partial change
        if let Some(missing) = ids.iter().find(|id| !self.items.contains(**id)) {
            return Err(crate::error::ExplorerBarError::ItemNotFound(*missing));
        }

        let mut changed = false;
        for id in ids {
            if let Some(item) = self.items.get_mut(*id) {
                let state = item.state_mut();
                if state.visible != visible {
                    state.visible = visible;
                    state.hot = false;
                    changed = true;
                }
            }
        }
        if !changed {
            return Ok(Effects::none());
        }
        Ok(self.visibility_changed(host))
    }

    /// Batch item changes: layout and slides wait for `end_update`
    pub fn begin_update(&mut self) {
        self.update.begin();
    }

    /// Close a batch. At depth zero runs the deferred work once, sliding
    /// when a show/hide was batched and animation is possible.
    pub fn end_update(&mut self, host: &mut dyn Host) -> Effects {
        if !self.update.end() {
            return Effects::none();
        }
        let slide = std::mem::take(&mut self.slide_requested);
        if slide && self.can_slide() {
            self.start_slide(host)
        } else {
            self.perform_layout()
        }
    }

    pub fn is_updating(&self) -> bool {
        self.update.is_updating()
    }

    fn items_changed(&mut self) -> Effects {
        self.perform_layout()
    }

    fn visibility_changed(&mut self, host: &mut dyn Host) -> Effects {
        if self.update.is_updating() {
            self.update.defer();
            self.slide_requested = true;
            return Effects::none();
        }
        if self.can_slide() {
            self.start_slide(host)
        } else {
            self.perform_layout()
        }
    }

    // ---- input ----

    /// Handle an event in expando coordinates
    pub fn handle_event(&mut self, event: &Event, host: &mut dyn Host) -> Effects {
        match *event {
            Event::MouseMove { x, y } => self.update_hot(Some(Point::new(x, y))),
            Event::MouseLeave => self.update_hot(None),
            Event::MouseDown {
                x,
                y,
                button: MouseButton::Left,
            } => {
                let point = Point::new(x, y);
                self.pressed = if self.header_bounds().contains(point) {
                    Some(Pressed::Header)
                } else {
                    self.item_at(point).map(Pressed::Item)
                };
                if self.pressed.is_some() {
                    Effects::consumed()
                } else {
                    Effects::none()
                }
            }
            Event::MouseUp {
                x,
                y,
                button: MouseButton::Left,
            } => {
                let point = Point::new(x, y);
                match self.pressed.take() {
                    Some(Pressed::Header) if self.header_bounds().contains(point) => {
                        let mut effects = self.toggle(host);
                        effects.consumed = true;
                        effects
                    }
                    Some(Pressed::Item(id)) if self.item_at(point) == Some(id) => {
                        let clickable = self.items.get(id).is_some_and(|item| item.is_clickable());
                        if clickable {
                            log!("Expando {}: {} clicked", self.id, id);
                            Effects::consumed().with_event(PaneEvent::ItemClicked {
                                expando: self.id,
                                item: id,
                            })
                        } else {
                            Effects::consumed()
                        }
                    }
                    _ => Effects::none(),
                }
            }
            Event::KeyDown {
                key: KeyCode::Space | KeyCode::Enter,
            } if self.focused => {
                let mut effects = self.toggle(host);
                effects.consumed = true;
                effects
            }
            _ => Effects::none(),
        }
    }

    /// Visible item under a point, if the content is showing
    pub fn item_at(&self, point: Point) -> Option<ItemId> {
        if self.collapsed || self.is_animating() || point.y >= self.bounds.height {
            return None;
        }
        self.items
            .iter()
            .find(|item| item.visibility() == ItemVisibility::Visible && item.bounds().contains(point))
            .map(|item| item.id())
    }

    fn update_hot(&mut self, point: Option<Point>) -> Effects {
        let header_hot = point.is_some_and(|p| self.header_bounds().contains(p));
        let hot_item = point.and_then(|p| self.item_at(p));

        let mut changed = header_hot != self.header_hot;
        self.header_hot = header_hot;
        for item in self.items.iter_mut() {
            let hot = Some(item.id()) == hot_item;
            changed |= item.set_hot(hot);
        }

        if changed {
            Effects::repaint()
        } else {
            Effects::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::{Rc, Weak};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::animation::{slide_height, EasingTable, FADE_FRAMES, SLIDE_FRAMES};
    use crate::platform::headless::{HeadlessHost, HostCall};
    use crate::render::Bitmap;
    use crate::theme::types::Padding;
    use crate::widget::item::FixedItem;
    use crate::widget::TaskItem;

    fn theme() -> Rc<ThemeSettings> {
        Rc::new(ThemeSettings::classic())
    }

    fn block(id: u64, height: i32) -> Box<dyn Item> {
        Box::new(FixedItem::new(ItemId(id), Size::new(50, height)).with_margin(Padding::ZERO))
    }

    /// Expando of fixed height 100 (header 25), 200 wide
    fn fixed_expando(host: &mut HeadlessHost) -> Expando {
        let mut expando = Expando::new(ExpandoId(1), "Details", theme());
        expando.set_auto_layout(false);
        expando.set_expanded_height(100);
        expando.set_width(200, host);
        expando
    }

    /// Expando with four 20px blocks, 200 wide
    fn four_blocks(host: &mut HeadlessHost) -> Expando {
        let mut expando = Expando::new(ExpandoId(2), "Tasks", theme());
        for id in 1..=4 {
            expando.add_item(block(id, 20)).unwrap();
        }
        expando.set_width(200, host);
        expando
    }

    fn run_to_end(expando: &mut Expando, host: &mut HeadlessHost) -> Vec<i32> {
        let mut heights = Vec::new();
        host.pump(1000, |id, host| {
            expando.on_timer(id, host);
            heights.push(expando.height());
        });
        heights
    }

    fn timer_starts(host: &HeadlessHost, kind: AnimationKind) -> usize {
        host.calls()
            .iter()
            .filter(|call| matches!(call, HostCall::StartTimer(id, _) if id.kind == kind))
            .count()
    }

    #[test]
    fn test_new_expando_is_expanded_with_empty_content() {
        let expando = Expando::new(ExpandoId(1), "Empty", theme());
        // header 25 + border 0/1 + padding 12/12
        assert_eq!(expando.header_height(), 25);
        assert_eq!(expando.expanded_height(), 50);
        assert_eq!(expando.height(), 50);
        assert!(!expando.is_collapsed());
    }

    #[test]
    fn test_items_stack_with_margins_between_visible_items() {
        let mut host = HeadlessHost::new();
        let mut expando = Expando::new(ExpandoId(1), "Tasks", theme());
        expando.set_width(200, &mut host);
        let margin = Padding::new(3, 0, 5, 0);
        for id in 1..=3 {
            let item = FixedItem::new(ItemId(id), Size::new(50, 20)).with_margin(margin);
            expando.add_item(Box::new(item)).unwrap();
        }

        let tops: Vec<i32> = expando.items().iter().map(|i| i.bounds().y).collect();
        // content top 37, then +20 +5 bottom +3 top
        assert_eq!(tops, vec![37, 65, 93]);
        assert_eq!(expando.expanded_height(), 93 + 20 + 12 + 1);
        assert_eq!(expando.items().iter().next().map(|i| i.bounds().x), Some(11));

        expando.set_animate(false);
        expando.hide_item(ItemId(2), &mut host).unwrap();
        let tops: Vec<i32> = expando
            .items()
            .iter()
            .filter(|i| i.visibility().takes_space())
            .map(|i| i.bounds().y)
            .collect();
        assert_eq!(tops, vec![37, 65]);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);

        let before: Vec<Rect> = expando.items().iter().map(|i| i.bounds()).collect();
        let height = expando.height();
        let first = expando.perform_layout();
        let after_first: Vec<Rect> = expando.items().iter().map(|i| i.bounds()).collect();
        let second = expando.perform_layout();
        let after_second: Vec<Rect> = expando.items().iter().map(|i| i.bounds()).collect();

        assert_eq!(before, after_first);
        assert_eq!(after_first, after_second);
        assert_eq!(expando.height(), height);
        assert!(!first.parent_layout && !second.parent_layout);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        expando.begin_update();
        expando.hide_item(ItemId(4), &mut host).unwrap();

        assert_eq!(expando.preview_height_and_layout(), 130 - 20);
        assert_eq!(expando.expanded_height(), 130);
        assert_eq!(expando.height(), 130);
    }

    #[test]
    fn test_collapse_scenario_fades_in_23_frames() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        assert_eq!(expando.height(), 100);

        let effects = expando.collapse(&mut host);
        assert_eq!(
            effects.events,
            vec![PaneEvent::StateChanged {
                expando: ExpandoId(1),
                collapsed: true,
            }]
        );
        assert!(expando.is_fading());
        assert_eq!(expando.capture_mode(), Some(CaptureMode::Live));

        let snapshot: Weak<Bitmap> = expando
            .snapshot()
            .map(Rc::downgrade)
            .unwrap_or_default();
        assert_eq!(snapshot.upgrade().map(|s| (s.width(), s.height())), Some((200, 75)));

        let heights = run_to_end(&mut expando, &mut host);

        assert_eq!(heights.len(), FADE_FRAMES as usize);
        assert!(heights[0] > 25 && heights[0] < 100, "frame 1 = {}", heights[0]);
        assert_eq!(heights[FADE_FRAMES as usize - 1], 25);
        for pair in heights.windows(2) {
            assert!(pair[0] >= pair[1]);
        }

        assert!(expando.is_collapsed());
        assert!(!expando.is_animating());
        assert_eq!(expando.height(), 25);
        assert!(expando.snapshot().is_none());
        assert!(snapshot.upgrade().is_none(), "snapshot leaked");
    }

    #[test]
    fn test_collapse_frames_follow_easing_table() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.collapse(&mut host);
        let heights = run_to_end(&mut expando, &mut host);

        let table = EasingTable::compute(100, 25, FADE_FRAMES);
        for (i, height) in heights.iter().enumerate().take(FADE_FRAMES as usize - 1) {
            assert_eq!(*height, table.get(i) + 25);
        }
    }

    #[test]
    fn test_expand_fades_from_header_to_expanded() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.set_animate(false);
        expando.collapse(&mut host);
        assert_eq!(expando.height(), 25);

        expando.set_animate(true);
        let effects = expando.expand(&mut host);
        assert!(effects.events.contains(&PaneEvent::StateChanged {
            expando: ExpandoId(1),
            collapsed: false,
        }));
        assert_eq!(expando.capture_mode(), Some(CaptureMode::AsExpanded));

        let heights = run_to_end(&mut expando, &mut host);
        assert_eq!(heights.len(), FADE_FRAMES as usize);
        assert_eq!(heights[0], 25);
        assert_eq!(*heights.last().unwrap_or(&0), 100);
        assert_eq!(expando.height(), expando.expanded_height());
    }

    #[test]
    fn test_items_are_hidden_under_snapshot_and_restored() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        expando.hide_items(&[ItemId(4)], &mut host).unwrap();
        run_to_end(&mut expando, &mut host);

        expando.collapse(&mut host);
        let states: Vec<ItemVisibility> = expando.items().iter().map(|i| i.visibility()).collect();
        assert_eq!(
            states,
            vec![
                ItemVisibility::HiddenButPresent,
                ItemVisibility::HiddenButPresent,
                ItemVisibility::HiddenButPresent,
                ItemVisibility::Hidden,
            ]
        );

        run_to_end(&mut expando, &mut host);
        let states: Vec<ItemVisibility> = expando.items().iter().map(|i| i.visibility()).collect();
        assert_eq!(
            states,
            vec![
                ItemVisibility::Visible,
                ItemVisibility::Visible,
                ItemVisibility::Visible,
                ItemVisibility::Hidden,
            ]
        );
    }

    #[test]
    fn test_hiding_items_slides_with_cosine_ease() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        // 37 + 4 * 20 + 12 + 1
        assert_eq!(expando.expanded_height(), 130);

        expando
            .hide_items(&[ItemId(3), ItemId(4)], &mut host)
            .unwrap();
        assert!(expando.is_sliding());
        assert_eq!(expando.slide_target(), Some(90));

        let heights = run_to_end(&mut expando, &mut host);
        assert_eq!(heights.len(), SLIDE_FRAMES as usize);
        for (i, height) in heights.iter().enumerate() {
            let step = i as u32 + 1;
            assert_eq!(*height, slide_height(130, 90, step, SLIDE_FRAMES), "step {}", step);
        }
        // Cosine, not linear: a quarter in it has moved less than a quarter
        assert_eq!(heights[4], 124);
        assert_eq!(heights[9], 110);

        assert!(!expando.is_animating());
        assert_eq!(expando.height(), 90);
        assert_eq!(expando.expanded_height(), 90);
    }

    #[test]
    fn test_showing_items_slides_up_to_larger_height() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        expando.set_animate(false);
        expando.hide_item(ItemId(4), &mut host).unwrap();
        assert_eq!(expando.height(), 110);

        expando.set_animate(true);
        expando.show_item(ItemId(4), &mut host).unwrap();
        assert_eq!(expando.slide_target(), Some(130));
        let heights = run_to_end(&mut expando, &mut host);
        assert_eq!(heights.first().copied(), Some(slide_height(110, 130, 1, SLIDE_FRAMES)));
        assert_eq!(expando.height(), 130);
    }

    #[test]
    fn test_batch_defers_layout_until_end_update() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        let passes = expando.layout_passes();

        expando.begin_update();
        expando.begin_update();
        expando.hide_item(ItemId(1), &mut host).unwrap();
        expando.hide_item(ItemId(2), &mut host).unwrap();
        assert!(expando.end_update(&mut host).is_empty());

        assert_eq!(expando.layout_passes(), passes);
        assert!(!expando.is_animating());
        assert_eq!(expando.height(), 130);

        expando.end_update(&mut host);
        assert!(expando.is_sliding());
        assert_eq!(timer_starts(&host, AnimationKind::Slide), 1);
        assert_eq!(expando.layout_passes(), passes);

        run_to_end(&mut expando, &mut host);
        assert_eq!(expando.layout_passes(), passes + 1);
        assert_eq!(expando.height(), 90);
    }

    #[test]
    fn test_batch_without_animation_runs_one_layout() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        expando.set_animate(false);
        let passes = expando.layout_passes();

        expando.begin_update();
        expando.hide_item(ItemId(1), &mut host).unwrap();
        expando.hide_item(ItemId(2), &mut host).unwrap();
        expando.hide_item(ItemId(3), &mut host).unwrap();
        let effects = expando.end_update(&mut host);

        assert_eq!(expando.layout_passes(), passes + 1);
        assert!(effects.parent_layout);
        assert_eq!(expando.height(), 37 + 20 + 13);
        assert_eq!(timer_starts(&host, AnimationKind::Slide), 0);
    }

    #[test]
    fn test_zero_width_cancels_fade_and_releases_snapshot() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.collapse(&mut host);
        let snapshot = expando.snapshot().map(Rc::downgrade).unwrap_or_default();

        host.pump(5, |id, host| {
            expando.on_timer(id, host);
        });
        assert!(expando.is_fading());

        let effects = expando.set_width(0, &mut host);
        assert!(effects.parent_layout);
        assert!(!expando.is_animating());
        assert!(snapshot.upgrade().is_none());
        assert!(!host.has_active_timers());
        assert_eq!(expando.height(), 25);
        assert!(expando.is_collapsed());
    }

    #[test]
    fn test_zero_width_cancels_slide_and_commits_layout() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        expando.hide_item(ItemId(4), &mut host).unwrap();
        host.pump(3, |id, host| {
            expando.on_timer(id, host);
        });

        expando.set_width(0, &mut host);
        assert!(!expando.is_animating());
        assert!(!host.has_active_timers());
        assert_eq!(expando.height(), expando.expanded_height());
        assert_eq!(expando.expanded_height(), 110);
    }

    #[test]
    fn test_new_run_disposes_previous_one() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.collapse(&mut host);
        let first = expando.snapshot().map(Rc::downgrade).unwrap_or_default();
        host.pump(3, |id, host| {
            expando.on_timer(id, host);
        });

        expando.expand(&mut host);
        assert!(first.upgrade().is_none());
        assert!(expando.is_fading());
        assert_eq!(timer_starts(&host, AnimationKind::Fade), 2);

        let heights = run_to_end(&mut expando, &mut host);
        assert_eq!(heights.len(), FADE_FRAMES as usize);
        assert_eq!(expando.height(), 100);
    }

    #[test]
    fn test_cannot_collapse_is_a_silent_no_op() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.set_can_collapse(false, &mut host);

        let effects = expando.collapse(&mut host);
        assert!(effects.is_empty());
        assert!(!expando.is_collapsed());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_forbidding_collapse_while_collapsed_expands() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.set_animate(false);
        expando.collapse(&mut host);

        expando.set_can_collapse(false, &mut host);
        assert!(!expando.is_collapsed());
        assert_eq!(expando.height(), 100);
    }

    #[test]
    fn test_design_mode_and_init_never_animate() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.set_design_mode(true);
        expando.collapse(&mut host);
        assert!(!expando.is_animating());
        assert_eq!(expando.height(), 25);

        expando.set_design_mode(false);
        expando.begin_init();
        expando.expand(&mut host);
        assert!(!expando.is_animating());
        expando.end_init();
        assert_eq!(expando.height(), 100);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_init_defers_layout() {
        let mut host = HeadlessHost::new();
        let mut expando = Expando::new(ExpandoId(1), "Init", theme());
        expando.set_width(200, &mut host);
        let passes = expando.layout_passes();

        expando.begin_init();
        expando.add_item(block(1, 30)).unwrap();
        expando.add_item(block(2, 30)).unwrap();
        assert_eq!(expando.layout_passes(), passes);
        assert_eq!(expando.expanded_height(), 50);

        let effects = expando.end_init();
        assert!(effects.parent_layout);
        assert_eq!(expando.expanded_height(), 37 + 60 + 13);
        assert_eq!(expando.easing_table().get(0), 110 - 25 - 1);
    }

    #[test]
    fn test_expanded_height_never_below_header() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.set_expanded_height(3);
        assert_eq!(expando.expanded_height(), 25);

        expando.set_title_image(Some(Size::new(40, 40)));
        assert_eq!(expando.header_height(), 40);
        assert!(expando.expanded_height() >= 40);
    }

    #[test]
    fn test_title_image_drives_header_height() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        expando.set_title_image(Some(Size::new(32, 40)));
        assert_eq!(expando.header_height(), 40);
        assert_eq!(expando.expanded_height(), 145);

        // Shorter image: back to the bar height
        expando.set_title_image(Some(Size::new(32, 16)));
        assert_eq!(expando.header_height(), 25);
        assert_eq!(expando.expanded_height(), 130);
    }

    #[test]
    fn test_header_click_toggles() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.set_animate(false);

        expando.handle_event(
            &Event::MouseDown {
                x: 50,
                y: 10,
                button: MouseButton::Left,
            },
            &mut host,
        );
        let effects = expando.handle_event(
            &Event::MouseUp {
                x: 52,
                y: 11,
                button: MouseButton::Left,
            },
            &mut host,
        );

        assert!(effects.consumed);
        assert!(expando.is_collapsed());
    }

    #[test]
    fn test_keyboard_toggles_only_when_focused() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.set_animate(false);
        let space = Event::KeyDown {
            key: KeyCode::Space,
        };

        expando.handle_event(&space, &mut host);
        assert!(!expando.is_collapsed());

        expando.set_focused(true);
        expando.handle_event(&space, &mut host);
        assert!(expando.is_collapsed());
    }

    #[test]
    fn test_link_click_reports_item() {
        let mut host = HeadlessHost::new();
        let mut expando = Expando::new(ExpandoId(3), "Links", theme());
        expando.set_width(200, &mut host);
        expando
            .add_item(Box::new(TaskItem::new(ItemId(9), "Search")))
            .unwrap();

        let down = Event::MouseDown {
            x: 15,
            y: 40,
            button: MouseButton::Left,
        };
        let up = Event::MouseUp {
            x: 16,
            y: 41,
            button: MouseButton::Left,
        };
        expando.handle_event(&down, &mut host);
        let effects = expando.handle_event(&up, &mut host);

        assert_eq!(
            effects.events,
            vec![PaneEvent::ItemClicked {
                expando: ExpandoId(3),
                item: ItemId(9),
            }]
        );
    }

    #[test]
    fn test_hover_tracks_header_and_items() {
        let mut host = HeadlessHost::new();
        let mut expando = Expando::new(ExpandoId(3), "Links", theme());
        expando.set_width(200, &mut host);
        expando
            .add_item(Box::new(TaskItem::new(ItemId(9), "Search")))
            .unwrap();

        let effects = expando.handle_event(&Event::MouseMove { x: 5, y: 5 }, &mut host);
        assert!(effects.needs_repaint);
        assert!(expando.is_header_hot());

        expando.handle_event(&Event::MouseMove { x: 15, y: 40 }, &mut host);
        assert!(!expando.is_header_hot());
        assert!(expando.item(ItemId(9)).is_some_and(|i| i.state().hot));

        expando.handle_event(&Event::MouseLeave, &mut host);
        assert!(expando.item(ItemId(9)).is_some_and(|i| !i.state().hot));
    }

    #[test]
    fn test_right_to_left_mirrors_arrow_and_items() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);
        assert_eq!(expando.arrow_bounds().x, 200 - 10 - 18);
        let ltr_x = expando.items().iter().next().map(|i| i.bounds().x);
        assert_eq!(ltr_x, Some(11));

        expando.set_right_to_left(true);
        assert_eq!(expando.arrow_bounds().x, 10);
        let rtl_x = expando.items().iter().next().map(|i| i.bounds().x);
        assert_eq!(rtl_x, Some(200 - 11 - 50));
    }

    #[test]
    fn test_item_errors_leave_collection_intact() {
        let mut host = HeadlessHost::new();
        let mut expando = four_blocks(&mut host);

        assert!(matches!(
            expando.add_item(block(1, 5)),
            Err(crate::error::ExplorerBarError::InvalidArgument(_))
        ));
        assert_eq!(
            expando
                .hide_items(&[ItemId(1), ItemId(42)], &mut host)
                .unwrap_err(),
            crate::error::ExplorerBarError::ItemNotFound(ItemId(42))
        );
        assert!(expando.items().iter().all(|i| i.state().visible));
        assert_eq!(expando.items().len(), 4);

        expando.move_item(ItemId(1), 99).unwrap();
        assert_eq!(
            expando.items().ids(),
            vec![ItemId(2), ItemId(3), ItemId(4), ItemId(1)]
        );
    }

    #[test]
    fn test_standalone_animation_invalidates_host() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.collapse(&mut host);
        host.clear_calls();

        let effects = host
            .pop_due()
            .map(|id| expando.on_timer(id, &mut host))
            .unwrap_or_default();
        assert!(!effects.parent_layout);
        assert!(host
            .calls()
            .iter()
            .any(|call| matches!(call, HostCall::Invalidate(_))));
    }

    #[test]
    fn test_settings_change_refused_mid_run() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.collapse(&mut host);

        let settings = AnimationSettings {
            fade_frames: 10,
            ..AnimationSettings::default()
        };
        assert!(!expando.set_animation_settings(settings));
        assert_eq!(run_to_end(&mut expando, &mut host).len(), FADE_FRAMES as usize);

        assert!(expando.set_animation_settings(settings));
        expando.expand(&mut host);
        assert_eq!(run_to_end(&mut expando, &mut host).len(), 10);
        assert_eq!(expando.easing_table().len(), 10);
    }

    #[test]
    fn test_ticks_for_other_expandos_are_ignored() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        let other = TimerId::new(ExpandoId(99), AnimationKind::Fade);
        assert!(expando.on_timer(other, &mut host).is_empty());
    }

    #[test]
    fn test_paint_header_and_fading_content() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        let mut surface = Bitmap::new(200, 100);
        expando.paint(&mut surface, Point::new(0, 0));

        let style = expando.style().clone();
        assert_eq!(surface.pixel(1, 1), Some(style.title_background.to_rgba8()));
        assert_eq!(surface.pixel(100, 60), Some(style.background_color.to_rgba8()));

        expando.collapse(&mut host);
        host.pump(1, |id, host| {
            expando.on_timer(id, host);
        });
        let mut faded = Bitmap::new(200, 100);
        expando.paint(&mut faded, Point::new(0, 0));
        // Snapshot drawn at 22/23 opacity over a transparent surface
        let alpha = faded.pixel(100, 60).map(|p| p[3]).unwrap_or(0);
        assert!(alpha > 200 && alpha < 255, "alpha {}", alpha);
    }

    #[test]
    fn test_taller_header_mid_fade_keeps_expanded_height_above_header() {
        let mut host = HeadlessHost::new();
        let mut expando = fixed_expando(&mut host);
        expando.collapse(&mut host);
        host.pump(3, |id, host| {
            expando.on_timer(id, host);
        });
        assert!(expando.is_fading());

        expando.set_title_image(Some(Size::new(20, 120)));
        assert_eq!(expando.header_height(), 120);
        assert!(expando.expanded_height() >= expando.header_height());

        run_to_end(&mut expando, &mut host);
        assert!(!expando.is_animating());
        assert_eq!(expando.height(), 120);
    }
}
