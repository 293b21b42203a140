//! Expando layout: header height, item stacking and the expanded height

use crate::animation::EasingTable;
use crate::theme::types::Rect;
use crate::widget::{Effects, ItemId};

use super::Expando;

/// Header height for a title image, the theme's bar height and the current
/// header height.
///
/// A taller image always wins and a shorter one falls back to the bar. When
/// the image matches the bar, the header only shrinks to it if the current
/// header is taller; otherwise the current header is kept.
pub fn header_height_for(image_height: Option<i32>, bar_height: i32, current: i32) -> i32 {
    match image_height {
        None => bar_height,
        Some(image) if image > bar_height => image,
        Some(image) if image < bar_height => bar_height,
        Some(image) if image < current => image,
        Some(_) => current,
    }
}

/// Outcome of a layout computation, not yet applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    pub header_height: i32,
    pub expanded_height: i32,
    /// Bounds for every item that takes space, in item order
    pub item_bounds: Vec<(ItemId, Rect)>,
}

impl LayoutPlan {
    pub fn bounds_of(&self, id: ItemId) -> Option<Rect> {
        self.item_bounds
            .iter()
            .find(|(item, _)| *item == id)
            .map(|(_, rect)| *rect)
    }
}

impl Expando {
    fn title_image_height(&self) -> Option<i32> {
        self.title_image
            .or_else(|| self.style().header_image.as_ref().map(|image| image.size))
            .map(|size| size.height)
    }

    /// Compute header height, item positions and expanded height without
    /// touching any state
    pub fn plan_layout(&self) -> LayoutPlan {
        let style = self.style();
        let item_style = &self.theme.taskitem;
        let header_height = header_height_for(
            self.title_image_height(),
            style.title_bar_height,
            self.header_height,
        );

        if !self.auto_layout {
            return LayoutPlan {
                header_height,
                expanded_height: self.expanded_height.max(header_height),
                item_bounds: Vec::new(),
            };
        }

        let width = self.bounds.width;
        let content = Rect::new(0, header_height, width, 0)
            .inset(&style.border)
            .inset(&style.padding);

        let mut item_bounds = Vec::new();
        let mut y = content.y;
        let mut previous_bottom_margin: Option<i32> = None;

        for item in self.items.iter() {
            if !item.visibility().takes_space() {
                continue;
            }
            let margin = item.margin(item_style);
            if let Some(bottom) = previous_bottom_margin {
                y += bottom + margin.top;
            }

            let available = (content.width - margin.horizontal()).max(0);
            let size = item.preferred_size(available, item_style);
            let mut rect = Rect::new(content.x + margin.left, y, size.width, size.height);
            if self.right_to_left {
                rect = rect.mirror(width);
            }
            item_bounds.push((item.id(), rect));

            y += size.height;
            previous_bottom_margin = Some(margin.bottom);
        }

        let expanded_height = y + style.padding.bottom + style.border.bottom;

        LayoutPlan {
            header_height,
            expanded_height: expanded_height.max(header_height),
            item_bounds,
        }
    }

    /// Height the expando would have after a full layout pass
    pub fn preview_height_and_layout(&self) -> i32 {
        self.plan_layout().expanded_height
    }

    /// Run a layout pass and apply it.
    ///
    /// Deferred inside an update scope or initialisation, dropped when a pass
    /// is already running. While animating, item positions are updated but
    /// the expanded and rendered heights are left to the animation.
    pub fn perform_layout(&mut self) -> Effects {
        if self.initialising {
            return Effects::none();
        }
        if self.update.is_updating() {
            self.update.defer();
            return Effects::none();
        }
        if !self.layout_guard.try_enter() {
            return Effects::none();
        }

        self.layout_passes += 1;
        let plan = self.plan_layout();
        let mut effects = Effects::repaint();

        let header_changed = plan.header_height != self.header_height;
        self.header_height = plan.header_height;
        if header_changed && self.is_animating() {
            // The run keeps its expanded height but it may not drop below the header
            self.expanded_height = self.expanded_height.max(self.header_height);
        }
        for (id, rect) in &plan.item_bounds {
            if let Some(item) = self.items.get_mut(*id) {
                item.state_mut().bounds = *rect;
            }
        }

        if !self.is_animating() {
            if plan.expanded_height != self.expanded_height || header_changed {
                log!(
                    "Expando {}: expanded height {} -> {} (header {})",
                    self.id,
                    self.expanded_height,
                    plan.expanded_height,
                    plan.header_height
                );
                self.expanded_height = plan.expanded_height;
                self.recompute_easing();
            }

            let target = self.settled_height();
            if self.bounds.height != target {
                self.bounds.height = target;
                effects.parent_layout = true;
            }
        }

        self.layout_guard.exit();
        effects
    }

    /// Rebuild the fade easing table for the current heights
    pub(super) fn recompute_easing(&mut self) {
        self.easing = EasingTable::compute(
            self.expanded_height,
            self.header_height,
            self.fade_timer.total_steps(),
        );
    }

    pub fn easing_table(&self) -> &EasingTable {
        &self.easing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_without_image_is_bar_height() {
        assert_eq!(header_height_for(None, 25, 40), 25);
    }

    #[test]
    fn test_taller_image_wins() {
        assert_eq!(header_height_for(Some(40), 25, 25), 40);
    }

    #[test]
    fn test_shorter_image_falls_back_to_bar() {
        assert_eq!(header_height_for(Some(10), 25, 40), 25);
    }

    #[test]
    fn test_image_matching_bar_only_shrinks_taller_header() {
        assert_eq!(header_height_for(Some(25), 25, 40), 25);
        // A smaller current header persists
        assert_eq!(header_height_for(Some(25), 25, 20), 20);
        assert_eq!(header_height_for(Some(25), 25, 25), 25);
    }
}
