//! Expando painting

use crate::render::Surface;
use crate::theme::types::{Point, Rect};
use crate::widget::item::ItemVisibility;

use super::animator::AnimationState;
use super::layout::LayoutPlan;
use super::Expando;

impl Expando {
    /// Paint with the expando's top-left corner at `origin`
    pub fn paint(&self, surface: &mut dyn Surface, origin: Point) {
        if !self.visible || self.bounds.width <= 0 {
            return;
        }

        self.paint_header(surface, origin);

        if self.bounds.height <= self.header_height {
            return;
        }

        match &self.animation {
            AnimationState::Fading(run) => {
                let visible = Rect::new(
                    0,
                    0,
                    self.bounds.width,
                    self.bounds.height - self.header_height,
                );
                surface.draw_bitmap(
                    &run.snapshot,
                    visible,
                    origin.offset(0, self.header_height),
                    run.opacity(),
                );
            }
            _ => self.paint_content(surface, origin, self.bounds.height, None),
        }
    }

    fn paint_header(&self, surface: &mut dyn Surface, origin: Point) {
        let style = self.style();
        let font = &self.theme.taskitem.font;
        let width = self.bounds.width;
        let header = self.header_bounds().translate(origin.x, origin.y);

        surface.fill_rect(header, style.title_background);

        let mut text_left = style.title_padding.left;
        if let Some(image) = self.title_image {
            let mut rect = Rect::new(0, self.header_height - image.height, image.width, image.height);
            if self.right_to_left {
                rect = rect.mirror(width);
            }
            surface.fill_rect(
                rect.translate(origin.x, origin.y),
                style.title_color.with_opacity(0.3),
            );
            text_left += image.width;
        }

        let color = if self.header_hot {
            style.title_hot_color
        } else {
            style.title_color
        };
        let text_width = font.text_width(&self.text);
        let text_x = if self.right_to_left {
            width - text_left - text_width
        } else {
            text_left
        };
        let text_y = (self.header_height - font.line_height) / 2;
        surface.draw_text(
            &self.text,
            Point::new(origin.x + text_x, origin.y + text_y),
            color,
            font,
        );

        if self.can_collapse {
            self.paint_arrow(surface, origin);
        }

        if self.focused {
            surface.stroke_rect(header, color.with_opacity(0.5), 1);
        }
    }

    /// Chevron pointing down when collapsed, up when expanded
    fn paint_arrow(&self, surface: &mut dyn Surface, origin: Point) {
        let style = self.style();
        let arrow = self.arrow_bounds().translate(origin.x, origin.y);
        let color = if self.header_hot {
            style.title_hot_color
        } else {
            style.arrow_color
        };

        surface.stroke_rect(arrow, color.with_opacity(0.4), 1);

        let cx = arrow.x + arrow.width / 2;
        let cy = arrow.y + arrow.height / 2;
        for i in 0..4 {
            let y = if self.collapsed { cy - 2 + i } else { cy + 1 - i };
            surface.fill_rect(Rect::new(cx - 4 + i, y, 2, 1), color);
            surface.fill_rect(Rect::new(cx + 2 - i, y, 2, 1), color);
        }
    }

    /// Paint background, border and items down to `height`.
    ///
    /// With a plan, items are painted where the plan puts them instead of
    /// at their live bounds.
    pub(super) fn paint_content(
        &self,
        surface: &mut dyn Surface,
        origin: Point,
        height: i32,
        plan: Option<&LayoutPlan>,
    ) {
        let style = self.style();
        let item_style = &self.theme.taskitem;
        let width = self.bounds.width;
        let content = Rect::new(0, self.header_height, width, height - self.header_height);
        if content.is_empty() {
            return;
        }

        surface.fill_rect(content.translate(origin.x, origin.y), style.background_color);

        let border = style.border;
        let strips = [
            Rect::new(0, content.y, border.left, content.height),
            Rect::new(width - border.right, content.y, border.right, content.height),
            Rect::new(0, content.y, width, border.top),
            Rect::new(0, content.bottom() - border.bottom, width, border.bottom),
        ];
        for strip in strips {
            surface.fill_rect(strip.translate(origin.x, origin.y), style.border_color);
        }

        for item in self.items.iter() {
            let planned = plan.and_then(|plan| plan.bounds_of(item.id()));
            let rect = match planned {
                Some(rect) => rect,
                None if item.visibility() == ItemVisibility::Visible => item.bounds(),
                None => continue,
            };
            if rect.y >= height {
                continue;
            }
            item.paint(surface, rect.translate(origin.x, origin.y), item_style);
        }
    }
}
