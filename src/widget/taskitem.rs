//! Link-style task item: an optional icon followed by wrapped text

use crate::render::Surface;
use crate::theme::types::{Color, Point, Rect, Size};
use crate::theme::TaskItemStyle;

use super::item::{Item, ItemState};
use super::ItemId;

/// A clickable link inside an expando
#[derive(Clone, Debug)]
pub struct TaskItem {
    id: ItemId,
    text: String,
    /// Icon drawn as a colour swatch (image loading is left to the host)
    icon: Option<Color>,
    enabled: bool,
    state: ItemState,
}

impl TaskItem {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            icon: None,
            enabled: true,
            state: ItemState::default(),
        }
    }

    pub fn with_icon(mut self, icon: Color) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn icon(&self) -> Option<Color> {
        self.icon
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Horizontal space taken by the icon and its gap
    fn icon_extent(&self, style: &TaskItemStyle) -> i32 {
        if self.icon.is_some() {
            style.icon_size.width + style.icon_spacing
        } else {
            0
        }
    }

    fn text_color(&self, style: &TaskItemStyle) -> Color {
        if !self.enabled {
            style.disabled_color
        } else if self.state.hot {
            style.link_hot_color
        } else {
            style.link_color
        }
    }
}

impl Item for TaskItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn state(&self) -> &ItemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }

    fn preferred_size(&self, available_width: i32, style: &TaskItemStyle) -> Size {
        let font = &style.font;
        let chrome = style.padding.horizontal() + self.icon_extent(style);
        let text_space = (available_width - chrome).max(font.char_width);
        let lines = font.wrap(&self.text, text_space);

        let text_width = lines
            .iter()
            .map(|line| font.text_width(line))
            .max()
            .unwrap_or(0);
        let text_height = lines.len() as i32 * font.line_height;

        let icon_height = if self.icon.is_some() {
            style.icon_size.height
        } else {
            0
        };

        Size::new(
            (text_width + chrome).min(available_width.max(0)),
            text_height.max(icon_height) + style.padding.vertical(),
        )
    }

    fn paint(&self, surface: &mut dyn Surface, rect: Rect, style: &TaskItemStyle) {
        let inner = rect.inset(&style.padding);
        let mut text_left = inner.x;

        if let Some(icon) = self.icon {
            let swatch = Rect::new(
                inner.x,
                inner.y,
                style.icon_size.width,
                style.icon_size.height,
            );
            surface.fill_rect(swatch, icon);
            text_left += style.icon_spacing + style.icon_size.width;
        }

        let font = &style.font;
        let color = self.text_color(style);
        let text_space = (inner.right() - text_left).max(font.char_width);
        for (row, line) in font.wrap(&self.text, text_space).iter().enumerate() {
            let top = inner.y + row as i32 * font.line_height;
            surface.draw_text(line, Point::new(text_left, top), color, font);
            if self.state.hot && self.enabled {
                let underline = Rect::new(
                    text_left,
                    top + font.line_height - 1,
                    font.text_width(line),
                    1,
                );
                surface.fill_rect(underline, color);
            }
        }
    }

    fn is_clickable(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Bitmap;
    use crate::theme::FontMetrics;

    fn style() -> TaskItemStyle {
        TaskItemStyle {
            font: FontMetrics {
                char_width: 6,
                line_height: 13,
            },
            ..TaskItemStyle::default()
        }
    }

    #[test]
    fn test_single_line_size() {
        let item = TaskItem::new(ItemId(1), "Search");
        assert_eq!(item.preferred_size(200, &style()), Size::new(36, 13));
    }

    #[test]
    fn test_icon_sets_minimum_height_and_adds_width() {
        let item = TaskItem::new(ItemId(1), "Go").with_icon(Color::WHITE);
        // 16 icon + 6 gap + 12 text
        assert_eq!(item.preferred_size(200, &style()), Size::new(34, 16));
    }

    #[test]
    fn test_text_wraps_in_narrow_space() {
        let item = TaskItem::new(ItemId(1), "Add or remove programs");
        let size = item.preferred_size(60, &style());
        assert_eq!(size.height, 3 * 13);
        assert!(size.width <= 60);
    }

    #[test]
    fn test_disabled_item_is_not_clickable() {
        let mut item = TaskItem::new(ItemId(1), "Print");
        assert!(item.is_clickable());
        item.set_enabled(false);
        assert!(!item.is_clickable());
    }

    #[test]
    fn test_paint_draws_icon_swatch() {
        let item = TaskItem::new(ItemId(1), "Go").with_icon(Color::rgb(255, 0, 0));
        let mut surface = Bitmap::new(60, 20);
        item.paint(&mut surface, Rect::new(0, 0, 60, 20), &style());
        assert_eq!(surface.pixel(0, 0), Some([255, 0, 0, 255]));
    }
}
