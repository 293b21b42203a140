//! Visual style settings for task panes, expandos and task items
//!
//! A `ThemeSettings` value is an explicit, shareable handle: every task pane
//! and expando holds an `Rc<ThemeSettings>` and is told when it changes.
//! Nothing in here is global.

use serde::{Deserialize, Serialize};

use super::types::{Color, Padding, Size};

/// Complete theme: one style per widget kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub taskpane: TaskPaneStyle,
    /// Style for ordinary expandos
    pub expando: ExpandoStyle,
    /// Style for "special" expandos (the highlighted first group)
    pub special_expando: ExpandoStyle,
    pub taskitem: TaskItemStyle,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::classic()
    }
}

impl ThemeSettings {
    /// The built-in blue theme
    pub fn classic() -> Self {
        Self {
            taskpane: TaskPaneStyle::default(),
            expando: ExpandoStyle::default(),
            special_expando: ExpandoStyle::special(),
            taskitem: TaskItemStyle::default(),
        }
    }

    /// Style for the given expando variant
    pub fn expando_style(&self, special: bool) -> &ExpandoStyle {
        if special {
            &self.special_expando
        } else {
            &self.expando
        }
    }
}

/// Style for the scrollable task pane
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPaneStyle {
    pub background_color: Color,
    /// Outer padding; `bottom` doubles as the gap between expandos
    pub padding: Padding,
    /// Color of the drop indicator shown while dragging an expando
    pub insertion_color: Color,
    /// Thickness of the drop indicator
    pub insertion_thickness: i32,
}

impl Default for TaskPaneStyle {
    fn default() -> Self {
        Self {
            background_color: Color::rgb(0x7b, 0xa2, 0xe7),
            padding: Padding::uniform(12),
            insertion_color: Color::rgb(0x21, 0x5d, 0xc6),
            insertion_thickness: 2,
        }
    }
}

/// Header background image metrics supplied by the theme
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaderImage {
    /// Resource path (loading is left to the host)
    pub path: String,
    pub size: Size,
}

/// Style for one expando variant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandoStyle {
    /// Height of the title bar band
    pub title_bar_height: i32,
    pub title_color: Color,
    pub title_hot_color: Color,
    pub title_background: Color,
    /// Inner padding of the title text
    pub title_padding: Padding,
    /// Optional header background image
    pub header_image: Option<HeaderImage>,
    /// Size of the collapse/expand arrow
    pub arrow_size: Size,
    pub arrow_color: Color,
    pub background_color: Color,
    pub border_color: Color,
    /// Border widths around the content area (top is below the header)
    pub border: Padding,
    /// Padding between the border and the items
    pub padding: Padding,
}

impl Default for ExpandoStyle {
    fn default() -> Self {
        Self {
            title_bar_height: 25,
            title_color: Color::rgb(0x21, 0x5d, 0xc6),
            title_hot_color: Color::rgb(0x42, 0x8e, 0xff),
            title_background: Color::rgb(0xc6, 0xd3, 0xf7),
            title_padding: Padding::new(0, 10, 0, 10),
            header_image: None,
            arrow_size: Size::new(18, 18),
            arrow_color: Color::rgb(0x21, 0x5d, 0xc6),
            background_color: Color::rgb(0xd6, 0xdf, 0xf7),
            border_color: Color::WHITE,
            border: Padding::new(0, 1, 1, 1),
            padding: Padding::new(12, 10, 12, 10),
        }
    }
}

impl ExpandoStyle {
    /// The "special" variant: dark title band, light text
    pub fn special() -> Self {
        Self {
            title_color: Color::WHITE,
            title_hot_color: Color::rgb(0x42, 0x8e, 0xff),
            title_background: Color::rgb(0x00, 0x49, 0xc0),
            arrow_color: Color::WHITE,
            background_color: Color::rgb(0xef, 0xf3, 0xff),
            ..Self::default()
        }
    }
}

/// Simple text metrics used for measuring task items
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontMetrics {
    /// Average advance of one character
    pub char_width: i32,
    /// Height of one line of text
    pub line_height: i32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            char_width: 6,
            line_height: 13,
        }
    }
}

impl FontMetrics {
    /// Width of a run of text on one line
    pub fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    /// Word-wrap text into lines no wider than `max_width`
    pub fn wrap(&self, text: &str, max_width: i32) -> Vec<String> {
        let max_chars = (max_width / self.char_width.max(1)).max(1) as usize;
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let mut word = word.to_string();
            // Hard-break words that cannot fit on a line of their own
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(max_chars).collect();
                word = word.chars().skip(max_chars).collect();
                lines.push(head);
            }
            if word.is_empty() {
                continue;
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Style for link-style task items
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskItemStyle {
    pub link_color: Color,
    pub link_hot_color: Color,
    pub disabled_color: Color,
    pub font: FontMetrics,
    pub icon_size: Size,
    /// Gap between icon and text
    pub icon_spacing: i32,
    pub padding: Padding,
    /// Default spacing around items inside an expando
    pub margin: Padding,
}

impl Default for TaskItemStyle {
    fn default() -> Self {
        Self {
            link_color: Color::rgb(0x21, 0x5d, 0xc6),
            link_hot_color: Color::rgb(0x42, 0x8e, 0xff),
            disabled_color: Color::rgb(0x80, 0x80, 0x80),
            font: FontMetrics::default(),
            icon_size: Size::new(16, 16),
            icon_spacing: 6,
            padding: Padding::new(0, 0, 0, 0),
            margin: Padding::new(0, 0, 4, 0),
        }
    }
}
