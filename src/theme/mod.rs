//! Theme module - style data read by the layout and paint code
//!
//! Themes are plain data. Loading them from visual-style files is left to
//! the host; `ThemeSettings` can also be deserialized from the TOML
//! configuration.

pub mod settings;
pub mod types;

pub use settings::{
    ExpandoStyle, FontMetrics, HeaderImage, TaskItemStyle, TaskPaneStyle, ThemeSettings,
};
pub use types::{Color, Padding, Point, Rect, Size};
