//! Explorerbar - collapsible task panels with animated expand/collapse
//!
//! A `TaskPane` stacks `Expando` panels, each holding link-style items.
//! Collapse and expand cross-fade a snapshot of the panel content while the
//! height follows an eased curve; showing or hiding items slides the height.
//! Everything the widgets need from a window system goes through
//! `platform::Host`, so the whole stack runs headless in tests.

// Include the log module first so the log! macro works everywhere
#[macro_use]
pub mod log;

pub mod animation;
pub mod config;
pub mod error;
pub mod platform;
pub mod render;
pub mod theme;
pub mod timer;
pub mod widget;

pub use config::ExplorerBarConfig;
pub use error::{ExplorerBarError, Result};
pub use widget::{Expando, ExpandoId, ItemId, PaneEvent, TaskItem, TaskPane};
