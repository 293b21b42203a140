//! Explorer bar configuration (explorerbar.toml)

use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationSettings;
use crate::error::Result;
use crate::platform::Host;
use crate::theme::{Color, Size, ThemeSettings};
use crate::widget::{Expando, ExpandoId, ItemId, TaskItem, TaskPane};

const CONFIG_FILE: &str = "explorerbar.toml";

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerBarConfig {
    pub animation: AnimationSettings,
    pub taskpane: TaskPaneConfig,
    /// Theme overrides; missing fields keep the classic values
    pub theme: ThemeSettings,
    /// Panels created by `build_pane`
    pub panels: Vec<PanelConfig>,
}

/// Task pane behaviour
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPaneConfig {
    pub allow_dragging: bool,
    pub prevent_auto_scroll: bool,
}

/// One panel and its items
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub text: String,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default = "default_true")]
    pub can_collapse: bool,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

/// A link item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Color>,
}

fn default_true() -> bool {
    true
}

impl ExplorerBarConfig {
    /// Find explorerbar.toml in standard locations
    pub fn find_config_path() -> Option<PathBuf> {
        // Check in order: user config dir, exe dir, cwd
        let candidates = [
            dirs::config_dir().map(|p| p.join("explorerbar").join(CONFIG_FILE)),
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE))),
            Some(PathBuf::from(CONFIG_FILE)),
        ];

        candidates.into_iter().flatten().find(|c| c.exists())
    }

    /// Load configuration, falling back to defaults when none is found or it
    /// does not parse
    pub fn load() -> Self {
        let Some(path) = Self::find_config_path() else {
            log!("No {} found, using defaults", CONFIG_FILE);
            return Self::default();
        };
        match Self::load_from_path(&path) {
            Ok(config) => {
                log!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                log!("Failed to load {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Create a task pane holding the configured panels
    pub fn build_pane(&self, size: Size, host: &mut dyn Host) -> Result<TaskPane> {
        let theme = Rc::new(self.theme.clone());
        let mut pane = TaskPane::new(Rc::clone(&theme));
        pane.set_animation_settings(self.animation);
        pane.set_allow_dragging(self.taskpane.allow_dragging);
        pane.set_prevent_auto_scroll(self.taskpane.prevent_auto_scroll);

        pane.begin_update(host);
        pane.set_size(size, host);

        let mut next_item = 1;
        for (index, panel) in self.panels.iter().enumerate() {
            let id = ExpandoId(index as u64 + 1);
            let mut expando = Expando::new(id, panel.text.as_str(), Rc::clone(&theme));
            expando.begin_init();
            expando.set_special(panel.special);
            expando.set_can_collapse(panel.can_collapse, host);
            for item in &panel.items {
                let mut task = TaskItem::new(ItemId(next_item), item.text.as_str());
                if let Some(icon) = item.icon {
                    task = task.with_icon(icon);
                }
                next_item += 1;
                expando.add_item(Box::new(task))?;
            }
            if panel.collapsed {
                expando.collapse(host);
            }
            expando.end_init();
            pane.add_expando(expando, host)?;
        }

        pane.end_update(host);
        // Panels start collapsed or expanded; there is nothing to report yet
        pane.drain_events();
        Ok(pane)
    }
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}
