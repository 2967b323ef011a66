use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::storage::config::validate_timeouts;
use crate::storage::ToastConfig;

/// Invoked when the body of a toast is clicked.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Screen anchor for the toast stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPosition {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Icon shown beside the toast body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    None,
    /// Built-in icon chosen by level.
    #[default]
    Default,
    FontAwesome(String),
    Material(String),
}

impl IconKind {
    /// Whether the renderer should reserve the icon slot at all.
    pub fn is_visible(&self) -> bool {
        match self {
            IconKind::None => false,
            IconKind::Default => true,
            IconKind::FontAwesome(name) | IconKind::Material(name) => !name.trim().is_empty(),
        }
    }
}

/// Per-call overrides. Unset fields fall back to the service's [`ToastConfig`].
#[derive(Clone, Default)]
pub struct ToastSettings {
    pub timeout: Option<Duration>,
    pub extended_timeout: Option<Duration>,
    pub disable_timeout: Option<bool>,
    pub show_progress_bar: Option<bool>,
    pub pause_progress_on_hover: Option<bool>,
    pub show_close_button: Option<bool>,
    pub icon: Option<IconKind>,
    pub on_click: Option<ClickHandler>,
}

impl ToastSettings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn extended_timeout(mut self, extended: Duration) -> Self {
        self.extended_timeout = Some(extended);
        self
    }

    /// Keep the toast until it is closed explicitly.
    #[must_use]
    pub fn disable_timeout(mut self) -> Self {
        self.disable_timeout = Some(true);
        self
    }

    #[must_use]
    pub fn show_progress_bar(mut self, show: bool) -> Self {
        self.show_progress_bar = Some(show);
        self
    }

    #[must_use]
    pub fn pause_progress_on_hover(mut self, pause: bool) -> Self {
        self.pause_progress_on_hover = Some(pause);
        self
    }

    #[must_use]
    pub fn show_close_button(mut self, show: bool) -> Self {
        self.show_close_button = Some(show);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: IconKind) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }

    /// Merge with the service defaults and validate the outcome.
    ///
    /// # Errors
    /// A zero timeout while timeouts are enabled, or a non-zero extension
    /// shorter than the timeout.
    pub fn resolve(self, defaults: &ToastConfig) -> Result<ResolvedToastSettings, ConfigError> {
        let resolved = ResolvedToastSettings {
            timeout: self.timeout.unwrap_or_else(|| defaults.timeout()),
            extended_timeout: self
                .extended_timeout
                .unwrap_or_else(|| defaults.extended_timeout()),
            disable_timeout: self.disable_timeout.unwrap_or(defaults.disable_timeout),
            show_progress_bar: self.show_progress_bar.unwrap_or(defaults.show_progress_bar),
            pause_progress_on_hover: self
                .pause_progress_on_hover
                .unwrap_or(defaults.pause_progress_on_hover),
            show_close_button: self.show_close_button.unwrap_or(defaults.show_close_button),
            icon: self.icon.unwrap_or_else(|| defaults.icon.clone()),
            on_click: self.on_click,
        };
        validate_timeouts(
            "toast",
            resolved.timeout,
            resolved.extended_timeout,
            resolved.disable_timeout,
        )?;
        Ok(resolved)
    }
}

impl fmt::Debug for ToastSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastSettings")
            .field("timeout", &self.timeout)
            .field("extended_timeout", &self.extended_timeout)
            .field("disable_timeout", &self.disable_timeout)
            .field("show_progress_bar", &self.show_progress_bar)
            .field("pause_progress_on_hover", &self.pause_progress_on_hover)
            .field("show_close_button", &self.show_close_button)
            .field("icon", &self.icon)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Settings in force for one toast instance.
#[derive(Clone)]
pub struct ResolvedToastSettings {
    pub timeout: Duration,
    pub extended_timeout: Duration,
    pub disable_timeout: bool,
    pub show_progress_bar: bool,
    pub pause_progress_on_hover: bool,
    pub show_close_button: bool,
    pub icon: IconKind,
    pub on_click: Option<ClickHandler>,
}

impl fmt::Debug for ResolvedToastSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedToastSettings")
            .field("timeout", &self.timeout)
            .field("extended_timeout", &self.extended_timeout)
            .field("disable_timeout", &self.disable_timeout)
            .field("show_progress_bar", &self.show_progress_bar)
            .field("pause_progress_on_hover", &self.pause_progress_on_hover)
            .field("show_close_button", &self.show_close_button)
            .field("icon", &self.icon)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}
