use serde::{Deserialize, Serialize};

use crate::storage::ModalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalPosition {
    TopLeft,
    TopCenter,
    TopRight,
    #[default]
    Center,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
    /// Sized by the content.
    Automatic,
}

/// Per-call overrides. Unset fields fall back to the service's [`ModalConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalOptions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Option<ModalPosition>,
    #[serde(default)]
    pub size: Option<ModalSize>,
    #[serde(default)]
    pub hide_header: Option<bool>,
    #[serde(default)]
    pub hide_close_button: Option<bool>,
    #[serde(default)]
    pub disable_background_cancel: Option<bool>,
}

/// Options in force for one modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedModalOptions {
    pub title: Option<String>,
    pub position: ModalPosition,
    pub size: ModalSize,
    pub hide_header: bool,
    pub hide_close_button: bool,
    pub disable_background_cancel: bool,
}

impl ModalOptions {
    pub fn resolve(self, defaults: &ModalConfig) -> ResolvedModalOptions {
        ResolvedModalOptions {
            title: self.title,
            position: self.position.unwrap_or(defaults.position),
            size: self.size.unwrap_or(defaults.size),
            hide_header: self.hide_header.unwrap_or(defaults.hide_header),
            hide_close_button: self.hide_close_button.unwrap_or(defaults.hide_close_button),
            disable_background_cancel: self
                .disable_background_cancel
                .unwrap_or(defaults.disable_background_cancel),
        }
    }
}

/// What to spawn: a renderer-defined component plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalDescriptor {
    pub component: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub options: ModalOptions,
}

impl ModalDescriptor {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            parameters: serde_json::Map::new(),
            options: ModalOptions::default(),
        }
    }

    #[must_use]
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: ModalOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_fall_back_to_config() {
        let config = ModalConfig {
            size: ModalSize::Large,
            disable_background_cancel: true,
            ..ModalConfig::default()
        };
        let resolved = ModalOptions {
            position: Some(ModalPosition::TopCenter),
            ..ModalOptions::default()
        }
        .resolve(&config);
        assert_eq!(resolved.position, ModalPosition::TopCenter);
        assert_eq!(resolved.size, ModalSize::Large);
        assert!(resolved.disable_background_cancel);
        assert!(!resolved.hide_header);
    }

    #[test]
    fn descriptor_builder_collects_parameters() {
        let descriptor = ModalDescriptor::new("ConfirmDelete")
            .title("Delete file?")
            .parameter("name", "report.pdf")
            .parameter("count", 3);
        assert_eq!(descriptor.component, "ConfirmDelete");
        assert_eq!(descriptor.options.title.as_deref(), Some("Delete file?"));
        assert_eq!(descriptor.parameters["name"], "report.pdf");
        assert_eq!(descriptor.parameters["count"], 3);
    }
}
