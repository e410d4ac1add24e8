//! Widget configuration.
//!
//! Every field has a default; caller values replace defaults field by field.
//! Configuration files are TOML and may name any subset of the fields.
//! A host field's projected variables seed the search half through
//! [`WidgetConfiguration::from_field`].

use linkfield_core::{FieldMode, FieldVars, QueryArgs};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read widget settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("widget settings are not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("widget setting `{field}` rejected: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfiguration {
    /// Background applied to a block while it is being removed
    pub color: String,
    /// Container holding the item blocks
    pub elements: String,
    /// Selector of one item block
    pub item: String,
    pub multiple: bool,
    pub add_button_ref: String,
    pub edit_button_ref: String,
    pub remove_button_ref: String,
    pub link_url_ref: String,
    pub link_label_ref: String,
    pub modal_id: String,
    pub overlay_ref: String,
    pub template_id: String,
    /// Content type alias sent with every search
    #[serde(rename = "type")]
    pub content_type: String,
    /// Record attribute used as the item id
    pub field: String,
    /// Query settings sent with every search
    pub settings: QueryArgs,
    pub mode: FieldMode,
    /// Host record being edited; the server puts it in place of
    /// `exclude = "current"`
    pub current_id: Option<String>,
    /// Clear the search text each time the modal opens
    pub reset_search_on_open: bool,
}

impl Default for WidgetConfiguration {
    fn default() -> Self {
        Self {
            color: "#ffaaaa".to_string(),
            elements: ".listbox".to_string(),
            item: "fieldset".to_string(),
            multiple: false,
            add_button_ref: ".add-button".to_string(),
            edit_button_ref: ".edit-button".to_string(),
            remove_button_ref: ".remove-button".to_string(),
            link_url_ref: ".link-url".to_string(),
            link_label_ref: ".link-label".to_string(),
            modal_id: "find-posts".to_string(),
            overlay_ref: ".ui-find-overlay".to_string(),
            template_id: "template-id".to_string(),
            content_type: "post".to_string(),
            field: "ID".to_string(),
            settings: QueryArgs::new(),
            mode: FieldMode::Default,
            current_id: None,
            reset_search_on_open: false,
        }
    }
}

/// Caller-supplied values; absent fields keep their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetOverrides {
    pub color: Option<String>,
    pub elements: Option<String>,
    pub item: Option<String>,
    pub multiple: Option<bool>,
    pub add_button_ref: Option<String>,
    pub edit_button_ref: Option<String>,
    pub remove_button_ref: Option<String>,
    pub link_url_ref: Option<String>,
    pub link_label_ref: Option<String>,
    pub modal_id: Option<String>,
    pub overlay_ref: Option<String>,
    pub template_id: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub field: Option<String>,
    pub settings: Option<QueryArgs>,
    pub mode: Option<FieldMode>,
    pub current_id: Option<String>,
    pub reset_search_on_open: Option<bool>,
}

impl WidgetConfiguration {
    /// Defaults carrying the host field's type, value field, settings,
    /// cardinality and display mode.
    pub fn from_field(vars: &FieldVars) -> Self {
        Self {
            multiple: vars.multiple,
            content_type: vars.kind.as_key().to_string(),
            field: vars.field.clone(),
            settings: vars.settings.clone(),
            mode: vars.mode,
            ..Self::default()
        }
    }

    /// Shallow merge: each present override replaces the whole field.
    pub fn merged(self, overrides: WidgetOverrides) -> Self {
        Self {
            color: overrides.color.unwrap_or(self.color),
            elements: overrides.elements.unwrap_or(self.elements),
            item: overrides.item.unwrap_or(self.item),
            multiple: overrides.multiple.unwrap_or(self.multiple),
            add_button_ref: overrides.add_button_ref.unwrap_or(self.add_button_ref),
            edit_button_ref: overrides.edit_button_ref.unwrap_or(self.edit_button_ref),
            remove_button_ref: overrides.remove_button_ref.unwrap_or(self.remove_button_ref),
            link_url_ref: overrides.link_url_ref.unwrap_or(self.link_url_ref),
            link_label_ref: overrides.link_label_ref.unwrap_or(self.link_label_ref),
            modal_id: overrides.modal_id.unwrap_or(self.modal_id),
            overlay_ref: overrides.overlay_ref.unwrap_or(self.overlay_ref),
            template_id: overrides.template_id.unwrap_or(self.template_id),
            content_type: overrides.content_type.unwrap_or(self.content_type),
            field: overrides.field.unwrap_or(self.field),
            settings: overrides.settings.unwrap_or(self.settings),
            mode: overrides.mode.unwrap_or(self.mode),
            current_id: overrides.current_id.or(self.current_id),
            reset_search_on_open: overrides
                .reset_search_on_open
                .unwrap_or(self.reset_search_on_open),
        }
    }

    /// Defaults overlaid with a TOML document, then validated.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let overrides: WidgetOverrides = toml::from_str(contents)?;
        let config = Self::default().merged(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_hex_color(&self.color) {
            return Err(ConfigError::InvalidValue {
                field: "color",
                reason: format!("expected #rgb or #rrggbb, got {:?}", self.color),
            });
        }

        let required = [
            ("elements", &self.elements),
            ("item", &self.item),
            ("add_button_ref", &self.add_button_ref),
            ("edit_button_ref", &self.edit_button_ref),
            ("remove_button_ref", &self.remove_button_ref),
            ("link_url_ref", &self.link_url_ref),
            ("link_label_ref", &self.link_label_ref),
            ("modal_id", &self.modal_id),
            ("overlay_ref", &self.overlay_ref),
            ("template_id", &self.template_id),
            ("type", &self.content_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 3 || hex.len() == 6)
        .map(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}
