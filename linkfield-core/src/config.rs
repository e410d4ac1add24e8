//! Field configuration and template variable projection.

use crate::error::ConfigError;
use crate::i18n::{keys, Catalog, Translate, TEXT_DOMAIN};
use crate::kind::ContentKind;
use crate::settings::QueryArgs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// DISPLAY MODE
// ============================================================================

/// Display mode of the rendered field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    /// Plain list of item blocks
    #[default]
    Default,
    /// Item blocks with a "choose one" placeholder row and extra metadata columns
    Extended,
}

impl FieldMode {
    /// Lenient parse: anything other than a known mode is `Default`.
    pub fn from_setting(value: &str) -> Self {
        match value.trim() {
            "extended" => FieldMode::Extended,
            _ => FieldMode::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldMode::Default => "default",
            FieldMode::Extended => "extended",
        }
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TEXTS
// ============================================================================

/// Translated labels shown by the field and its modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldTexts {
    pub addblock_title: String,
    pub addblock_description: String,
    pub addblocks_description: String,
    pub addblock_label: String,
    pub editblock_label: String,
    pub removeblock_label: String,
    pub modal_title: String,
    pub modal_close: String,
    pub modal_search: String,
    pub modal_submit: String,
    pub ajax_error: String,
}

impl FieldTexts {
    pub fn translated(translator: &dyn Translate) -> Self {
        let t = |key: &str| translator.t(key, TEXT_DOMAIN);
        Self {
            addblock_title: t(keys::ADDBLOCK_TITLE),
            addblock_description: t(keys::ADDBLOCK_DESCRIPTION),
            addblocks_description: t(keys::ADDBLOCKS_DESCRIPTION),
            addblock_label: t(keys::ADDBLOCK_LABEL),
            editblock_label: t(keys::EDITBLOCK_LABEL),
            removeblock_label: t(keys::REMOVEBLOCK_LABEL),
            modal_title: t(keys::MODAL_TITLE),
            modal_close: t(keys::MODAL_CLOSE),
            modal_search: t(keys::MODAL_SEARCH),
            modal_submit: t(keys::MODAL_SUBMIT),
            ajax_error: t(keys::AJAX_ERROR),
        }
    }

    /// Add-block description matching the field cardinality.
    pub fn add_description(&self, multiple: bool) -> &str {
        if multiple {
            &self.addblocks_description
        } else {
            &self.addblock_description
        }
    }
}

impl Default for FieldTexts {
    fn default() -> Self {
        Self::translated(&Catalog::english())
    }
}

// ============================================================================
// FIELD CONFIG
// ============================================================================

/// Per-field configuration as declared by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct FieldConfig {
    pub title: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub default: Vec<Value>,
    pub description: String,
    /// Record attribute used as the stored value
    pub field: String,
    /// Raw display mode; normalized by [`FieldVars::project`]
    pub mode: String,
    pub multiple: bool,
    /// Content type alias
    #[serde(rename = "type")]
    pub content_type: String,
    pub settings: QueryArgs,
    pub texts: FieldTexts,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::defaults(&Catalog::english())
    }
}

impl FieldConfig {
    /// Field defaults with labels resolved through `translator`.
    pub fn defaults(translator: &dyn Translate) -> Self {
        Self {
            title: translator.t(keys::FIELD_TITLE, TEXT_DOMAIN),
            default: Vec::new(),
            description: String::new(),
            field: "ID".to_string(),
            mode: String::new(),
            multiple: false,
            content_type: ContentKind::Post.as_key().to_string(),
            settings: QueryArgs::new(),
            texts: FieldTexts::translated(translator),
        }
    }

    /// Defaults overridden field by field by the caller's values.
    pub fn merged(self, overrides: FieldOverrides) -> Self {
        Self {
            title: overrides.title.unwrap_or(self.title),
            default: overrides.default.unwrap_or(self.default),
            description: overrides.description.unwrap_or(self.description),
            field: overrides.field.unwrap_or(self.field),
            mode: overrides.mode.unwrap_or(self.mode),
            multiple: overrides.multiple.unwrap_or(self.multiple),
            content_type: overrides.content_type.unwrap_or(self.content_type),
            settings: overrides.settings.unwrap_or(self.settings),
            texts: self.texts,
        }
    }

    /// Canonical kind of the configured type; unknown aliases become `post`.
    pub fn content_kind(&self) -> ContentKind {
        self.content_type
            .parse()
            .unwrap_or(ContentKind::Post)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_type.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "type".to_string(),
            });
        }

        if self.content_type.parse::<ContentKind>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "type".to_string(),
                value: self.content_type.clone(),
                reason: "not a known content type alias".to_string(),
            });
        }

        if !self.mode.is_empty() && !matches!(self.mode.as_str(), "default" | "extended") {
            return Err(ConfigError::InvalidValue {
                field: "mode".to_string(),
                value: self.mode.clone(),
                reason: "mode must be empty, default or extended".to_string(),
            });
        }

        if !self.multiple && self.default.len() > 1 {
            return Err(ConfigError::InvalidValue {
                field: "default".to_string(),
                value: self.default.len().to_string(),
                reason: "a single-value field takes at most one default".to_string(),
            });
        }

        Ok(())
    }
}

/// Caller-supplied values laid over [`FieldConfig::defaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOverrides {
    pub title: Option<String>,
    pub default: Option<Vec<Value>>,
    pub description: Option<String>,
    pub field: Option<String>,
    pub mode: Option<String>,
    pub multiple: Option<bool>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub settings: Option<QueryArgs>,
}

// ============================================================================
// TEMPLATE VARIABLES
// ============================================================================

/// Template variables projected from a stored value and its field config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldVars {
    pub title: String,
    pub description: String,
    pub field: String,
    pub multiple: bool,
    pub mode: FieldMode,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub settings: QueryArgs,
    pub texts: FieldTexts,
    /// Stored value, always a list
    pub value: Vec<Value>,
}

impl FieldVars {
    pub fn project(value: &Value, config: &FieldConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            field: config.field.clone(),
            multiple: config.multiple,
            mode: FieldMode::from_setting(&config.mode),
            kind: config.content_kind(),
            settings: config.settings.clone(),
            texts: config.texts.clone(),
            value: value_list(value),
        }
    }
}

fn value_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        Value::Bool(false) => Vec::new(),
        Value::String(s) if s.is_empty() || s == "0" => Vec::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => Vec::new(),
        scalar => vec![scalar.clone()],
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_host_contract() {
        let config = FieldConfig::defaults(&Catalog::english());
        assert_eq!(config.field, "ID");
        assert_eq!(config.content_type, "post");
        assert_eq!(config.mode, "");
        assert!(!config.multiple);
        assert!(config.default.is_empty());
        assert_eq!(config.title, "Content");
        assert_eq!(config.texts.addblock_label, "Add");
    }

    #[test]
    fn test_defaults_use_injected_translator() {
        let catalog = Catalog::new().with_entry(TEXT_DOMAIN, keys::MODAL_SUBMIT, "Choisir");
        let config = FieldConfig::defaults(&catalog);
        assert_eq!(config.texts.modal_submit, "Choisir");
        assert_eq!(config.texts.modal_close, keys::MODAL_CLOSE);
    }

    #[test]
    fn test_merged_overrides_field_by_field() {
        let config = FieldConfig::default().merged(FieldOverrides {
            content_type: Some("categories".to_string()),
            multiple: Some(true),
            ..Default::default()
        });
        assert_eq!(config.content_type, "categories");
        assert!(config.multiple);
        assert_eq!(config.field, "ID");
        assert_eq!(config.content_kind(), ContentKind::Category);
    }

    #[test]
    fn test_project_wraps_scalar_value() {
        let vars = FieldVars::project(&json!(42), &FieldConfig::default());
        assert_eq!(vars.value, vec![json!(42)]);

        let vars = FieldVars::project(&json!([1, 2]), &FieldConfig::default());
        assert_eq!(vars.value, vec![json!(1), json!(2)]);

        let vars = FieldVars::project(&json!(""), &FieldConfig::default());
        assert!(vars.value.is_empty());
    }

    #[test]
    fn test_project_normalizes_mode_and_type() {
        let config = FieldConfig::default().merged(FieldOverrides {
            mode: Some("wide".to_string()),
            content_type: Some("bogus".to_string()),
            ..Default::default()
        });
        let vars = FieldVars::project(&Value::Null, &config);
        assert_eq!(vars.mode, FieldMode::Default);
        assert_eq!(vars.kind, ContentKind::Post);

        let config = FieldConfig::default().merged(FieldOverrides {
            mode: Some("extended".to_string()),
            content_type: Some("users".to_string()),
            ..Default::default()
        });
        let vars = FieldVars::project(&Value::Null, &config);
        assert_eq!(vars.mode, FieldMode::Extended);
        assert_eq!(vars.kind, ContentKind::User);
    }

    #[test]
    fn test_validate_rejects_unknown_type_and_mode() {
        let mut config = FieldConfig::default();
        assert!(config.validate().is_ok());

        config.content_type = "bogus".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { ref field, .. }) if field == "type"));

        config.content_type = "post".to_string();
        config.mode = "wide".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { ref field, .. }) if field == "mode"));
    }

    #[test]
    fn test_field_config_deserializes_with_defaults() {
        let config: FieldConfig = serde_json::from_value(json!({
            "type": "terms",
            "settings": {"taxonomy": "genre"}
        }))
        .unwrap();
        assert_eq!(config.content_kind(), ContentKind::Term);
        assert_eq!(config.settings.get_str("taxonomy").as_deref(), Some("genre"));
        assert_eq!(config.field, "ID");
    }
}
