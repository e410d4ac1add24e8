//! Request and response types for the search endpoint.
//!
//! These are the wire types shared with the widget client.

use linkfield_core::{FieldMode, QueryArgs};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `data` of a rejected request (unknown or disabled type, unreadable body).
pub const INVALID_REQUEST: &str = "-1";

// ============================================================================
// REQUEST
// ============================================================================

/// Shape of the successful `data` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Selectable HTML table fragment
    #[default]
    Html,
    /// Structured rows the client renders itself
    Rows,
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct SearchRequest {
    /// Free-text search term, raw as typed
    pub search: String,

    /// Content type alias; `post` when absent
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Record attribute used as result key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Query settings laid over the type's defaults
    #[serde(skip_serializing_if = "QueryArgs::is_empty")]
    pub settings: QueryArgs,

    /// Id of the item currently being edited
    #[serde(
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub current: Option<String>,

    pub format: ResponseFormat,

    /// Display mode of the requesting field; shapes the html table
    #[serde(skip_serializing_if = "is_default_mode")]
    pub mode: FieldMode,
}

fn is_default_mode(mode: &FieldMode) -> bool {
    *mode == FieldMode::Default
}

impl SearchRequest {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_settings(mut self, settings: QueryArgs) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_current(mut self, current: impl Into<String>) -> Self {
        self.current = Some(current.into());
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_mode(mut self, mode: FieldMode) -> Self {
        self.mode = mode;
        self
    }

    /// Requested alias, `post` when absent or blank.
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("post")
    }
}

/// Accept the current id as a JSON string or number.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ============================================================================
// RESPONSE
// ============================================================================

/// One result in the structured payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResultRow {
    pub key: String,
    /// Title, or the untitled placeholder
    pub title: String,
    pub url: String,
    /// Striped row (1st, 3rd, 5th...)
    pub alternate: bool,
}

/// `data` member of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum SearchData {
    Rows(Vec<ResultRow>),
    /// Rendered fragment or a translated message
    Text(String),
}

/// `{success, data}` envelope returned by `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchResponse {
    pub success: bool,
    pub data: SearchData,
}

impl SearchResponse {
    pub fn html(fragment: impl Into<String>) -> Self {
        Self {
            success: true,
            data: SearchData::Text(fragment.into()),
        }
    }

    pub fn rows(rows: Vec<ResultRow>) -> Self {
        Self {
            success: true,
            data: SearchData::Rows(rows),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: SearchData::Text(message.into()),
        }
    }

    pub fn invalid_request() -> Self {
        Self::failure(INVALID_REQUEST)
    }

    /// Failure message, if this is an unsuccessful envelope.
    pub fn message(&self) -> Option<&str> {
        match (&self.success, &self.data) {
            (false, SearchData::Text(message)) => Some(message),
            _ => None,
        }
    }
}
