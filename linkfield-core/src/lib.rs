//! LINKFIELD Core - Shared Types
//!
//! Content kinds, raw records, query arguments, results, translation and
//! field configuration. All other crates depend on this.
//! This crate contains no I/O.

pub mod config;
pub mod error;
pub mod i18n;
pub mod kind;
pub mod record;
pub mod result;
pub mod settings;

pub use config::{FieldConfig, FieldMode, FieldOverrides, FieldTexts, FieldVars};
pub use error::{ConfigError, LinkfieldError, LinkfieldResult, ResolveError, StoreError};
pub use i18n::{keys, Catalog, Translate, TEXT_DOMAIN};
pub use kind::{ContentKind, ContentTypeRegistry, ContentTypeSpec};
pub use record::ContentRecord;
pub use result::{ResultSet, SearchResult};
pub use settings::QueryArgs;
