//! Content kinds and the alias registry that normalizes type names.

use crate::error::ResolveError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONTENT KIND
// ============================================================================

/// Canonical content kind a picker field can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Page,
    Category,
    Menu,
    PostType,
    Tag,
    Taxonomy,
    Term,
    User,
}

impl ContentKind {
    /// Every supported kind, in registry order.
    pub const ALL: [ContentKind; 9] = [
        ContentKind::Category,
        ContentKind::Menu,
        ContentKind::Page,
        ContentKind::Post,
        ContentKind::PostType,
        ContentKind::Tag,
        ContentKind::Taxonomy,
        ContentKind::Term,
        ContentKind::User,
    ];

    /// Canonical type key.
    pub fn as_key(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Page => "page",
            ContentKind::Category => "category",
            ContentKind::Menu => "menu",
            ContentKind::PostType => "posttype",
            ContentKind::Tag => "tag",
            ContentKind::Taxonomy => "taxonomy",
            ContentKind::Term => "term",
            ContentKind::User => "user",
        }
    }

    /// All aliases accepted for this kind, canonical key included.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ContentKind::Post => &["posts", "post"],
            ContentKind::Page => &["pages", "page"],
            ContentKind::Category => &["categories", "category"],
            ContentKind::Menu => &["menus", "menu"],
            ContentKind::PostType => &["posttypes", "posttype"],
            ContentKind::Tag => &["tags", "tag"],
            ContentKind::Taxonomy => &["taxonomies", "taxonomy"],
            ContentKind::Term => &["terms", "term"],
            ContentKind::User => &["users", "user"],
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for ContentKind {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALIAS_TABLE
            .get(normalize_alias(s).as_str())
            .copied()
            .ok_or_else(|| ResolveError::UnsupportedType {
                requested: s.to_string(),
            })
    }
}

fn normalize_alias(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

static ALIAS_TABLE: Lazy<HashMap<&'static str, ContentKind>> = Lazy::new(|| {
    ContentKind::ALL
        .iter()
        .flat_map(|kind| kind.aliases().iter().map(move |alias| (*alias, *kind)))
        .collect()
});

// ============================================================================
// CONTENT TYPE REGISTRY
// ============================================================================

/// Static registry entry: a group of synonymous aliases and their canonical kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTypeSpec {
    pub canonical: ContentKind,
    pub aliases: &'static [&'static str],
}

impl ContentTypeSpec {
    pub fn of(kind: ContentKind) -> Self {
        Self {
            canonical: kind,
            aliases: kind.aliases(),
        }
    }
}

/// Alias registry restricted to a set of enabled kinds.
///
/// `lookup` is strict. `normalize` falls back to the configured default
/// (normally [`ContentKind::Post`]) and only fails when no default is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeRegistry {
    enabled: BTreeSet<ContentKind>,
    default: Option<ContentKind>,
}

impl Default for ContentTypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl ContentTypeRegistry {
    /// All nine kinds enabled, unknown aliases fall back to `post`.
    pub fn standard() -> Self {
        Self {
            enabled: ContentKind::ALL.iter().copied().collect(),
            default: Some(ContentKind::Post),
        }
    }

    /// Only the given kinds are enabled and there is no fallback.
    pub fn restricted<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = ContentKind>,
    {
        Self {
            enabled: kinds.into_iter().collect(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Option<ContentKind>) -> Self {
        self.default = default;
        self
    }

    pub fn default_kind(&self) -> Option<ContentKind> {
        self.default
    }

    pub fn specs(&self) -> Vec<ContentTypeSpec> {
        self.enabled.iter().copied().map(ContentTypeSpec::of).collect()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ContentKind> + '_ {
        self.enabled.iter().copied()
    }

    pub fn is_enabled(&self, kind: ContentKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// Strict lookup: the alias must be known and its kind enabled.
    pub fn lookup(&self, alias: &str) -> Option<ContentKind> {
        alias
            .parse::<ContentKind>()
            .ok()
            .filter(|kind| self.is_enabled(*kind))
    }

    /// Lookup with fallback to the default kind.
    pub fn normalize(&self, alias: &str) -> Result<ContentKind, ResolveError> {
        self.lookup(alias)
            .or(self.default)
            .ok_or_else(|| ResolveError::UnsupportedType {
                requested: alias.to_string(),
            })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_maps_to_its_canonical_key() {
        for kind in ContentKind::ALL {
            for alias in kind.aliases() {
                assert_eq!(alias.parse::<ContentKind>().unwrap(), kind);
            }
            assert_eq!(kind.as_key().parse::<ContentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_alias_parsing_ignores_case_and_padding() {
        assert_eq!(" Posts ".parse::<ContentKind>().unwrap(), ContentKind::Post);
        assert_eq!("TAXONOMIES".parse::<ContentKind>().unwrap(), ContentKind::Taxonomy);
    }

    #[test]
    fn test_unknown_alias_is_unsupported() {
        let err = "bogus".parse::<ContentKind>().unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedType { ref requested } if requested == "bogus"));
    }

    #[test]
    fn test_standard_registry_defaults_to_post() {
        let registry = ContentTypeRegistry::standard();
        assert_eq!(registry.normalize("bogus").unwrap(), ContentKind::Post);
        assert_eq!(registry.normalize("users").unwrap(), ContentKind::User);
        assert_eq!(registry.lookup("bogus"), None);
    }

    #[test]
    fn test_restricted_registry_rejects_disabled_kinds() {
        let registry = ContentTypeRegistry::restricted([ContentKind::Category]);
        assert_eq!(registry.lookup("categories"), Some(ContentKind::Category));
        assert_eq!(registry.lookup("post"), None);
        assert!(registry.normalize("post").is_err());
    }

    #[test]
    fn test_kind_serializes_as_canonical_key() {
        let json = serde_json::to_string(&ContentKind::PostType).unwrap();
        assert_eq!(json, "\"posttype\"");
        let parsed: ContentKind = serde_json::from_str("\"taxonomy\"").unwrap();
        assert_eq!(parsed, ContentKind::Taxonomy);
    }

    #[test]
    fn test_specs_cover_enabled_kinds() {
        let specs = ContentTypeRegistry::standard().specs();
        assert_eq!(specs.len(), 9);
        assert!(specs.iter().all(|spec| spec.aliases.contains(&spec.canonical.as_key())));
    }
}
