//! Query argument interpretation for the in-memory store.

use crate::StoreResult;
use linkfield_core::{ContentRecord, QueryArgs, StoreError};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Record collections held by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Categories,
    Menus,
    PostTypes,
    Taxonomies,
    Terms,
    Users,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Categories => "categories",
            Collection::Menus => "menus",
            Collection::PostTypes => "post_types",
            Collection::Taxonomies => "taxonomies",
            Collection::Terms => "terms",
            Collection::Users => "users",
        }
    }

    pub fn id_attr(&self) -> &'static str {
        match self {
            Collection::Posts | Collection::Users => "ID",
            Collection::Categories => "cat_ID",
            Collection::Menus | Collection::Terms => "term_id",
            Collection::PostTypes | Collection::Taxonomies => "name",
        }
    }

    pub fn title_attr(&self) -> &'static str {
        match self {
            Collection::Posts => "post_title",
            Collection::Categories => "cat_name",
            Collection::Menus | Collection::Terms => "name",
            Collection::PostTypes | Collection::Taxonomies => "label",
            Collection::Users => "display_name",
        }
    }

    fn parent_attr(&self) -> &'static str {
        match self {
            Collection::Posts => "post_parent",
            _ => "parent",
        }
    }

    /// Attributes a free-text search matches against.
    fn search_attrs(&self) -> &'static [&'static str] {
        match self {
            Collection::Posts => &["post_title", "post_content", "post_excerpt"],
            Collection::Categories => &["cat_name", "slug"],
            Collection::Menus | Collection::Terms => &["name", "slug"],
            Collection::PostTypes | Collection::Taxonomies => &["name", "singular_name"],
            Collection::Users => &["user_login", "user_email", "user_nicename", "display_name"],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EXECUTION
// ============================================================================

/// Filter, order and bound `records` according to `args`.
pub(crate) fn run(
    collection: Collection,
    records: &[ContentRecord],
    args: &QueryArgs,
    max_results: usize,
) -> StoreResult<Vec<ContentRecord>> {
    let filter = Filter::from_args(collection, args)?;
    let mut matched: Vec<ContentRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();

    let order = sort_keys(collection, args);
    if !order.is_empty() {
        let descending = is_descending(args)?;
        matched.sort_by(|a, b| {
            let ordering = order
                .iter()
                .map(|attr| compare_attr(a, b, attr))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    if let Some(limit) = limit(args, max_results)? {
        matched.truncate(limit);
    }
    Ok(matched)
}

struct Filter {
    collection: Collection,
    search: Option<String>,
    name_search: Vec<String>,
    equals: Vec<(&'static str, Vec<String>)>,
    parent: Option<String>,
    hide_empty: bool,
    public_only: bool,
    role: Option<String>,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Filter {
    fn from_args(collection: Collection, args: &QueryArgs) -> StoreResult<Self> {
        let search = args
            .get_str("search")
            .or_else(|| args.get_str("s"))
            .map(|term| term.trim().trim_matches('*').to_lowercase())
            .filter(|term| !term.is_empty());

        let name_search = match collection {
            Collection::PostTypes | Collection::Taxonomies => ["name", "singular_name"]
                .iter()
                .filter_map(|key| args.get_str(key))
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        let mut equals = Vec::new();
        match collection {
            Collection::Posts => {
                for key in ["post_type", "post_status"] {
                    let values = id_list(args.get(key));
                    if !values.is_empty() && !values.iter().any(|v| v == "any") {
                        equals.push((key, values));
                    }
                }
            }
            Collection::Terms => {
                let values = id_list(args.get("taxonomy"));
                if !values.is_empty() {
                    equals.push(("taxonomy", values));
                }
            }
            _ => {}
        }

        let parent = ["parent", "post_parent", "child_of"]
            .iter()
            .find_map(|key| args.get_str(key))
            .map(|value| normalize_id(&value));

        let role = args
            .get_str("role")
            .map(|role| role.trim().to_string())
            .filter(|role| !role.is_empty());

        let mut exclude = id_list(args.get("exclude"));
        exclude.extend(id_list(args.get("post__not_in")));

        let mut include = id_list(args.get("include"));
        include.extend(id_list(args.get("post__in")));

        if let Some(value) = args.get("hide_empty") {
            if value.is_array() || value.is_object() {
                return Err(StoreError::InvalidArgument {
                    key: "hide_empty".to_string(),
                    reason: "expected a scalar".to_string(),
                });
            }
        }

        Ok(Self {
            collection,
            search,
            name_search,
            equals,
            parent,
            hide_empty: args.get_bool("hide_empty").unwrap_or(false),
            public_only: args.get_bool("public").unwrap_or(false),
            role,
            include,
            exclude,
        })
    }

    fn matches(&self, record: &ContentRecord) -> bool {
        let id = record.text_or_empty(self.collection.id_attr());

        if self.exclude.iter().any(|excluded| *excluded == id) {
            return false;
        }
        if !self.include.is_empty() && !self.include.iter().any(|included| *included == id) {
            return false;
        }

        for (attr, allowed) in &self.equals {
            let value = record.text_or_empty(attr);
            if !allowed.iter().any(|candidate| *candidate == value) {
                return false;
            }
        }

        if let Some(parent) = &self.parent {
            let value = normalize_id(&record.text_or_empty(self.collection.parent_attr()));
            if value != *parent {
                return false;
            }
        }

        if self.hide_empty && record.number("count").unwrap_or(0) == 0 {
            return false;
        }

        if self.public_only && !is_truthy(record.get("public")) {
            return false;
        }

        if let Some(role) = &self.role {
            if !has_role(record, role) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            if !contains_term(record, self.collection.search_attrs(), term) {
                return false;
            }
        }

        if !self.name_search.is_empty()
            && !self
                .name_search
                .iter()
                .any(|term| contains_term(record, &["name", "singular_name"], term))
        {
            return false;
        }

        true
    }
}

fn contains_term(record: &ContentRecord, attrs: &[&str], term: &str) -> bool {
    attrs.iter().any(|attr| {
        record
            .text(attr)
            .map(|value| value.to_lowercase().contains(term))
            .unwrap_or(false)
    })
}

fn has_role(record: &ContentRecord, role: &str) -> bool {
    match record.get("roles") {
        Some(Value::Array(roles)) => roles.iter().any(|r| r.as_str() == Some(role)),
        _ => record.text("role").as_deref() == Some(role),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !(s.is_empty() || s == "0"),
        Some(_) => true,
    }
}

/// Root parents are spelled `0`, `""` or missing; all compare as `0`.
fn normalize_id(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Id lists come as `"1,2"`, `[1, 2]` or a bare scalar.
fn id_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(_) => Vec::new(),
    }
}

// ============================================================================
// ORDERING
// ============================================================================

fn sort_keys(collection: Collection, args: &QueryArgs) -> Vec<String> {
    let raw = args
        .get_str("sort_column")
        .or_else(|| args.get_str("orderby"))
        .unwrap_or_default();

    let keys: Vec<String> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| resolve_sort_attr(collection, key))
        .collect();

    if keys.iter().any(|key| key == "none") {
        Vec::new()
    } else {
        keys
    }
}

fn resolve_sort_attr(collection: Collection, key: &str) -> String {
    match key {
        "title" | "post_title" => collection.title_attr().to_string(),
        "name" => match collection {
            Collection::Categories => "cat_name".to_string(),
            Collection::Posts => "post_name".to_string(),
            _ => "name".to_string(),
        },
        "id" | "ID" | "term_id" | "cat_ID" => collection.id_attr().to_string(),
        other => other.to_string(),
    }
}

fn is_descending(args: &QueryArgs) -> StoreResult<bool> {
    let order = args
        .get_str("order")
        .or_else(|| args.get_str("sort_order"))
        .unwrap_or_default();

    match order.trim().to_ascii_uppercase().as_str() {
        "" | "ASC" => Ok(false),
        "DESC" => Ok(true),
        _ => Err(StoreError::InvalidArgument {
            key: "order".to_string(),
            reason: format!("expected ASC or DESC, got {}", order),
        }),
    }
}

fn compare_attr(a: &ContentRecord, b: &ContentRecord, attr: &str) -> Ordering {
    match (a.number(attr), b.number(attr)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a
            .text_or_empty(attr)
            .to_lowercase()
            .cmp(&b.text_or_empty(attr).to_lowercase()),
    }
}

// ============================================================================
// PAGE SIZE
// ============================================================================

/// `None` means unbounded (`-1` or `0`).
fn limit(args: &QueryArgs, max_results: usize) -> StoreResult<Option<usize>> {
    let Some((key, value)) = ["number", "posts_per_page", "numberposts"]
        .iter()
        .find_map(|key| args.get(key).map(|value| (*key, value)))
    else {
        return Ok(Some(max_results));
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n > 0 => Ok(Some(n as usize)),
        Some(_) => Ok(None),
        None => Err(StoreError::InvalidArgument {
            key: key.to_string(),
            reason: format!("expected an integer, got {}", value),
        }),
    }
}
