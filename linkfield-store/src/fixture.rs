//! JSON fixture format for seeding an in-memory store.

use crate::query::Collection;
use linkfield_core::ContentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seed data for [`InMemoryContentStore`](crate::InMemoryContentStore).
///
/// ```json
/// {
///   "site_url": "https://example.test",
///   "posts": [{"ID": 1, "post_title": "Hello", "post_type": "post", "post_status": "publish"}],
///   "categories": [{"cat_ID": 1, "cat_name": "News", "parent": 0}],
///   "object_tags": {"1": [10]}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreFixture {
    pub site_url: Option<String>,
    pub posts: Vec<ContentRecord>,
    pub categories: Vec<ContentRecord>,
    pub menus: Vec<ContentRecord>,
    pub post_types: Vec<ContentRecord>,
    pub taxonomies: Vec<ContentRecord>,
    pub terms: Vec<ContentRecord>,
    pub users: Vec<ContentRecord>,
    /// Object id to attached tag term ids
    pub object_tags: BTreeMap<u64, Vec<u64>>,
}

impl StoreFixture {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Record lists paired with the collection they seed.
    pub fn collections(&self) -> Vec<(Collection, Vec<ContentRecord>)> {
        vec![
            (Collection::Posts, self.posts.clone()),
            (Collection::Categories, self.categories.clone()),
            (Collection::Menus, self.menus.clone()),
            (Collection::PostTypes, self.post_types.clone()),
            (Collection::Taxonomies, self.taxonomies.clone()),
            (Collection::Terms, self.terms.clone()),
            (Collection::Users, self.users.clone()),
        ]
    }
}
