//! Translation lookup injected into the resolver front end and the widget.

use std::collections::HashMap;

/// Text domain used by every key below.
pub const TEXT_DOMAIN: &str = "linkfield";

/// Translation keys used by the field.
pub mod keys {
    pub const FIELD_TITLE: &str = "linkfield.title";
    pub const ADDBLOCK_TITLE: &str = "linkfield.addblock_title";
    pub const ADDBLOCK_DESCRIPTION: &str = "linkfield.addblock_description";
    pub const ADDBLOCKS_DESCRIPTION: &str = "linkfield.addblocks_description";
    pub const ADDBLOCK_LABEL: &str = "linkfield.addblock_label";
    pub const EDITBLOCK_LABEL: &str = "linkfield.editblock_label";
    pub const REMOVEBLOCK_LABEL: &str = "linkfield.removeblock_label";
    pub const MODAL_TITLE: &str = "linkfield.modal.title";
    pub const MODAL_CLOSE: &str = "linkfield.modal.close";
    pub const MODAL_SEARCH: &str = "linkfield.modal.search";
    pub const MODAL_SUBMIT: &str = "linkfield.modal.submit";
    pub const AJAX_NO_ITEMS_FOUND: &str = "linkfield.ajax.no_items_found";
    pub const AJAX_TITLE: &str = "linkfield.ajax.title";
    pub const AJAX_NO_TITLE: &str = "linkfield.ajax.no_title";
    pub const AJAX_CHOOSE_ONE: &str = "linkfield.ajax.choose_one";
    pub const AJAX_ID: &str = "linkfield.ajax.id";
    pub const AJAX_ERROR: &str = "linkfield.ajax.error";
}

/// Translation capability: `t(key, domain)`.
pub trait Translate: Send + Sync {
    fn t(&self, key: &str, domain: &str) -> String;
}

/// In-memory message catalog. Unknown keys translate to themselves.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    domains: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English strings for the field's text domain.
    pub fn english() -> Self {
        use keys::*;

        [
            (FIELD_TITLE, "Content"),
            (ADDBLOCK_TITLE, "No item selected"),
            (ADDBLOCK_DESCRIPTION, "Click on the Add button to choose a content."),
            (ADDBLOCKS_DESCRIPTION, "Click on the Add button to choose one or more contents."),
            (ADDBLOCK_LABEL, "Add"),
            (EDITBLOCK_LABEL, "Edit"),
            (REMOVEBLOCK_LABEL, "Remove"),
            (MODAL_TITLE, "Choose a content"),
            (MODAL_CLOSE, "Close"),
            (MODAL_SEARCH, "Search"),
            (MODAL_SUBMIT, "Select"),
            (AJAX_NO_ITEMS_FOUND, "No items found."),
            (AJAX_TITLE, "Title"),
            (AJAX_NO_TITLE, "(no title)"),
            (AJAX_CHOOSE_ONE, "Choose one"),
            (AJAX_ID, "ID"),
            (AJAX_ERROR, "An error has occurred. Please reload the page and try again."),
        ]
        .into_iter()
        .fold(Self::new(), |catalog, (key, text)| {
            catalog.with_entry(TEXT_DOMAIN, key, text)
        })
    }

    pub fn with_entry(
        mut self,
        domain: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.domains
            .entry(domain.into())
            .or_default()
            .insert(key.into(), text.into());
        self
    }
}

impl Translate for Catalog {
    fn t(&self, key: &str, domain: &str) -> String {
        self.domains
            .get(domain)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
