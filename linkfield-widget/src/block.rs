//! Item blocks: one repeatable entry of the list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a block within one widget, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

/// Persisted content of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Content id, empty for a new item
    pub id: String,
    pub label: String,
    pub url: String,
}

impl Item {
    pub fn new(id: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockState {
    Live,
    /// Delete transition running with this background color
    Removing { background: String },
}

/// One rendered entry: hidden id input, label element and link element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    pub id: BlockId,
    pub hidden_id: String,
    pub label: String,
    pub link_href: String,
    pub link_text: String,
    pub state: BlockState,
}

impl ItemBlock {
    pub fn new(id: BlockId, item: &Item) -> Self {
        Self {
            id,
            hidden_id: item.id.clone(),
            label: item.label.clone(),
            link_href: item.url.clone(),
            link_text: item.url.clone(),
            state: BlockState::Live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state == BlockState::Live
    }

    /// Write a confirmed selection into the block.
    pub fn write_back(&mut self, key: &str, title: &str, url: &str) {
        self.hidden_id = key.to_string();
        self.link_href = url.to_string();
        self.link_text = url.to_string();
        self.label = title.to_string();
    }

    pub fn item(&self) -> Item {
        Item::new(&self.hidden_id, &self.label, &self.link_href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_back_sets_every_element() {
        let mut block = ItemBlock::new(BlockId(1), &Item::default());
        block.write_back("42", "My Post", "https://x/42");
        assert_eq!(block.hidden_id, "42");
        assert_eq!(block.link_href, "https://x/42");
        assert_eq!(block.link_text, "https://x/42");
        assert_eq!(block.label, "My Post");
        assert_eq!(block.item(), Item::new("42", "My Post", "https://x/42"));
    }

    #[test]
    fn test_item_deserializes_partial() {
        let item: Item = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(item, Item::new("7", "", ""));
    }
}
