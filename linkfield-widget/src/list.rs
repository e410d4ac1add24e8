//! Repeatable item list.

use crate::block::{BlockId, BlockState, Item, ItemBlock};
use crate::config::WidgetConfiguration;
use crate::error::{WidgetError, WidgetResult};
use crate::modal::{ModalKey, SearchModal, SearchTicket};
use crate::template::TemplateRegistry;
use crate::transport::SearchTransport;
use html_escape::encode_double_quoted_attribute;
use linkfield_core::{FieldVars, ResultSet, Translate};
use serde_json::Value;
use tracing::debug;

/// Whether the add control is shown for `count` blocks.
pub fn add_visible(count: usize, multiple: bool) -> bool {
    multiple || count == 0
}

/// Editable list of item blocks with its search modal.
pub struct ItemListWidget<T: SearchTransport> {
    config: WidgetConfiguration,
    templates: TemplateRegistry,
    blocks: Vec<ItemBlock>,
    next_block: u64,
    current: Option<BlockId>,
    modal: SearchModal,
    transport: T,
    add_visible: bool,
}

impl<T: SearchTransport> ItemListWidget<T> {
    pub fn new(
        config: WidgetConfiguration,
        templates: TemplateRegistry,
        transport: T,
        translator: &dyn Translate,
    ) -> WidgetResult<Self> {
        config.validate()?;
        templates.get(&config.template_id)?;

        let modal = SearchModal::new(&config, translator);
        let add_visible = add_visible(0, config.multiple);
        Ok(Self {
            config,
            templates,
            blocks: Vec::new(),
            next_block: 0,
            current: None,
            modal,
            transport,
            add_visible,
        })
    }

    fn refresh_visibility(&mut self) {
        self.add_visible = add_visible(self.blocks.len(), self.config.multiple);
    }

    fn push_block(&mut self, item: &Item) -> BlockId {
        self.next_block += 1;
        let id = BlockId(self.next_block);
        self.blocks.push(ItemBlock::new(id, item));
        id
    }

    fn live_block_mut(&mut self, id: BlockId) -> WidgetResult<&mut ItemBlock> {
        self.blocks
            .iter_mut()
            .find(|block| block.id == id && block.is_live())
            .ok_or(WidgetError::UnknownBlock(id))
    }

    /// Replace the blocks with stored items.
    pub fn load<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Item>,
    {
        self.blocks.clear();
        self.current = None;
        for item in items {
            self.push_block(&item);
        }
        self.refresh_visibility();
    }

    /// Replace the blocks with the host field's stored value.
    ///
    /// Titles and urls come from `contents`, the resolved listing for the
    /// field; ids missing from it load with an empty label and link.
    pub fn load_field(&mut self, vars: &FieldVars, contents: &ResultSet) {
        let items: Vec<Item> = vars
            .value
            .iter()
            .filter_map(stored_id)
            .map(|id| match contents.get(&id) {
                Some(found) => Item::new(id, found.title.clone(), found.url.clone()),
                None => Item::new(id, "", ""),
            })
            .collect();
        self.load(items);
    }

    /// Append one empty block. Fails while the add control is hidden.
    pub fn add(&mut self) -> WidgetResult<BlockId> {
        if !self.add_visible {
            return Err(WidgetError::AddHidden);
        }
        let id = self.push_block(&Item::default());
        self.refresh_visibility();
        debug!(block = %id, "Added item block");
        Ok(id)
    }

    /// Edit control of `block`: make it current and open the modal.
    pub async fn edit(&mut self, block: BlockId) -> WidgetResult<()> {
        self.live_block_mut(block)?;
        self.current = Some(block);
        self.modal.initialize();
        let ticket = self.modal.open(block);
        self.dispatch(ticket).await;
        Ok(())
    }

    /// Search button or Enter in the modal.
    pub async fn submit(&mut self) {
        if let Some(ticket) = self.modal.submit() {
            self.dispatch(ticket).await;
        }
    }

    pub async fn key(&mut self, key: ModalKey) {
        if let Some(ticket) = self.modal.key(key) {
            self.dispatch(ticket).await;
        }
    }

    /// Send a ticket and apply its outcome. Returns whether it was applied.
    pub async fn dispatch(&mut self, ticket: SearchTicket) -> bool {
        let outcome = self.transport.search(&ticket.request).await;
        self.modal.complete(ticket.seq, outcome)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.modal.set_search_text(text);
    }

    pub fn check(&mut self, key: &str) -> bool {
        self.modal.check(key)
    }

    /// Write the checked result into the current block and close the modal.
    ///
    /// Returns `false` when nothing is checked. A current block removed
    /// while the modal was open receives nothing.
    pub fn confirm(&mut self) -> bool {
        let Some(selection) = self.modal.confirm() else {
            return false;
        };
        if self.current != Some(selection.target) {
            return true;
        }
        match self.live_block_mut(selection.target) {
            Ok(block) => {
                block.write_back(&selection.key, &selection.title, &selection.url);
                debug!(block = %selection.target, key = %selection.key, "Wrote selection into block");
            }
            Err(_) => debug!(block = %selection.target, "Current block is gone"),
        }
        true
    }

    /// Overlay click or close control.
    pub fn close(&mut self) {
        self.modal.close();
    }

    /// Start the delete transition of `block`.
    pub fn remove(&mut self, block: BlockId) -> WidgetResult<()> {
        let background = self.config.color.clone();
        self.live_block_mut(block)?.state = BlockState::Removing { background };
        Ok(())
    }

    /// Transition finished: detach the block and re-evaluate visibility.
    pub fn finish_removal(&mut self, block: BlockId) -> WidgetResult<()> {
        let index = self
            .blocks
            .iter()
            .position(|b| b.id == block && !b.is_live())
            .ok_or(WidgetError::UnknownBlock(block))?;
        self.blocks.remove(index);
        if self.current == Some(block) {
            self.current = None;
        }
        self.refresh_visibility();
        Ok(())
    }

    pub fn is_add_visible(&self) -> bool {
        self.add_visible
    }

    pub fn blocks(&self) -> &[ItemBlock] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&ItemBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn current(&self) -> Option<BlockId> {
        self.current
    }

    pub fn modal(&self) -> &SearchModal {
        &self.modal
    }

    pub fn config(&self) -> &WidgetConfiguration {
        &self.config
    }

    pub fn items(&self) -> Vec<Item> {
        self.blocks.iter().filter(|b| b.is_live()).map(ItemBlock::item).collect()
    }

    /// Posted field value: every non-empty id, or the first one alone when
    /// the field holds a single item.
    pub fn value(&self) -> Value {
        let ids: Vec<String> = self
            .blocks
            .iter()
            .filter(|b| b.is_live())
            .map(|b| b.hidden_id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        if self.config.multiple {
            Value::from(ids)
        } else {
            ids.into_iter().next().map(Value::from).unwrap_or_else(|| Value::from(""))
        }
    }

    /// Markup of the block container.
    pub fn render(&self) -> WidgetResult<String> {
        let template = self.templates.get(&self.config.template_id)?;
        let container = self
            .config
            .elements
            .strip_prefix('.')
            .ok_or_else(|| {
                WidgetError::Template(format!(
                    "elements must be a class selector, got {:?}",
                    self.config.elements
                ))
            })?;

        let mut html = format!(
            r#"<div class="{}">"#,
            encode_double_quoted_attribute(container)
        );
        for block in &self.blocks {
            html.push_str(&template.render(block, &self.config)?);
        }
        html.push_str("</div>");
        Ok(html)
    }
}

/// Id of one stored value entry: a string or a number.
fn stored_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

impl<T: SearchTransport> std::fmt::Debug for ItemListWidget<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemListWidget")
            .field("config", &self.config)
            .field("blocks", &self.blocks)
            .field("current", &self.current)
            .field("modal", &self.modal)
            .finish()
    }
}
