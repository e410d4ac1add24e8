//! Block templates.
//!
//! A template turns one item block into markup addressable through the
//! configured selectors. Templates are registered by id and the widget
//! renders with the one named by `template_id`.

use crate::block::{BlockState, ItemBlock};
use crate::config::WidgetConfiguration;
use crate::error::{WidgetError, WidgetResult};
use html_escape::{encode_double_quoted_attribute, encode_text};
use linkfield_core::{keys, Translate, TEXT_DOMAIN};
use std::collections::HashMap;
use std::sync::Arc;

pub trait BlockTemplate: Send + Sync {
    fn render(&self, block: &ItemBlock, config: &WidgetConfiguration) -> WidgetResult<String>;
}

/// Class name of a `.class` selector.
fn class_of(field: &str, selector: &str) -> WidgetResult<String> {
    selector
        .strip_prefix('.')
        .filter(|class| {
            !class.is_empty()
                && class
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .map(str::to_string)
        .ok_or_else(|| {
            WidgetError::Template(format!("{} must be a class selector, got {:?}", field, selector))
        })
}

/// Element name of a tag selector.
fn tag_of(field: &str, selector: &str) -> WidgetResult<String> {
    let valid = !selector.is_empty()
        && selector.chars().all(|c| c.is_ascii_alphanumeric())
        && selector.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if valid {
        Ok(selector.to_ascii_lowercase())
    } else {
        Err(WidgetError::Template(format!(
            "{} must be an element name, got {:?}",
            field, selector
        )))
    }
}

/// Built-in block markup: hidden id input, label, link, edit and remove
/// controls.
#[derive(Debug, Clone)]
pub struct StandardTemplate {
    input_name: String,
    edit_label: String,
    remove_label: String,
}

impl StandardTemplate {
    pub fn new(input_name: impl Into<String>, translator: &dyn Translate) -> Self {
        Self {
            input_name: input_name.into(),
            edit_label: translator.t(keys::EDITBLOCK_LABEL, TEXT_DOMAIN),
            remove_label: translator.t(keys::REMOVEBLOCK_LABEL, TEXT_DOMAIN),
        }
    }
}

impl BlockTemplate for StandardTemplate {
    fn render(&self, block: &ItemBlock, config: &WidgetConfiguration) -> WidgetResult<String> {
        let tag = tag_of("item", &config.item)?;
        let label_class = class_of("link_label_ref", &config.link_label_ref)?;
        let url_class = class_of("link_url_ref", &config.link_url_ref)?;
        let edit_class = class_of("edit_button_ref", &config.edit_button_ref)?;
        let remove_class = class_of("remove_button_ref", &config.remove_button_ref)?;

        let style = match &block.state {
            BlockState::Live => String::new(),
            BlockState::Removing { background } => format!(
                r#" style="background-color: {}""#,
                encode_double_quoted_attribute(background)
            ),
        };

        Ok(format!(
            concat!(
                r#"<{tag} data-block="{block}"{style}>"#,
                r#"<input type="hidden" name="{name}" value="{id}" />"#,
                r#"<span class="{label_class}">{label}</span> "#,
                r#"<a class="{url_class}" href="{href}" target="_blank">{text}</a> "#,
                r#"<button type="button" class="button {edit_class}">{edit}</button> "#,
                r#"<button type="button" class="button {remove_class}">{remove}</button>"#,
                "</{tag}>"
            ),
            tag = tag,
            block = block.id,
            style = style,
            name = encode_double_quoted_attribute(&self.input_name),
            id = encode_double_quoted_attribute(&block.hidden_id),
            label_class = label_class,
            label = encode_text(&block.label),
            url_class = url_class,
            href = encode_double_quoted_attribute(&block.link_href),
            text = encode_text(&block.link_text),
            edit_class = edit_class,
            edit = encode_text(&self.edit_label),
            remove_class = remove_class,
            remove = encode_text(&self.remove_label),
        ))
    }
}

/// Templates addressable by id.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<dyn BlockTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding [`StandardTemplate`] under `template_id`.
    pub fn standard(template_id: &str, input_name: &str, translator: &dyn Translate) -> Self {
        Self::new().with_template(template_id, Arc::new(StandardTemplate::new(input_name, translator)))
    }

    pub fn with_template(mut self, id: impl Into<String>, template: Arc<dyn BlockTemplate>) -> Self {
        self.templates.insert(id.into(), template);
        self
    }

    pub fn get(&self, id: &str) -> WidgetResult<&Arc<dyn BlockTemplate>> {
        self.templates
            .get(id)
            .ok_or_else(|| WidgetError::Template(format!("No template registered as {:?}", id)))
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.templates.keys().collect();
        ids.sort();
        f.debug_struct("TemplateRegistry").field("templates", &ids).finish()
    }
}
