//! Result rendering.
//!
//! Turns a [`ResultSet`] into the selectable table fragment the admin modal
//! injects, or into [`ResultRow`]s for clients that render themselves.
//! [`FieldMode::Extended`] adds a "choose one" row above the results and an
//! id column.

use crate::types::ResultRow;
use html_escape::{encode_double_quoted_attribute, encode_text};
use linkfield_core::{keys, FieldMode, ResultSet, SearchResult, Translate, TEXT_DOMAIN};

/// Title shown for a result, or the untitled placeholder.
fn display_title(result: &SearchResult, translator: &dyn Translate) -> String {
    if result.title.trim().is_empty() {
        translator.t(keys::AJAX_NO_TITLE, TEXT_DOMAIN)
    } else {
        result.title.clone()
    }
}

/// Stripe flag for the zero-based row index (1st, 3rd, 5th... row).
fn is_alternate(index: usize) -> bool {
    index % 2 == 0
}

/// Render the results as a `widefat` table with one radio per row.
pub fn render_table(results: &ResultSet, mode: FieldMode, translator: &dyn Translate) -> String {
    let extended = mode == FieldMode::Extended;
    let t = |key: &str| encode_text(&translator.t(key, TEXT_DOMAIN)).into_owned();

    let mut html = String::with_capacity(256 + results.len() * 256);
    html.push_str(r#"<table class="widefat"><thead><tr><th class="found-radio"></th><th>"#);
    html.push_str(&t(keys::AJAX_TITLE));
    html.push_str("</th>");
    if extended {
        html.push_str(r#"<th class="found-key">"#);
        html.push_str(&t(keys::AJAX_ID));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    if extended {
        html.push_str(r#"<tr class="found-none"><td class="found-radio"></td><td class="found-title" colspan="2"><em>"#);
        html.push_str(&t(keys::AJAX_CHOOSE_ONE));
        html.push_str("</em></td></tr>");
    }

    for (index, result) in results.iter().enumerate() {
        let class = if is_alternate(index) {
            "found-posts alternate"
        } else {
            "found-posts"
        };
        let key = encode_double_quoted_attribute(&result.key);
        let url_attr = encode_double_quoted_attribute(&result.url);
        let title = display_title(result, translator);

        html.push_str(&format!(
            concat!(
                r#"<tr class="{class}">"#,
                r#"<td class="found-radio"><input type="radio" id="found-{key}" name="key" value="{key}" /></td>"#,
                r#"<td class="found-title" data-l="{url_attr}"><label for="found-{key}">{title}</label><br/>"#,
                r#"<a href="{url_attr}" target="_blank"><small>{url_text}</small></a></td>"#,
            ),
            class = class,
            key = key,
            url_attr = url_attr,
            title = encode_text(&title),
            url_text = encode_text(&result.url),
        ));
        if extended {
            html.push_str(r#"<td class="found-key">"#);
            html.push_str(&encode_text(&result.key));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

/// Structured rows with the same placeholder and striping rules.
pub fn render_rows(results: &ResultSet, translator: &dyn Translate) -> Vec<ResultRow> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| ResultRow {
            key: result.key.clone(),
            title: display_title(result, translator),
            url: result.url.clone(),
            alternate: is_alternate(index),
        })
        .collect()
}
