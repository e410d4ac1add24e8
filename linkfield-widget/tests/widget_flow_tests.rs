//! Widget Flow Tests
//!
//! End-to-end behaviour of the item list and its search modal:
//! - A confirmed result is written back into the block that opened the modal
//! - Only the latest issued search may update the modal
//! - Failed or unsuccessful searches show the generic error
//! - The add control follows the multiple flag and the block count

use std::time::Duration;

use linkfield_test_utils::fixtures;
use linkfield_test_utils::{Catalog, MockReply, MockTransport, RouterTransport};
use linkfield_widget::{
    add_visible, HttpTransport, Item, ItemListWidget, ModalKey, ModalState, ResultRow,
    SearchModal, SearchResponse, SearchTransport, TemplateRegistry, WidgetConfiguration,
};
use proptest::prelude::*;

const GENERIC_ERROR: &str = "An error has occurred. Please reload the page and try again.";

// ============================================================================
// HELPERS
// ============================================================================

fn widget<T: SearchTransport>(config: WidgetConfiguration, transport: T) -> ItemListWidget<T> {
    let catalog = Catalog::english();
    let templates = TemplateRegistry::standard(&config.template_id, "links[]", &catalog);
    ItemListWidget::new(config, templates, transport, &catalog).unwrap()
}

fn row(key: &str, title: &str) -> ResultRow {
    ResultRow {
        key: key.to_string(),
        title: title.to_string(),
        url: format!("https://x/{}", key),
        alternate: false,
    }
}

// ============================================================================
// WRITE-BACK
// ============================================================================

#[tokio::test]
async fn test_confirm_writes_into_opening_block() {
    let transport = MockTransport::new().with_rows(vec![fixtures::scenario_d_row()]);
    let mut list = widget(WidgetConfiguration::default(), transport.clone());
    let block = list.add().unwrap();

    list.edit(block).await.unwrap();
    assert_eq!(list.modal().state(), ModalState::ShowingResults);
    assert!(list.check("42"));
    assert!(list.confirm());

    let written = list.block(block).unwrap();
    assert_eq!(written.hidden_id, "42");
    assert_eq!(written.label, "My Post");
    assert_eq!(written.link_href, "https://x/42");
    assert_eq!(written.link_text, "https://x/42");
    assert!(!list.modal().is_open());
    assert_eq!(list.value(), serde_json::json!("42"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.content_type(), "post");
    assert_eq!(request.field.as_deref(), Some("ID"));
    assert_eq!(request.current, None);
}

#[tokio::test]
async fn test_only_current_block_receives_selection() {
    let config = WidgetConfiguration {
        multiple: true,
        ..Default::default()
    };
    let transport = MockTransport::new().with_rows(vec![row("7", "Seven")]);
    let mut list = widget(config, transport.clone());
    list.load(vec![Item::new("1", "One", "https://x/1"), Item::new("2", "Two", "https://x/2")]);
    let second = list.blocks()[1].id;

    list.edit(second).await.unwrap();
    list.check("7");
    list.confirm();

    let ids: Vec<&str> = list.blocks().iter().map(|b| b.hidden_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "7"]);
    assert_eq!(transport.requests()[0].current, None);
    assert_eq!(list.value(), serde_json::json!(["1", "7"]));
}

#[tokio::test]
async fn test_exclude_current_names_host_record_not_block() {
    let config = WidgetConfiguration {
        multiple: true,
        settings: linkfield_test_utils::QueryArgs::new().with("exclude", "current"),
        ..Default::default()
    };
    let transport = MockTransport::new().with_rows(vec![row("5", "Five")]);
    let mut list = widget(config.clone(), transport.clone());
    list.load(vec![Item::new("5", "Five", "https://x/5")]);
    let block = list.blocks()[0].id;

    list.edit(block).await.unwrap();
    assert_eq!(transport.last_request().unwrap().current, None);

    let hosted = WidgetConfiguration {
        current_id: Some("1".to_string()),
        ..config
    };
    let mut list = widget(hosted, transport.clone());
    list.load(vec![Item::new("5", "Five", "https://x/5")]);
    let block = list.blocks()[0].id;
    list.edit(block).await.unwrap();
    assert_eq!(transport.last_request().unwrap().current.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_filled_block_still_lists_its_own_item() {
    let config = WidgetConfiguration {
        settings: linkfield_test_utils::QueryArgs::new().with("exclude", "current"),
        current_id: Some("2".to_string()),
        ..Default::default()
    };
    let mut list = widget(config, RouterTransport::new(fixtures::site_router()));
    list.load(vec![Item::new("1", "Hello World", "https://site.test/?p=1")]);
    let block = list.blocks()[0].id;

    list.edit(block).await.unwrap();
    let keys: Vec<&str> = list.modal().results().iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["1", "3"]);
}

#[tokio::test]
async fn test_confirm_without_check_keeps_modal_open() {
    let transport = MockTransport::new().with_rows(vec![row("7", "Seven")]);
    let mut list = widget(WidgetConfiguration::default(), transport);
    let block = list.add().unwrap();

    list.edit(block).await.unwrap();
    assert!(!list.check("missing"));
    assert!(!list.confirm());
    assert!(list.modal().is_open());
    assert_eq!(list.block(block).unwrap().hidden_id, "");
}

#[tokio::test]
async fn test_search_through_router() {
    let mut list = widget(WidgetConfiguration::default(), RouterTransport::new(fixtures::site_router()));
    let block = list.add().unwrap();

    list.edit(block).await.unwrap();
    assert_eq!(list.modal().results().len(), 3);

    list.set_search_text("hello");
    list.key(ModalKey::Enter).await;
    let keys: Vec<&str> = list.modal().results().iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["1", "3"]);

    list.check("3");
    list.confirm();
    let written = list.block(block).unwrap();
    assert_eq!(written.label, "Hello Again");
    assert_eq!(written.link_href, "https://site.test/?p=3");
}

#[tokio::test]
async fn test_search_over_http() {
    let addr = linkfield_test_utils::serve(fixtures::site_router()).await.unwrap();
    let transport = HttpTransport::new(&format!("http://{}/", addr), Duration::from_secs(5)).unwrap();
    let mut list = widget(WidgetConfiguration::default(), transport);
    let block = list.add().unwrap();

    list.set_search_text("rust");
    list.edit(block).await.unwrap();
    let titles: Vec<&str> = list.modal().results().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Rust Notes"]);
}

#[tokio::test]
async fn test_unknown_type_over_http_shows_error() {
    let addr = linkfield_test_utils::serve(fixtures::site_router()).await.unwrap();
    let transport = HttpTransport::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    let config = WidgetConfiguration {
        content_type: "bogus".to_string(),
        ..Default::default()
    };
    let mut list = widget(config, transport);
    let block = list.add().unwrap();

    list.edit(block).await.unwrap();
    assert_eq!(list.modal().state(), ModalState::ShowingError);
    assert_eq!(list.modal().error(), Some(GENERIC_ERROR));
}

// ============================================================================
// ERRORS
// ============================================================================

#[tokio::test]
async fn test_transport_failure_shows_generic_error() {
    let transport = MockTransport::new().with_failure("connection reset");
    let mut list = widget(WidgetConfiguration::default(), transport);
    let block = list.add().unwrap();

    list.edit(block).await.unwrap();
    assert_eq!(list.modal().state(), ModalState::ShowingError);
    assert_eq!(list.modal().error(), Some(GENERIC_ERROR));
    assert!(list.modal().results().is_empty());
    assert!(!list.modal().spinner_active());
}

#[tokio::test]
async fn test_no_items_envelope_shows_generic_error() {
    let transport = MockTransport::new()
        .with_reply(MockReply::Respond(SearchResponse::failure("No items found.")));
    let mut list = widget(WidgetConfiguration::default(), transport.clone());
    let block = list.add().unwrap();

    list.edit(block).await.unwrap();
    assert_eq!(list.modal().error(), Some(GENERIC_ERROR));

    // A later successful search clears the error.
    transport.push(MockReply::Respond(SearchResponse::rows(vec![row("1", "One")])));
    list.submit().await;
    assert_eq!(list.modal().state(), ModalState::ShowingResults);
    assert_eq!(list.modal().error(), None);
}

// ============================================================================
// MODAL LIFECYCLE
// ============================================================================

#[tokio::test]
async fn test_escape_closes_and_reopen_keeps_search_text() {
    let transport = MockTransport::new();
    let mut list = widget(WidgetConfiguration::default(), transport.clone());
    let block = list.add().unwrap();

    list.edit(block).await.unwrap();
    list.set_search_text("notes");
    list.key(ModalKey::Escape).await;
    assert!(!list.modal().is_open());

    list.edit(block).await.unwrap();
    assert_eq!(transport.last_request().unwrap().search, "notes");
    assert!(list.modal().is_initialized());
}

#[tokio::test]
async fn test_reset_search_on_open() {
    let config = WidgetConfiguration {
        reset_search_on_open: true,
        ..Default::default()
    };
    let transport = MockTransport::new();
    let mut list = widget(config, transport.clone());
    let block = list.add().unwrap();

    list.set_search_text("notes");
    list.edit(block).await.unwrap();
    assert_eq!(transport.last_request().unwrap().search, "");
}

#[test]
fn test_response_after_close_is_discarded() {
    let mut modal = SearchModal::new(&WidgetConfiguration::default(), &Catalog::english());
    let ticket = modal.open(linkfield_widget::BlockId(1));
    modal.close();

    let applied = modal.complete(ticket.seq, Ok(SearchResponse::rows(vec![row("1", "One")])));
    assert!(!applied);
    assert_eq!(modal.state(), ModalState::Closed);
    assert!(modal.results().is_empty());
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[derive(Debug, Clone)]
enum ListOp {
    Add,
    Remove(prop::sample::Index),
}

fn arb_list_ops() -> impl Strategy<Value = Vec<ListOp>> {
    prop::collection::vec(
        prop_oneof![
            Just(ListOp::Add),
            any::<prop::sample::Index>().prop_map(ListOp::Remove),
        ],
        0..20,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_add_visibility_tracks_block_count(multiple in any::<bool>(), ops in arb_list_ops()) {
        let config = WidgetConfiguration { multiple, ..Default::default() };
        let mut list = widget(config, MockTransport::new());

        for op in ops {
            match op {
                ListOp::Add => {
                    let visible = list.is_add_visible();
                    prop_assert_eq!(list.add().is_ok(), visible);
                }
                ListOp::Remove(index) => {
                    if list.blocks().is_empty() {
                        continue;
                    }
                    let id = list.blocks()[index.index(list.blocks().len())].id;
                    list.remove(id).unwrap();
                    list.finish_removal(id).unwrap();
                }
            }
            prop_assert_eq!(list.is_add_visible(), add_visible(list.blocks().len(), multiple));
        }
    }

    #[test]
    fn prop_only_latest_search_applies(searches in 1usize..6, order in any::<prop::sample::Index>()) {
        let mut modal = SearchModal::new(&WidgetConfiguration::default(), &Catalog::english());
        let mut tickets = vec![modal.open(linkfield_widget::BlockId(1))];
        for _ in 1..searches {
            tickets.push(modal.submit().unwrap());
        }
        let latest = modal.latest_seq();

        // Complete one stale ticket first when there is one.
        let stale = &tickets[order.index(tickets.len())];
        if stale.seq != latest {
            prop_assert!(!modal.complete(stale.seq, Ok(SearchResponse::rows(vec![row("stale", "Stale")]))));
            prop_assert!(modal.spinner_active());
        }

        prop_assert!(modal.complete(latest, Ok(SearchResponse::rows(vec![row("fresh", "Fresh")]))));
        let keys: Vec<&str> = modal.results().iter().map(|r| r.key.as_str()).collect();
        prop_assert_eq!(keys, vec!["fresh"]);
        prop_assert!(!modal.spinner_active());
    }
}
