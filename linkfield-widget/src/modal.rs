//! Search modal state machine.
//!
//! ```text
//! Closed -> AwaitingInput -> InFlight -> ShowingResults | ShowingError
//!    ^                                          |
//!    +---------------- close / confirm ---------+
//! ```
//!
//! The modal never performs I/O. Opening or submitting yields a
//! [`SearchTicket`]; the caller sends its request and hands the outcome back
//! through [`SearchModal::complete`]. Only the latest ticket is applied.

use crate::block::BlockId;
use crate::config::WidgetConfiguration;
use crate::error::WidgetResult;
use linkfield_api::{ResponseFormat, ResultRow, SearchData, SearchRequest, SearchResponse};
use linkfield_core::{keys, FieldMode, QueryArgs, Translate, TEXT_DOMAIN};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    AwaitingInput,
    InFlight,
    ShowingResults,
    ShowingError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    Enter,
    Escape,
}

/// A search the caller must send, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub seq: u64,
    pub request: SearchRequest,
}

/// Confirmed result, ready to be written into the target block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub target: BlockId,
    pub key: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SearchModal {
    state: ModalState,
    initialized: bool,
    target: Option<BlockId>,
    /// Host record being edited, substituted for `exclude = "current"`
    current_id: Option<String>,
    search_text: String,
    results: Vec<ResultRow>,
    checked: Option<String>,
    error: Option<String>,
    in_flight: bool,
    issued: u64,
    content_type: String,
    field: String,
    settings: QueryArgs,
    mode: FieldMode,
    error_text: String,
    reset_search_on_open: bool,
}

impl SearchModal {
    pub fn new(config: &WidgetConfiguration, translator: &dyn Translate) -> Self {
        Self {
            state: ModalState::Closed,
            initialized: false,
            target: None,
            current_id: config
                .current_id
                .clone()
                .filter(|id| !id.trim().is_empty()),
            search_text: String::new(),
            results: Vec::new(),
            checked: None,
            error: None,
            in_flight: false,
            issued: 0,
            content_type: config.content_type.clone(),
            field: config.field.clone(),
            settings: config.settings.clone(),
            mode: config.mode,
            error_text: translator.t(keys::AJAX_ERROR, TEXT_DOMAIN),
            reset_search_on_open: config.reset_search_on_open,
        }
    }

    /// One-time setup. Returns `false` when already initialized.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        debug!("Search modal initialized");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Show the modal for `target` and issue the opening search.
    pub fn open(&mut self, target: BlockId) -> SearchTicket {
        self.target = Some(target);
        if self.reset_search_on_open {
            self.search_text.clear();
        }
        self.state = ModalState::AwaitingInput;
        self.begin_search()
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Search button or Enter. `None` while closed.
    pub fn submit(&mut self) -> Option<SearchTicket> {
        if !self.is_open() {
            return None;
        }
        Some(self.begin_search())
    }

    /// Keyboard handling: Enter submits, Escape closes.
    pub fn key(&mut self, key: ModalKey) -> Option<SearchTicket> {
        match key {
            ModalKey::Enter => self.submit(),
            ModalKey::Escape => {
                self.close();
                None
            }
        }
    }

    fn begin_search(&mut self) -> SearchTicket {
        self.issued += 1;
        self.in_flight = true;
        self.state = ModalState::InFlight;

        let mut request = SearchRequest::new(self.search_text.clone())
            .with_type(self.content_type.clone())
            .with_settings(self.settings.clone())
            .with_mode(self.mode)
            .with_format(ResponseFormat::Rows);
        if !self.field.trim().is_empty() {
            request = request.with_field(self.field.clone());
        }
        if let Some(current) = &self.current_id {
            request = request.with_current(current.clone());
        }

        SearchTicket {
            seq: self.issued,
            request,
        }
    }

    /// Apply the outcome of ticket `seq`.
    ///
    /// Returns `false` and changes nothing when the ticket is not the latest
    /// issued or the modal has been closed since.
    pub fn complete(&mut self, seq: u64, outcome: WidgetResult<SearchResponse>) -> bool {
        if !self.is_open() || seq != self.issued {
            debug!(seq, latest = self.issued, "Discarding stale search response");
            return false;
        }

        self.in_flight = false;
        self.checked = None;
        match outcome {
            Ok(SearchResponse {
                success: true,
                data: SearchData::Rows(rows),
            }) => {
                self.results = rows;
                self.error = None;
                self.state = ModalState::ShowingResults;
            }
            Ok(response) => {
                debug!(message = ?response.message(), "Search was not successful");
                self.show_error();
            }
            Err(err) => {
                warn!(error = %err, "Search request failed");
                self.show_error();
            }
        }
        true
    }

    fn show_error(&mut self) {
        self.results.clear();
        self.error = Some(self.error_text.clone());
        self.state = ModalState::ShowingError;
    }

    /// Check the result with `key`. Returns `false` for unknown keys.
    pub fn check(&mut self, key: &str) -> bool {
        if self.results.iter().any(|row| row.key == key) {
            self.checked = Some(key.to_string());
            true
        } else {
            false
        }
    }

    /// Confirm the checked result and close. `None` (and no state change)
    /// without a checked result.
    pub fn confirm(&mut self) -> Option<Selection> {
        let target = self.target?;
        let checked = self.checked.as_deref()?;
        let row = self.results.iter().find(|row| row.key == checked)?;

        let selection = Selection {
            target,
            key: row.key.clone(),
            title: row.title.clone(),
            url: row.url.clone(),
        };
        self.close();
        Some(selection)
    }

    /// Overlay click, Escape or the close control. Keeps the search text.
    pub fn close(&mut self) {
        self.state = ModalState::Closed;
        self.target = None;
        self.results.clear();
        self.checked = None;
        self.error = None;
        self.in_flight = false;
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    /// Spinner is active exactly while the latest request is outstanding.
    pub fn spinner_active(&self) -> bool {
        self.in_flight
    }

    pub fn target(&self) -> Option<BlockId> {
        self.target
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    pub fn checked(&self) -> Option<&str> {
        self.checked.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sequence number of the latest issued request.
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WidgetError;
    use linkfield_core::Catalog;

    fn modal() -> SearchModal {
        SearchModal::new(&WidgetConfiguration::default(), &Catalog::english())
    }

    fn row(key: &str, title: &str, url: &str) -> ResultRow {
        ResultRow {
            key: key.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            alternate: false,
        }
    }

    #[test]
    fn test_initialize_once() {
        let mut modal = modal();
        assert!(modal.initialize());
        assert!(!modal.initialize());
        assert!(modal.is_initialized());
    }

    #[test]
    fn test_open_issues_empty_search_with_field_config() {
        let config = WidgetConfiguration {
            content_type: "users".to_string(),
            field: "user_login".to_string(),
            settings: QueryArgs::new().with("role", "editor"),
            current_id: Some("9".to_string()),
            ..Default::default()
        };
        let mut modal = SearchModal::new(&config, &Catalog::english());
        let ticket = modal.open(BlockId(1));

        assert_eq!(ticket.seq, 1);
        assert_eq!(ticket.request.search, "");
        assert_eq!(ticket.request.content_type(), "users");
        assert_eq!(ticket.request.field.as_deref(), Some("user_login"));
        assert_eq!(ticket.request.settings.get_str("role").as_deref(), Some("editor"));
        assert_eq!(ticket.request.current.as_deref(), Some("9"));
        assert_eq!(ticket.request.format, ResponseFormat::Rows);
        assert_eq!(modal.state(), ModalState::InFlight);
        assert!(modal.spinner_active());
    }

    #[test]
    fn test_results_then_confirm() {
        let mut modal = modal();
        let ticket = modal.open(BlockId(4));
        assert!(modal.complete(ticket.seq, Ok(SearchResponse::rows(vec![row("42", "My Post", "https://x/42")]))));
        assert_eq!(modal.state(), ModalState::ShowingResults);
        assert!(!modal.spinner_active());

        assert_eq!(modal.confirm(), None);
        assert!(modal.is_open());

        assert!(modal.check("42"));
        let selection = modal.confirm().unwrap();
        assert_eq!(selection.target, BlockId(4));
        assert_eq!(selection.key, "42");
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn test_failure_shows_generic_error_and_stays_open() {
        let mut modal = modal();
        let ticket = modal.open(BlockId(1));
        modal.complete(ticket.seq, Err(WidgetError::InvalidResponse("boom".to_string())));
        assert_eq!(modal.state(), ModalState::ShowingError);
        assert_eq!(
            modal.error(),
            Some("An error has occurred. Please reload the page and try again.")
        );
        assert!(!modal.spinner_active());

        let ticket = modal.submit().unwrap();
        modal.complete(ticket.seq, Ok(SearchResponse::failure("No items found.")));
        assert_eq!(modal.state(), ModalState::ShowingError);
        assert!(modal.is_open());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut modal = modal();
        let first = modal.open(BlockId(1));
        modal.set_search_text("hello");
        let second = modal.submit().unwrap();

        assert!(!modal.complete(first.seq, Ok(SearchResponse::rows(vec![row("1", "Old", "u")]))));
        assert!(modal.spinner_active());
        assert!(modal.complete(second.seq, Ok(SearchResponse::rows(vec![row("2", "New", "u")]))));
        assert_eq!(modal.results()[0].key, "2");
    }

    #[test]
    fn test_close_keeps_search_text_and_drops_late_responses() {
        let mut modal = modal();
        let ticket = modal.open(BlockId(1));
        modal.set_search_text("hello");
        modal.key(ModalKey::Escape);

        assert_eq!(modal.state(), ModalState::Closed);
        assert_eq!(modal.search_text(), "hello");
        assert!(!modal.complete(ticket.seq, Ok(SearchResponse::rows(vec![row("1", "a", "u")]))));
        assert!(modal.results().is_empty());

        let reopened = modal.open(BlockId(2));
        assert_eq!(reopened.request.search, "hello");
    }

    #[test]
    fn test_reset_search_on_open() {
        let config = WidgetConfiguration {
            reset_search_on_open: true,
            ..Default::default()
        };
        let mut modal = SearchModal::new(&config, &Catalog::english());
        modal.set_search_text("hello");
        let ticket = modal.open(BlockId(1));
        assert_eq!(ticket.request.search, "");
    }

    #[test]
    fn test_submit_while_closed_is_ignored() {
        let mut modal = modal();
        assert!(modal.submit().is_none());
        assert!(modal.key(ModalKey::Enter).is_none());
    }

    #[test]
    fn test_check_unknown_key() {
        let mut modal = modal();
        let ticket = modal.open(BlockId(1));
        modal.complete(ticket.seq, Ok(SearchResponse::rows(vec![row("1", "a", "u")])));
        assert!(!modal.check("2"));
        assert_eq!(modal.checked(), None);
    }
}
