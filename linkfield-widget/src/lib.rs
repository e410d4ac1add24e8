//! LINKFIELD Widget - Repeatable Item List and Search Modal
//!
//! Client half of the picker: an editable list of item blocks, each filled
//! through a modal that searches the `linkfield-api` endpoint and writes the
//! confirmed result back into the block that opened it.
//!
//! The widget is a plain state machine. Rendering goes through a
//! [`BlockTemplate`], requests through a [`SearchTransport`].

pub mod block;
pub mod config;
pub mod error;
pub mod list;
pub mod modal;
pub mod template;
pub mod transport;

pub use block::{BlockId, BlockState, Item, ItemBlock};
pub use config::{ConfigError, WidgetConfiguration, WidgetOverrides};
pub use error::{WidgetError, WidgetResult};
pub use list::{add_visible, ItemListWidget};
pub use modal::{ModalKey, ModalState, SearchModal, SearchTicket, Selection};
pub use template::{BlockTemplate, StandardTemplate, TemplateRegistry};
pub use transport::{HttpTransport, SearchTransport};

// Wire types shared with the server
pub use linkfield_api::{ResponseFormat, ResultRow, SearchData, SearchRequest, SearchResponse};
