//! HTTP connectors for the postbrief pipeline.
//!
//! Each submodule is a thin, typed client for one external collaborator,
//! consumed strictly through its documented request/response contract:
//!
//! - [`gmail`] -- message list/get/delete plus OAuth2 token refresh
//! - [`notion`] -- page creation and block append, with content chunking
//! - [`slack`] -- `chat.postMessage`
//!
//! None of these retry; the pipeline wraps every call in the shared retry
//! layer. All failures are reported as
//! [`ConnectorError`](postbrief_types::ConnectorError).

pub mod gmail;
pub mod notion;
pub mod slack;

pub use gmail::GmailClient;
pub use notion::NotionClient;
pub use slack::SlackApiClient;
