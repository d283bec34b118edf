//! Anthropic Messages API client for postbrief.
//!
//! A thin, typed adapter over the documented `/v1/messages` endpoint.
//! There is no retry logic here; the pipeline wraps calls in the shared
//! retry layer.
//!
//! # Architecture
//!
//! - [`Provider`] trait defines the completion interface
//! - [`AnthropicProvider`] implements it against the Messages API
//! - [`MessagesRequest`]/[`MessagesResponse`] are the wire types
//!
//! ```rust,ignore
//! use postbrief_llm::{AnthropicProvider, MessagesRequest, InputMessage};
//!
//! let provider = AnthropicProvider::new(api_key);
//! let request = MessagesRequest::new("claude-3-5-sonnet-20241022", 1024)
//!     .with_user_message("Summarize this email: ...");
//! let response = provider.complete(&request).await?;
//! println!("{}", response.text());
//! ```

pub mod anthropic;
pub mod error;
pub mod provider;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use error::{ProviderError, Result};
pub use provider::Provider;
pub use types::{ContentBlock, InputMessage, MessagesRequest, MessagesResponse, Usage};
