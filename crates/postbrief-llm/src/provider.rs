//! The [`Provider`] trait for completion calls.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{MessagesRequest, MessagesResponse};

/// A provider that can execute a completion request.
///
/// The only implementation in this crate is
/// [`AnthropicProvider`](crate::anthropic::AnthropicProvider); tests
/// substitute mocks.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name for log fields (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Execute a completion request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`](crate::error::ProviderError) on network
    /// failure, authentication rejection, rate limiting, or an
    /// unparseable response.
    async fn complete(&self, request: &MessagesRequest) -> Result<MessagesResponse>;
}
