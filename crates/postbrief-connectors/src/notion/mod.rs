//! Notion connector.
//!
//! # Modules
//!
//! - [`blocks`] -- content chunking for the per-block size limit
//! - [`types`] -- Notion API wire types
//! - [`api`] -- HTTP client for page create / block append

pub mod api;
pub mod blocks;
pub mod types;

pub use api::NotionClient;
pub use blocks::{chunk_text, NOTION_MAX_BLOCK_LEN};
