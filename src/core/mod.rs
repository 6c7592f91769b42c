//! Pagination core for tgpress.
//!
//! This module contains:
//! - [`filter`] - Post visibility (hide edits, unsupported media)
//! - [`units`] - Grouping posts and comments into [`ContentUnit`]s
//! - [`chunking`] - Greedy partitioning of units into [`Chunk`]s
//!
//! # Quick Start
//!
//! ```rust
//! use tgpress::core::{ChunkOptions, calculate_chunks, get_chunk_posts_and_comments};
//! use tgpress::repository::InMemoryRepository;
//! use tgpress::{Channel, Post};
//!
//! let repo = InMemoryRepository::new()
//!     .with_channel(Channel::new("chan", "Chan"))
//!     .with_post(Post::new(1, "chan", "2025-01-01"));
//!
//! let chunks = calculate_chunks(&repo, "chan", &ChunkOptions::new());
//! let (posts, comments) = get_chunk_posts_and_comments(&chunks[0]);
//! assert_eq!(posts.len(), 1);
//! assert!(comments.is_empty());
//! ```

pub mod chunking;
pub mod filter;
pub mod units;

pub use chunking::{
    Chunk, ChunkOptions, ChunkReport, ChunkSummary, calculate_chunks, get_chunk,
    get_chunk_posts_and_comments, partition_units,
};
pub use filter::{should_hide_media, should_hide_post, visible_posts};
pub use units::{ContentUnit, SortOrder, build_content_units};
