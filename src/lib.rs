//! # tgpress
//!
//! A Rust library for turning archived Telegram channels into print: it
//! paginates a channel into bounded chunks and exports frozen page layouts
//! as InDesign IDML packages.
//!
//! ## Overview
//!
//! - **Chunking** — posts, albums and their discussion comments become
//!   weighted content units, which are packed greedily into chunks of roughly
//!   `items_per_chunk` weight
//! - **IDML export** — a frozen layout (where each post landed on which page,
//!   in millimetres) is rebuilt as InDesign spreads, text frames and linked
//!   images, and zipped into a `.idml` package
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tgpress::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let repo = InMemoryRepository::from_path("archive.json")?;
//!
//!     // Paginate
//!     let chunks = calculate_chunks(&repo, "llamasass", &ChunkOptions::new());
//!     println!("{} chunks", chunks.len());
//!
//!     // Export a frozen layout
//!     let layout = FrozenLayout::from_path("layout.json")?;
//!     let options = ExportOptions::new().with_media_root("downloads");
//!     export_frozen_layout(&repo, "llamasass", &layout, &options, "llamasass.idml")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`post`] — [`Post`], [`Channel`], [`Edit`]
//! - [`repository`] — the [`PostRepository`](repository::PostRepository) data boundary and
//!   [`InMemoryRepository`](repository::InMemoryRepository)
//! - [`core`] — pagination
//!   - [`core::filter`] — hidden posts and unsupported media
//!   - [`core::units`] — [`ContentUnit`](core::ContentUnit) construction and ordering
//!   - [`core::chunking`] — [`calculate_chunks`](core::calculate_chunks), [`get_chunk`](core::get_chunk)
//! - [`idml`] — [`DocumentBuilder`](idml::DocumentBuilder) and
//!   [`export_frozen_layout`](idml::export_frozen_layout)
//! - [`markup`] — post HTML to styled paragraphs
//! - [`dates`] — post date parsing and print formatting
//! - [`config`] — print settings, page sizes, export options
//! - [`format`] — chunk report output formats
//! - [`cli`] — CLI types (feature `cli`)
//! - [`error`] — [`PressError`], [`Result`]
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod dates;
pub mod error;
pub mod format;
pub mod idml;
#[cfg(feature = "cli")]
pub mod logging;
pub mod markup;
pub mod post;
pub mod repository;

// Re-export the main types at the crate root for convenience
pub use error::{PressError, Result};
pub use post::{Channel, Edit, Post};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use tgpress::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use crate::{Channel, Edit, Post};

    // Error types
    pub use crate::error::{PressError, Result};

    // Data boundary
    pub use crate::repository::{InMemoryRepository, PostRepository};

    // Configuration
    pub use crate::config::{ExportOptions, LayoutConfig, PrintSettings};

    // Pagination
    pub use crate::core::{
        Chunk, ChunkOptions, ChunkReport, ContentUnit, SortOrder, calculate_chunks, get_chunk,
        get_chunk_posts_and_comments,
    };

    // Output
    pub use crate::format::{OutputFormat, report_to_string, write_report};

    // IDML export
    pub use crate::idml::layout::FrozenLayout;
    pub use crate::idml::{DocumentBuilder, export_frozen_layout};
}
