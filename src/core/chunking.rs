//! Greedy partitioning of content units into bounded chunks.
//!
//! # Algorithm
//!
//! One forward pass over the ordered units:
//!
//! - `max_weight = items_per_chunk * (1 + overflow_threshold)` is the ceiling
//! - `threshold = items_per_chunk * 0.8` marks a chunk as almost full
//! - a unit that fits under the ceiling is appended
//! - otherwise, an almost-full chunk is closed and the unit opens the next one
//! - otherwise the unit is appended anyway (oversized units land whole)
//!
//! # Example
//!
//! ```
//! use tgpress::core::chunking::{ChunkOptions, calculate_chunks};
//! use tgpress::repository::InMemoryRepository;
//! use tgpress::{Channel, Post};
//!
//! let mut repo = InMemoryRepository::new().with_channel(Channel::new("chan", "Chan"));
//! for id in 1..=10 {
//!     repo.insert_post(Post::new(id, "chan", format!("2025-01-{id:02}")));
//! }
//!
//! let opts = ChunkOptions::new().with_items_per_chunk(3);
//! let chunks = calculate_chunks(&repo, "chan", &opts);
//! let sizes: Vec<_> = chunks.iter().map(|c| c.posts_count).collect();
//! assert_eq!(sizes, vec![3, 3, 3, 1]);
//! ```

use serde::{Deserialize, Serialize};

use super::units::{ContentUnit, SortOrder, build_content_units};
use crate::config::PrintSettings;
use crate::error::{PressError, Result};
use crate::post::Post;
use crate::repository::PostRepository;

/// Fraction of the target at which a chunk counts as almost full.
pub const ALMOST_FULL_RATIO: f64 = 0.8;

/// Parameters of a chunking run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOptions {
    /// Target weight per chunk (default: 50)
    pub items_per_chunk: usize,
    /// Allowed overflow above the target (default: 0.2)
    pub overflow_threshold: f64,
    /// Unit order (default: newest first)
    pub sort_order: SortOrder,
    /// Keep posts hidden by edits or unsupported media (default: false)
    pub include_hidden: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            items_per_chunk: 50,
            overflow_threshold: 0.2,
            sort_order: SortOrder::Desc,
            include_hidden: false,
        }
    }
}

impl ChunkOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes chunk sizing from a channel's print settings.
    pub fn from_settings(settings: &PrintSettings) -> Self {
        Self {
            items_per_chunk: settings.items_per_chunk,
            overflow_threshold: settings.overflow_threshold,
            ..Self::default()
        }
    }

    /// Sets the target weight.
    #[must_use]
    pub fn with_items_per_chunk(mut self, items: usize) -> Self {
        self.items_per_chunk = items;
        self
    }

    /// Sets the overflow tolerance.
    #[must_use]
    pub fn with_overflow_threshold(mut self, threshold: f64) -> Self {
        self.overflow_threshold = threshold;
        self
    }

    /// Sets the unit order.
    #[must_use]
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Keeps hidden posts.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// The hard ceiling a chunk may reach before it must close.
    pub fn max_weight(&self) -> f64 {
        self.items_per_chunk as f64 * (1.0 + self.overflow_threshold)
    }

    /// The almost-full mark.
    pub fn threshold_weight(&self) -> f64 {
        self.items_per_chunk as f64 * ALMOST_FULL_RATIO
    }
}

/// A page of content units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Zero-based position
    pub index: usize,
    /// Units in order
    pub units: Vec<ContentUnit>,
    /// Sum of unit weights
    pub total_weight: usize,
    /// Sum of post-equivalents (albums count every member)
    pub posts_count: usize,
    /// Sum of attached comments
    pub comments_count: usize,
    /// Latest unit date
    pub date_from: Option<String>,
    /// Earliest unit date
    pub date_to: Option<String>,
}

impl Chunk {
    /// Creates an empty chunk.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            units: Vec::new(),
            total_weight: 0,
            posts_count: 0,
            comments_count: 0,
            date_from: None,
            date_to: None,
        }
    }

    /// Appends a unit and updates the bookkeeping.
    pub fn push(&mut self, unit: ContentUnit) {
        self.total_weight += unit.weight;
        self.posts_count += unit.posts_count();
        self.comments_count += unit.comments_count();

        if self.date_from.as_ref().is_none_or(|d| unit.date > *d) {
            self.date_from = Some(unit.date.clone());
        }
        if self.date_to.as_ref().is_none_or(|d| unit.date < *d) {
            self.date_to = Some(unit.date.clone());
        }

        self.units.push(unit);
    }

    /// Returns `true` if the chunk holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Partitions an ordered unit list into chunks.
///
/// Empty input yields an empty list.
pub fn partition_units(
    units: Vec<ContentUnit>,
    items_per_chunk: usize,
    overflow_threshold: f64,
) -> Vec<Chunk> {
    let opts = ChunkOptions::new()
        .with_items_per_chunk(items_per_chunk)
        .with_overflow_threshold(overflow_threshold);
    let max_weight = opts.max_weight();
    let threshold = opts.threshold_weight();

    let mut chunks = Vec::new();
    let mut current = Chunk::new(0);

    for unit in units {
        let projected = (current.total_weight + unit.weight) as f64;
        if projected > max_weight && !current.is_empty() && current.total_weight as f64 >= threshold
        {
            let next = Chunk::new(current.index + 1);
            chunks.push(std::mem::replace(&mut current, next));
        }
        current.push(unit);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Builds and partitions the units of a channel.
///
/// An unknown channel yields an empty list.
pub fn calculate_chunks<R: PostRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    opts: &ChunkOptions,
) -> Vec<Chunk> {
    let units = build_content_units(repo, channel_id, opts.sort_order, opts.include_hidden);
    let chunks = partition_units(units, opts.items_per_chunk, opts.overflow_threshold);
    tracing::debug!(
        channel_id,
        chunks = chunks.len(),
        items_per_chunk = opts.items_per_chunk,
        "calculated chunks"
    );
    chunks
}

/// Returns a single chunk by index.
///
/// # Errors
///
/// [`PressError::ChannelNotFound`] for an unknown channel and
/// [`PressError::ChunkNotFound`] for an out-of-range index.
pub fn get_chunk<R: PostRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    index: usize,
    opts: &ChunkOptions,
) -> Result<Chunk> {
    if repo.find_channel(channel_id).is_none() {
        return Err(PressError::channel_not_found(channel_id));
    }

    let chunks = calculate_chunks(repo, channel_id, opts);
    let total = chunks.len();
    chunks
        .into_iter()
        .nth(index)
        .ok_or_else(|| PressError::chunk_not_found(index, total))
}

/// Flattens a chunk into its posts and comments, preserving unit order.
///
/// Albums expand to all their members.
pub fn get_chunk_posts_and_comments(chunk: &Chunk) -> (Vec<Post>, Vec<Post>) {
    let mut posts = Vec::with_capacity(chunk.posts_count);
    let mut comments = Vec::with_capacity(chunk.comments_count);

    for unit in &chunk.units {
        if unit.is_group {
            posts.extend(unit.group_posts.iter().cloned());
        } else {
            posts.push(unit.post.clone());
        }
        comments.extend(unit.comments.iter().cloned());
    }

    (posts, comments)
}

// ============================================================================
// Reports
// ============================================================================

/// Per-chunk figures without the unit payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub index: usize,
    pub posts_count: usize,
    pub comments_count: usize,
    pub total_weight: usize,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl From<&Chunk> for ChunkSummary {
    fn from(chunk: &Chunk) -> Self {
        Self {
            index: chunk.index,
            posts_count: chunk.posts_count,
            comments_count: chunk.comments_count,
            total_weight: chunk.total_weight,
            date_from: chunk.date_from.clone(),
            date_to: chunk.date_to.clone(),
        }
    }
}

/// Overview of a channel's pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkReport {
    pub channel_id: String,
    pub items_per_chunk: usize,
    pub overflow_threshold: f64,
    pub total_chunks: usize,
    pub total_posts: usize,
    pub total_comments: usize,
    pub chunks: Vec<ChunkSummary>,
}

impl ChunkReport {
    /// Summarizes `chunks` computed with `opts`.
    pub fn new(channel_id: impl Into<String>, opts: &ChunkOptions, chunks: &[Chunk]) -> Self {
        Self {
            channel_id: channel_id.into(),
            items_per_chunk: opts.items_per_chunk,
            overflow_threshold: opts.overflow_threshold,
            total_chunks: chunks.len(),
            total_posts: chunks.iter().map(|c| c.posts_count).sum(),
            total_comments: chunks.iter().map(|c| c.comments_count).sum(),
            chunks: chunks.iter().map(ChunkSummary::from).collect(),
        }
    }
}
