//! Read-only access to archived channels, posts and edits.
//!
//! The pagination and export code never talks to a database directly: it
//! depends on the [`PostRepository`] trait. [`InMemoryRepository`] is the
//! bundled implementation, built programmatically or loaded from a JSON
//! archive of the form:
//!
//! ```json
//! {
//!   "channels": [{"id": "llamasass", "name": "Llamas", "discussion_group_id": "llamasass_chat"}],
//!   "posts":    [{"telegram_id": 1, "channel_id": "llamasass", "date": "2025-01-01T10:00:00"}],
//!   "edits":    [{"telegram_id": 1, "channel_id": "llamasass", "changes": {"hidden": "true"}}]
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use tgpress::repository::{InMemoryRepository, PostRepository};
//! use tgpress::{Channel, Post};
//!
//! let repo = InMemoryRepository::new()
//!     .with_channel(Channel::new("chan", "Channel"))
//!     .with_post(Post::new(1, "chan", "2025-01-01"));
//!
//! assert_eq!(repo.find_by_channel("chan").len(), 1);
//! assert!(repo.find_channel("missing").is_none());
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::post::{Channel, Edit, Post};

/// The data boundary of the core.
///
/// Every method is a synchronous, read-only query. Implementations return
/// posts in a stable order (the order they were stored in).
pub trait PostRepository {
    /// Looks up a channel by id.
    fn find_channel(&self, channel_id: &str) -> Option<Channel>;

    /// Returns all posts of a channel.
    fn find_by_channel(&self, channel_id: &str) -> Vec<Post>;

    /// Returns all posts of a channel sharing `grouped_id`.
    fn find_by_group(&self, channel_id: &str, grouped_id: i64) -> Vec<Post>;

    /// Returns the comments replying to `parent_id` in the discussion group.
    fn find_comments_for(&self, parent_id: i64, discussion_channel_id: &str) -> Vec<Post>;

    /// Looks up a single post.
    fn find_post(&self, channel_id: &str, telegram_id: i64) -> Option<Post>;

    /// Returns all edits recorded for a channel.
    fn edits_for_channel(&self, channel_id: &str) -> Vec<Edit>;
}

/// Serialized archive layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Archive {
    /// Archived channels
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Posts of all channels and discussion groups
    #[serde(default)]
    pub posts: Vec<Post>,
    /// User edits
    #[serde(default)]
    pub edits: Vec<Edit>,
}

/// A [`PostRepository`] holding everything in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    channels: HashMap<String, Channel>,
    posts: HashMap<String, Vec<Post>>,
    edits: HashMap<String, Vec<Edit>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from a deserialized archive.
    pub fn from_archive(archive: Archive) -> Self {
        let mut repo = Self::new();
        for channel in archive.channels {
            repo.insert_channel(channel);
        }
        for post in archive.posts {
            repo.insert_post(post);
        }
        for edit in archive.edits {
            repo.upsert_edit(edit);
        }
        repo
    }

    /// Parses a JSON archive.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let archive: Archive = serde_json::from_str(json)?;
        Ok(Self::from_archive(archive))
    }

    /// Loads a JSON archive from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Builder method to add a channel.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.insert_channel(channel);
        self
    }

    /// Builder method to add a post.
    #[must_use]
    pub fn with_post(mut self, post: Post) -> Self {
        self.insert_post(post);
        self
    }

    /// Builder method to add many posts.
    #[must_use]
    pub fn with_posts(mut self, posts: impl IntoIterator<Item = Post>) -> Self {
        for post in posts {
            self.insert_post(post);
        }
        self
    }

    /// Builder method to add an edit.
    #[must_use]
    pub fn with_edit(mut self, edit: Edit) -> Self {
        self.upsert_edit(edit);
        self
    }

    /// Adds or replaces a channel.
    pub fn insert_channel(&mut self, channel: Channel) {
        self.channels.insert(channel.id.clone(), channel);
    }

    /// Adds a post, replacing an existing post with the same identity.
    pub fn insert_post(&mut self, post: Post) {
        let posts = self.posts.entry(post.channel_id.clone()).or_default();
        match posts.iter_mut().find(|p| p.telegram_id == post.telegram_id) {
            Some(existing) => *existing = post,
            None => posts.push(post),
        }
    }

    /// Creates or updates the edit of a post.
    ///
    /// A post has at most one current edit; new changes are merged into it.
    pub fn upsert_edit(&mut self, edit: Edit) {
        let edits = self.edits.entry(edit.channel_id.clone()).or_default();
        match edits
            .iter_mut()
            .find(|e| e.telegram_id == edit.telegram_id)
        {
            Some(existing) => existing.changes.extend(edit.changes),
            None => edits.push(edit),
        }
    }

    /// Total number of posts across all channels.
    pub fn post_count(&self) -> usize {
        self.posts.values().map(Vec::len).sum()
    }
}

impl PostRepository for InMemoryRepository {
    fn find_channel(&self, channel_id: &str) -> Option<Channel> {
        self.channels.get(channel_id).cloned()
    }

    fn find_by_channel(&self, channel_id: &str) -> Vec<Post> {
        self.posts.get(channel_id).cloned().unwrap_or_default()
    }

    fn find_by_group(&self, channel_id: &str, grouped_id: i64) -> Vec<Post> {
        self.posts
            .get(channel_id)
            .map(|posts| {
                posts
                    .iter()
                    .filter(|p| p.grouped_id == Some(grouped_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_comments_for(&self, parent_id: i64, discussion_channel_id: &str) -> Vec<Post> {
        self.posts
            .get(discussion_channel_id)
            .map(|posts| {
                posts
                    .iter()
                    .filter(|p| p.reply_to == Some(parent_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_post(&self, channel_id: &str, telegram_id: i64) -> Option<Post> {
        self.posts
            .get(channel_id)?
            .iter()
            .find(|p| p.telegram_id == telegram_id)
            .cloned()
    }

    fn edits_for_channel(&self, channel_id: &str) -> Vec<Edit> {
        self.edits.get(channel_id).cloned().unwrap_or_default()
    }
}
