//! Archived channel records: posts, channels and user edits.
//!
//! These types mirror what the archive stores for a Telegram channel. The
//! pagination and export code only reads them.
//!
//! # Overview
//!
//! - [`Post`] - one channel post or one discussion-group comment, identified
//!   by `(channel_id, telegram_id)`
//! - [`Channel`] - the archived channel with its optional linked discussion
//!   group and print settings
//! - [`Edit`] - a per-post override record (`changes` may carry a hidden flag)
//!
//! # Examples
//!
//! ```
//! use tgpress::Post;
//!
//! let post = Post::new(42, "llamasass", "2025-01-15T10:30:00")
//!     .with_message("<p>Hello</p>")
//!     .with_group(900);
//!
//! assert_eq!(post.telegram_id, 42);
//! assert!(post.is_grouped());
//! assert!(!post.is_comment());
//! ```
//!
//! ## Serialization
//!
//! ```
//! use tgpress::Post;
//!
//! let post = Post::new(1, "chan", "2025-01-01");
//! let json = serde_json::to_string(&post)?;
//!
//! // optional fields are omitted
//! assert!(!json.contains("media_url"));
//! let parsed: Post = serde_json::from_str(&json)?;
//! assert_eq!(post, parsed);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::PrintSettings;

/// A post (or comment) as stored in the archive.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `telegram_id` | `i64` | Message id, unique per channel |
/// | `channel_id` | `String` | Owning channel (or discussion group) |
/// | `date` | `String` | Sortable date string (ISO-8601) |
/// | `message` | `Option<String>` | Text with limited inline markup |
/// | `media_url` | `Option<String>` | Path of the downloaded media, relative to the media root |
/// | `media_type` | `Option<String>` | Telegram media class, e.g. `MessageMediaPhoto` |
/// | `mime_type` | `Option<String>` | MIME type for document media |
/// | `grouped_id` | `Option<i64>` | Album key shared by grouped posts |
/// | `reply_to` | `Option<i64>` | Parent post id, set on comments |
/// | `author_*` | `Option<String>` | Comment author metadata |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Telegram message id.
    pub telegram_id: i64,

    /// Channel this post belongs to.
    pub channel_id: String,

    /// Publication date as a sortable string.
    pub date: String,

    /// Message text, possibly containing `<p>`, `<b>`, `<i>`, `<del>`, `<br>` markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Media file path relative to the media root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    /// Telegram media class name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// MIME type of document media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Album key. Posts sharing it are rendered as one gallery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped_id: Option<i64>,

    /// Id of the channel post this comment replies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<i64>,

    /// Display name of the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    /// Avatar image path relative to the media root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,

    /// Profile link of the author (`https://t.me/...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,
}

impl Post {
    /// Creates a post with only its identity and date set.
    pub fn new(telegram_id: i64, channel_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            telegram_id,
            channel_id: channel_id.into(),
            date: date.into(),
            message: None,
            media_url: None,
            media_type: None,
            mime_type: None,
            grouped_id: None,
            reply_to: None,
            author_name: None,
            author_avatar: None,
            author_link: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the message text.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Builder method to attach media.
    ///
    /// ```rust
    /// use tgpress::Post;
    ///
    /// let post = Post::new(1, "chan", "2025-01-01")
    ///     .with_media("chan/media/1.jpg", "MessageMediaPhoto");
    /// assert!(post.has_media());
    /// ```
    #[must_use]
    pub fn with_media(mut self, url: impl Into<String>, media_type: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self.media_type = Some(media_type.into());
        self
    }

    /// Builder method to set the MIME type of document media.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Builder method to place the post in an album.
    #[must_use]
    pub fn with_group(mut self, grouped_id: i64) -> Self {
        self.grouped_id = Some(grouped_id);
        self
    }

    /// Builder method to mark the post as a comment on `parent_id`.
    #[must_use]
    pub fn with_reply_to(mut self, parent_id: i64) -> Self {
        self.reply_to = Some(parent_id);
        self
    }

    /// Builder method to set author metadata.
    #[must_use]
    pub fn with_author(
        mut self,
        name: impl Into<String>,
        avatar: Option<String>,
        link: Option<String>,
    ) -> Self {
        self.author_name = Some(name.into());
        self.author_avatar = avatar;
        self.author_link = link;
        self
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns `true` if the post belongs to an album.
    pub fn is_grouped(&self) -> bool {
        self.grouped_id.is_some()
    }

    /// Returns `true` if the post is a comment (replies to a channel post).
    pub fn is_comment(&self) -> bool {
        self.reply_to.is_some()
    }

    /// Returns `true` if the post carries a media file.
    pub fn has_media(&self) -> bool {
        self.media_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Returns `true` if the message is absent or whitespace-only.
    pub fn has_no_text(&self) -> bool {
        self.message.as_deref().is_none_or(|m| m.trim().is_empty())
    }
}

/// An archived channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel identifier (the public username for public channels).
    pub id: String,

    /// Human readable title.
    #[serde(default)]
    pub name: String,

    /// Numeric Telegram id, used to match `t.me/c/<id>` links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_id: Option<i64>,

    /// Channel id of the linked discussion group holding the comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_group_id: Option<String>,

    /// Per-channel print overrides. Missing fields fall back to defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_settings: Option<PrintSettings>,
}

impl Channel {
    /// Creates a channel with no discussion group and default settings.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            numeric_id: None,
            discussion_group_id: None,
            print_settings: None,
        }
    }

    /// Builder method to link a discussion group.
    #[must_use]
    pub fn with_discussion_group(mut self, group_id: impl Into<String>) -> Self {
        self.discussion_group_id = Some(group_id.into());
        self
    }

    /// Builder method to set the numeric Telegram id.
    #[must_use]
    pub fn with_numeric_id(mut self, numeric_id: i64) -> Self {
        self.numeric_id = Some(numeric_id);
        self
    }

    /// Builder method to set print overrides.
    #[must_use]
    pub fn with_print_settings(mut self, settings: PrintSettings) -> Self {
        self.print_settings = Some(settings);
        self
    }

    /// Returns the linked discussion group id, treating an empty string as unset.
    pub fn discussion_id(&self) -> Option<&str> {
        self.discussion_group_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Returns the effective print settings (overrides or defaults).
    pub fn effective_print_settings(&self) -> PrintSettings {
        self.print_settings.clone().unwrap_or_default()
    }
}

/// A per-post override record.
///
/// `changes` is a free-form map; the only key the core interprets is
/// `hidden`, and only the string value `"true"` hides a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    /// Edited post id.
    pub telegram_id: i64,

    /// Channel of the edited post.
    pub channel_id: String,

    /// Overridden fields.
    #[serde(default)]
    pub changes: Map<String, Value>,
}

impl Edit {
    /// Creates an edit with no changes.
    pub fn new(telegram_id: i64, channel_id: impl Into<String>) -> Self {
        Self {
            telegram_id,
            channel_id: channel_id.into(),
            changes: Map::new(),
        }
    }

    /// Creates an edit that hides the post.
    pub fn hidden(telegram_id: i64, channel_id: impl Into<String>) -> Self {
        Self::new(telegram_id, channel_id).with_change("hidden", Value::from("true"))
    }

    /// Builder method to add one changed field.
    #[must_use]
    pub fn with_change(mut self, key: impl Into<String>, value: Value) -> Self {
        self.changes.insert(key.into(), value);
        self
    }

    /// Returns `true` if this edit targets the given post.
    pub fn applies_to(&self, post: &Post) -> bool {
        self.telegram_id == post.telegram_id && self.channel_id == post.channel_id
    }

    /// Returns `true` if the edit carries the `hidden: "true"` sentinel.
    pub fn hides(&self) -> bool {
        matches!(self.changes.get("hidden"), Some(Value::String(s)) if s == "true")
    }
}
