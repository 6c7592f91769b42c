//! Decide which posts are suppressed from pagination and export.
//!
//! A post is hidden when:
//!
//! | Rule | Function | Description |
//! |------|----------|-------------|
//! | Explicit hide | [`should_hide_post`] | An edit for the post carries `hidden: "true"` |
//! | Unsupported media | [`should_hide_media`] + no text | The only content is media that can't be placed |
//!
//! # Examples
//!
//! ```
//! use tgpress::core::filter::{should_hide_post, visible_posts};
//! use tgpress::{Edit, Post};
//!
//! let posts = vec![
//!     Post::new(1, "chan", "2025-01-01").with_message("Hello"),
//!     Post::new(2, "chan", "2025-01-02").with_message("Secret"),
//!     Post::new(3, "chan", "2025-01-03").with_media("chan/media/3.webp", "MessageMediaPhoto"),
//! ];
//! let edits = vec![Edit::hidden(2, "chan")];
//!
//! assert!(should_hide_post(&posts[1], &edits));
//! let visible = visible_posts(posts, &edits, false);
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].telegram_id, 1);
//! ```
//!
//! # Behavior Notes
//!
//! - The hide flag is string-typed: a JSON boolean `true` does **not** hide
//! - Unsupported media alone never hides a post that also has text

use crate::post::{Edit, Post};

/// Media classes that are never placed in print output.
pub const UNSUPPORTED_MEDIA_TYPES: &[&str] = &["MessageMediaWebPage"];

/// Media class whose placement depends on the MIME type.
pub const DOCUMENT_MEDIA_TYPE: &str = "MessageMediaDocument";

/// Returns `true` if the post's media can't be placed in a print layout.
///
/// Unsupported media is:
/// - a deny-listed media class (web page previews),
/// - a document whose MIME type is missing or not `image/*`,
/// - any file ending in `.webp`.
///
/// Posts without media return `false`.
pub fn should_hide_media(post: &Post) -> bool {
    let Some(url) = post.media_url.as_deref().filter(|u| !u.is_empty()) else {
        return false;
    };

    let media_type = post.media_type.as_deref().unwrap_or_default();
    if UNSUPPORTED_MEDIA_TYPES.contains(&media_type) {
        return true;
    }

    if media_type == DOCUMENT_MEDIA_TYPE
        && !post
            .mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    {
        return true;
    }

    url.to_ascii_lowercase().ends_with(".webp")
}

/// Returns `true` if the post must be left out entirely.
///
/// `edits` may contain edits for other posts; only those matching
/// `(telegram_id, channel_id)` are considered.
pub fn should_hide_post(post: &Post, edits: &[Edit]) -> bool {
    if edits.iter().any(|e| e.applies_to(post) && e.hides()) {
        return true;
    }

    should_hide_media(post) && post.has_no_text()
}

/// Keeps the posts that pass [`should_hide_post`].
///
/// With `include_hidden` set, the posts are returned unchanged.
pub fn visible_posts(posts: Vec<Post>, edits: &[Edit], include_hidden: bool) -> Vec<Post> {
    if include_hidden {
        return posts;
    }

    posts
        .into_iter()
        .filter(|post| !should_hide_post(post, edits))
        .collect()
}
