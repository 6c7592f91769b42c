//! Grouping of channel posts into atomic content units.
//!
//! A [`ContentUnit`] is either a single post or an album (posts sharing a
//! `grouped_id`), together with the one-level comments replying to it. Units
//! are never split across chunks.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::filter::visible_posts;
use crate::post::Post;
use crate::repository::PostRepository;

/// Ordering of units by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Infallible;

    /// Only `"desc"` (case-insensitive) selects descending order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Ok(SortOrder::Asc)
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An indivisible block of content: a post or album plus its comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentUnit {
    /// The single post, or the album member with the lowest id
    pub post: Post,

    /// All album members in ascending id order (empty for single posts)
    pub group_posts: Vec<Post>,

    /// Comments replying to the representative post
    pub comments: Vec<Post>,

    /// `max(1, group_posts.len()) + comments.len()`
    pub weight: usize,

    /// `true` for albums
    pub is_group: bool,

    /// Date of the representative post
    pub date: String,
}

impl ContentUnit {
    /// Creates a unit for a single post.
    pub fn single(post: Post, comments: Vec<Post>) -> Self {
        Self::assemble(post, Vec::new(), comments)
    }

    /// Creates a unit for an album.
    ///
    /// Members are sorted by `telegram_id`; the first one becomes the
    /// representative. Returns `None` for an empty member list.
    pub fn group(mut members: Vec<Post>, comments: Vec<Post>) -> Option<Self> {
        members.sort_by_key(|p| p.telegram_id);
        let post = members.first()?.clone();
        Some(Self::assemble(post, members, comments))
    }

    fn assemble(post: Post, group_posts: Vec<Post>, comments: Vec<Post>) -> Self {
        let is_group = !group_posts.is_empty();
        let weight = group_posts.len().max(1) + comments.len();
        let date = post.date.clone();
        Self {
            post,
            group_posts,
            comments,
            weight,
            is_group,
            date,
        }
    }

    /// Post-equivalents in this unit (album size, or 1).
    pub fn posts_count(&self) -> usize {
        if self.is_group {
            self.group_posts.len()
        } else {
            1
        }
    }

    /// Number of attached comments.
    pub fn comments_count(&self) -> usize {
        self.comments.len()
    }

    /// Ascending ordering key: date, then representative id.
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.post.telegram_id.cmp(&other.post.telegram_id))
    }
}

/// Builds the ordered content units of a channel.
///
/// Returns an empty list when the channel doesn't exist. Hidden posts are
/// dropped unless `include_hidden` is set. Comments are looked up in the
/// channel's linked discussion group; without one, every unit has none.
///
/// Units are ordered by `(date, representative telegram_id)`, and the whole
/// key is reversed for [`SortOrder::Desc`].
pub fn build_content_units<R: PostRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    sort_order: SortOrder,
    include_hidden: bool,
) -> Vec<ContentUnit> {
    let Some(channel) = repo.find_channel(channel_id) else {
        tracing::debug!(channel_id, "channel not found, no units");
        return Vec::new();
    };

    let edits = repo.edits_for_channel(channel_id);
    let posts = visible_posts(repo.find_by_channel(channel_id), &edits, include_hidden);

    let mut groups: HashMap<i64, Vec<Post>> = HashMap::new();
    let mut singles = Vec::new();
    for post in posts {
        match post.grouped_id {
            Some(grouped_id) => groups.entry(grouped_id).or_default().push(post),
            None => singles.push(post),
        }
    }

    let discussion_id = channel.discussion_id();
    let comments_for = |post: &Post| -> Vec<Post> {
        discussion_id
            .map(|group| repo.find_comments_for(post.telegram_id, group))
            .unwrap_or_default()
    };

    let mut units: Vec<ContentUnit> = Vec::with_capacity(singles.len() + groups.len());
    for members in groups.into_values() {
        let Some(first) = members.iter().min_by_key(|p| p.telegram_id) else {
            continue;
        };
        let comments = comments_for(first);
        units.extend(ContentUnit::group(members, comments));
    }
    for post in singles {
        let comments = comments_for(&post);
        units.push(ContentUnit::single(post, comments));
    }

    match sort_order {
        SortOrder::Asc => units.sort_by(ContentUnit::cmp_key),
        SortOrder::Desc => units.sort_by(|a, b| b.cmp_key(a)),
    }

    tracing::debug!(
        channel_id,
        units = units.len(),
        order = %sort_order,
        "built content units"
    );
    units
}
