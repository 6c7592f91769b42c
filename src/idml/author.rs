//! Whether a comment needs an author header.
//!
//! Comments written by the channel itself (or by its discussion group) are
//! printed without one. Everybody else gets an avatar and a name.

use crate::post::{Channel, Post};

/// Prefix Telegram adds to supergroup and channel ids in the Bot API.
const CHANNEL_ID_PREFIX: &str = "-100";

/// Lowercases, unifies the scheme and drops a trailing slash.
fn normalize_link(link: &str) -> String {
    let link = link.trim().trim_end_matches('/').to_lowercase();
    match link.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => link,
    }
}

fn strip_channel_prefix(id: &str) -> &str {
    id.strip_prefix(CHANNEL_ID_PREFIX).unwrap_or(id)
}

fn is_numeric(id: &str) -> bool {
    let digits = id.strip_prefix('-').unwrap_or(id);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Links under which the channel itself can appear as an author.
fn own_links(channel: &Channel) -> Vec<String> {
    let mut links = vec![normalize_link(&format!("https://t.me/{}", channel.id))];

    let numeric = channel
        .numeric_id
        .map(|id| id.to_string())
        .or_else(|| is_numeric(&channel.id).then(|| channel.id.clone()));
    if let Some(id) = numeric {
        links.push(normalize_link(&format!(
            "https://t.me/c/{}",
            strip_channel_prefix(&id)
        )));
    }

    if let Some(group) = channel.discussion_id() {
        let group = strip_channel_prefix(group);
        links.push(normalize_link(&format!("https://t.me/c/{group}")));
        links.push(normalize_link(&format!("https://t.me/{group}")));
    }

    links
}

/// Returns `true` if the comment's author is neither the channel nor its
/// discussion group.
///
/// With a profile link, the link decides. Without one, a non-empty author
/// name marks a third party.
///
/// ```
/// use tgpress::idml::author::is_third_party_author;
/// use tgpress::{Channel, Post};
///
/// let channel = Channel::new("llamasass", "Llamas");
/// let own = Post::new(1, "chat", "d")
///     .with_author("Llamas", None, Some("http://T.me/llamasass/".into()));
/// let other = Post::new(2, "chat", "d")
///     .with_author("Bob", None, Some("https://t.me/bob".into()));
///
/// assert!(!is_third_party_author(&own, &channel));
/// assert!(is_third_party_author(&other, &channel));
/// ```
pub fn is_third_party_author(post: &Post, channel: &Channel) -> bool {
    match post.author_link.as_deref().filter(|l| !l.trim().is_empty()) {
        Some(link) => {
            let link = normalize_link(link);
            !own_links(channel).contains(&link)
        }
        None => post
            .author_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(link: Option<&str>, name: Option<&str>) -> Post {
        let mut post = Post::new(1, "chat", "d").with_reply_to(10);
        post.author_link = link.map(String::from);
        post.author_name = name.map(String::from);
        post
    }

    #[test]
    fn test_username_link_is_own() {
        let ch = Channel::new("LlamaSass", "L");
        assert!(!is_third_party_author(
            &comment(Some("https://t.me/llamasass"), Some("L")),
            &ch
        ));
    }

    #[test]
    fn test_numeric_link_is_own() {
        let ch = Channel::new("llamasass", "L").with_numeric_id(-1001234567);
        assert!(!is_third_party_author(
            &comment(Some("https://t.me/c/1234567"), None),
            &ch
        ));

        let ch = Channel::new("1234567", "L");
        assert!(!is_third_party_author(
            &comment(Some("https://t.me/c/1234567/"), None),
            &ch
        ));
    }

    #[test]
    fn test_discussion_group_link_is_own() {
        let ch = Channel::new("llamasass", "L").with_discussion_group("-100777");
        assert!(!is_third_party_author(
            &comment(Some("https://t.me/c/777"), None),
            &ch
        ));

        let ch = Channel::new("llamasass", "L").with_discussion_group("llamasass_chat");
        assert!(!is_third_party_author(
            &comment(Some("https://t.me/llamasass_chat"), None),
            &ch
        ));
    }

    #[test]
    fn test_foreign_link_is_third_party() {
        let ch = Channel::new("llamasass", "L").with_discussion_group("llamasass_chat");
        assert!(is_third_party_author(
            &comment(Some("https://t.me/alpaca"), Some("A")),
            &ch
        ));
        assert!(is_third_party_author(
            &comment(Some("https://t.me/user?id=5"), None),
            &ch
        ));
    }

    #[test]
    fn test_no_link_uses_name() {
        let ch = Channel::new("llamasass", "L");
        assert!(is_third_party_author(&comment(None, Some("Bob")), &ch));
        assert!(!is_third_party_author(&comment(None, Some("  ")), &ch));
        assert!(!is_third_party_author(&comment(None, None), &ch));
        assert!(is_third_party_author(&comment(Some(" "), Some("Bob")), &ch));
    }
}
