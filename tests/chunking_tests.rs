//! Pagination scenarios against an in-memory archive.

use tgpress::core::{
    ChunkOptions, SortOrder, build_content_units, calculate_chunks, get_chunk,
    get_chunk_posts_and_comments,
};
use tgpress::repository::InMemoryRepository;
use tgpress::{Channel, Edit, Post, PressError};

const CHANNEL: &str = "llamasass";
const CHAT: &str = "llamasass_chat";

fn channel() -> Channel {
    Channel::new(CHANNEL, "Llamas").with_discussion_group(CHAT)
}

fn date(day: u32) -> String {
    format!("2025-01-{day:02}T10:00:00")
}

fn comments(parent: i64, count: usize, first_id: i64) -> Vec<Post> {
    (0..count)
        .map(|i| {
            Post::new(first_id + i as i64, CHAT, date(28))
                .with_message("comment")
                .with_reply_to(parent)
        })
        .collect()
}

fn posts_per_chunk(repo: &InMemoryRepository, opts: &ChunkOptions) -> Vec<usize> {
    calculate_chunks(repo, CHANNEL, opts)
        .iter()
        .map(|c| c.posts_count)
        .collect()
}

#[test]
fn test_ten_posts_three_per_chunk() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_posts((1..=10).map(|i| Post::new(i, CHANNEL, date(i as u32)).with_message("x")));

    let opts = ChunkOptions::new().with_items_per_chunk(3);
    assert_eq!(posts_per_chunk(&repo, &opts), vec![3, 3, 3, 1]);
}

#[test]
fn test_post_with_twenty_comments_is_one_chunk() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_post(Post::new(1, CHANNEL, date(1)).with_message("hot take"))
        .with_posts(comments(1, 20, 100));

    let chunks = calculate_chunks(&repo, CHANNEL, &ChunkOptions::new().with_items_per_chunk(5));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].total_weight, 21);
    assert_eq!(chunks[0].posts_count, 1);
    assert_eq!(chunks[0].comments_count, 20);
}

#[test]
fn test_heavy_older_post_closes_its_own_chunk() {
    // A: weight 1, newer. B: weight 6, older.
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_post(Post::new(1, CHANNEL, date(2)).with_message("A"))
        .with_post(Post::new(2, CHANNEL, date(1)).with_message("B"))
        .with_posts(comments(2, 5, 100));

    let opts = ChunkOptions::new()
        .with_items_per_chunk(5)
        .with_overflow_threshold(0.2)
        .with_sort_order(SortOrder::Asc);
    let chunks = calculate_chunks(&repo, CHANNEL, &opts);

    let weights: Vec<_> = chunks.iter().map(|c| c.total_weight).collect();
    assert_eq!(weights, vec![6, 1]);
    assert_eq!(chunks[0].units[0].post.telegram_id, 2);
    assert_eq!(chunks[1].units[0].post.telegram_id, 1);
}

#[test]
fn test_oversized_units_get_a_chunk_each() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_post(Post::new(1, CHANNEL, date(1)).with_message("one"))
        .with_post(Post::new(2, CHANNEL, date(2)).with_message("two"))
        .with_posts(comments(1, 150, 1000))
        .with_posts(comments(2, 120, 2000));

    let chunks = calculate_chunks(&repo, CHANNEL, &ChunkOptions::new().with_items_per_chunk(50));
    assert_eq!(chunks.len(), 2);

    let mut weights: Vec<_> = chunks.iter().map(|c| c.total_weight).collect();
    weights.sort_unstable();
    assert_eq!(weights, vec![121, 151]);
}

#[test]
fn test_empty_channel_has_no_chunks() {
    let repo = InMemoryRepository::new().with_channel(channel());
    assert!(calculate_chunks(&repo, CHANNEL, &ChunkOptions::new()).is_empty());
}

#[test]
fn test_unknown_channel_has_no_chunks() {
    let repo = InMemoryRepository::new();
    assert!(calculate_chunks(&repo, "nobody", &ChunkOptions::new()).is_empty());
}

#[test]
fn test_album_of_four_is_one_group_unit() {
    let repo = InMemoryRepository::new().with_channel(channel()).with_posts((1..=4).map(|i| {
        Post::new(i, CHANNEL, date(1))
            .with_media(format!("{CHANNEL}/media/{i}.jpg"), "MessageMediaPhoto")
            .with_group(77)
    }));

    let units = build_content_units(&repo, CHANNEL, SortOrder::Desc, false);
    assert_eq!(units.len(), 1);
    assert!(units[0].is_group);
    assert_eq!(units[0].weight, 4);
    assert_eq!(units[0].post.telegram_id, 1);
}

#[test]
fn test_hidden_sentinel_must_be_string_true() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_post(Post::new(1, CHANNEL, date(1)).with_message("hidden"))
        .with_post(Post::new(2, CHANNEL, date(2)).with_message("bool flag"))
        .with_edit(Edit::hidden(1, CHANNEL))
        .with_edit(Edit::new(2, CHANNEL).with_change("hidden", serde_json::Value::Bool(true)));

    let units = build_content_units(&repo, CHANNEL, SortOrder::Desc, false);
    let ids: Vec<_> = units.iter().map(|u| u.post.telegram_id).collect();
    assert_eq!(ids, vec![2]);

    let all = build_content_units(&repo, CHANNEL, SortOrder::Desc, true);
    assert_eq!(all.len(), 2);
}

#[test]
fn test_unsupported_media_without_text_is_hidden() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_post(Post::new(1, CHANNEL, date(1)).with_media("a/1.webp", "MessageMediaPhoto"))
        .with_post(
            Post::new(2, CHANNEL, date(2))
                .with_media("a/2.mp4", "MessageMediaDocument")
                .with_mime_type("video/mp4"),
        )
        .with_post(
            Post::new(3, CHANNEL, date(3))
                .with_message("preview with text")
                .with_media("a/3.html", "MessageMediaWebPage"),
        );

    let units = build_content_units(&repo, CHANNEL, SortOrder::Asc, false);
    let ids: Vec<_> = units.iter().map(|u| u.post.telegram_id).collect();
    assert_eq!(ids, vec![3]);
}

#[test]
fn test_no_discussion_group_means_no_comments() {
    let repo = InMemoryRepository::new()
        .with_channel(Channel::new(CHANNEL, "Llamas"))
        .with_post(Post::new(1, CHANNEL, date(1)).with_message("x"))
        .with_posts(comments(1, 3, 100));

    let units = build_content_units(&repo, CHANNEL, SortOrder::Desc, false);
    assert_eq!(units[0].comments.len(), 0);
    assert_eq!(units[0].weight, 1);
}

#[test]
fn test_equal_dates_break_ties_by_telegram_id() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_post(Post::new(5, CHANNEL, date(1)).with_message("x"))
        .with_post(Post::new(3, CHANNEL, date(1)).with_message("y"))
        .with_post(Post::new(4, CHANNEL, date(1)).with_message("z"));

    let asc: Vec<_> = build_content_units(&repo, CHANNEL, SortOrder::Asc, false)
        .iter()
        .map(|u| u.post.telegram_id)
        .collect();
    let desc: Vec<_> = build_content_units(&repo, CHANNEL, SortOrder::Desc, false)
        .iter()
        .map(|u| u.post.telegram_id)
        .collect();
    assert_eq!(asc, vec![3, 4, 5]);
    assert_eq!(desc, vec![5, 4, 3]);
}

#[test]
fn test_get_chunk_out_of_range() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_post(Post::new(1, CHANNEL, date(1)).with_message("x"));

    let opts = ChunkOptions::new();
    assert!(get_chunk(&repo, CHANNEL, 0, &opts).is_ok());

    let err = get_chunk(&repo, CHANNEL, 3, &opts).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, PressError::ChunkNotFound { index: 3, total: 1 }));
}

#[test]
fn test_chunk_posts_and_comments_flatten_in_unit_order() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_posts((1..=3).map(|i| Post::new(i, CHANNEL, date(1)).with_group(9)))
        .with_post(Post::new(4, CHANNEL, date(2)).with_message("single"))
        .with_posts(comments(1, 2, 100))
        .with_posts(comments(4, 1, 200));

    let opts = ChunkOptions::new().with_sort_order(SortOrder::Asc);
    let chunk = get_chunk(&repo, CHANNEL, 0, &opts).unwrap();
    let (posts, comments) = get_chunk_posts_and_comments(&chunk);

    let post_ids: Vec<_> = posts.iter().map(|p| p.telegram_id).collect();
    let comment_ids: Vec<_> = comments.iter().map(|p| p.telegram_id).collect();
    assert_eq!(post_ids, vec![1, 2, 3, 4]);
    assert_eq!(comment_ids, vec![100, 101, 200]);
}

#[test]
fn test_chunk_date_range_ignores_sort_direction() {
    let repo = InMemoryRepository::new()
        .with_channel(channel())
        .with_posts((1..=3).map(|i| Post::new(i, CHANNEL, date(i as u32)).with_message("x")));

    for order in [SortOrder::Asc, SortOrder::Desc] {
        let chunks = calculate_chunks(&repo, CHANNEL, &ChunkOptions::new().with_sort_order(order));
        assert_eq!(chunks[0].date_from.as_deref(), Some(date(3).as_str()));
        assert_eq!(chunks[0].date_to.as_deref(), Some(date(1).as_str()));
    }
}

#[test]
fn test_archive_json_roundtrip_through_repository() {
    let json = format!(
        r#"{{
            "channels": [{{"id": "{CHANNEL}", "name": "Llamas", "discussion_group_id": "{CHAT}"}}],
            "posts": [
                {{"telegram_id": 1, "channel_id": "{CHANNEL}", "date": "2025-01-01T10:00:00", "message": "hi"}},
                {{"telegram_id": 9, "channel_id": "{CHAT}", "date": "2025-01-01T11:00:00", "reply_to": 1}}
            ],
            "edits": []
        }}"#
    );
    let repo = InMemoryRepository::from_json_str(&json).unwrap();

    let chunks = calculate_chunks(&repo, CHANNEL, &ChunkOptions::new());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].total_weight, 2);
}
