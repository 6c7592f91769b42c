//! End-to-end CLI tests for tgpress.
//!
//! These tests run the actual binary against archives written to a temp
//! directory and check its output.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Ten posts, one of them with three comments, plus a small frozen layout.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut posts = Vec::new();
    for id in 1..=10 {
        posts.push(format!(
            r#"{{"telegram_id": {id}, "channel_id": "llamasass", "date": "2025-01-{id:02}T10:00:00", "message": "Post {id}"}}"#
        ));
    }
    for id in 100..103 {
        posts.push(format!(
            r#"{{"telegram_id": {id}, "channel_id": "llamasass_chat", "date": "2025-01-20T10:00:00", "message": "Comment", "reply_to": 1}}"#
        ));
    }
    let archive = format!(
        r#"{{
  "channels": [{{"id": "llamasass", "name": "Llamas", "discussion_group_id": "llamasass_chat"}}],
  "posts": [{}],
  "edits": [{{"telegram_id": 10, "channel_id": "llamasass", "changes": {{"hidden": "true"}}}}]
}}"#,
        posts.join(",\n    ")
    );
    fs::write(dir.path().join("archive.json"), archive).unwrap();

    let layout = r#"{"pages": [
  {"page_number": 1, "posts": [
    {"telegram_id": 1, "channel_id": "llamasass", "bounds": {"top": 0, "left": 20, "width": 170, "height": 40}},
    {"telegram_id": 100, "channel_id": "llamasass_chat", "bounds": {"top": 45, "left": 20, "width": 170, "height": 20}}
  ]},
  {"page_number": 2, "posts": [
    {"telegram_id": 2, "channel_id": "llamasass", "bounds": {"top": 0, "left": 20, "width": 170, "height": 40}}
  ]}
]}"#;
    fs::write(dir.path().join("layout.json"), layout).unwrap();

    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    dir
}

fn tgpress_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_tgpress"));
    Command::from_std(cmd)
}

fn path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn archive_arg(dir: &TempDir) -> String {
    path(dir, "archive.json").to_string_lossy().into_owned()
}

// ============================================================================
// chunks
// ============================================================================

mod chunks {
    use super::*;

    #[test]
    fn test_json_report_on_stdout() {
        let fixtures = setup_fixtures();

        let output = tgpress_cmd()
            .args(["chunks", &archive_arg(&fixtures), "llamasass", "--items-per-chunk", "4"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Chunks:"))
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["channel_id"], "llamasass");
        // post 10 is hidden
        assert_eq!(report["total_posts"], 9);
        assert_eq!(report["total_comments"], 3);
        assert_eq!(report["items_per_chunk"], 4);
    }

    #[test]
    fn test_include_hidden_flag() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args(["chunks", &archive_arg(&fixtures), "llamasass", "--include-hidden"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"total_posts\": 10"));
    }

    #[test]
    fn test_csv_report_to_file() {
        let fixtures = setup_fixtures();
        let output = path(&fixtures, "chunks.csv");

        tgpress_cmd()
            .args([
                "chunks",
                &archive_arg(&fixtures),
                "llamasass",
                "-f",
                "csv",
                "-o",
                output.to_str().unwrap(),
                "--items-per-chunk",
                "3",
            ])
            .assert()
            .success()
            .stderr(predicate::str::contains("Saved to"));

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("Index;Posts;Comments;Weight;DateFrom;DateTo"));
        assert!(content.lines().count() > 2);
    }

    #[test]
    fn test_jsonl_one_line_per_chunk() {
        let fixtures = setup_fixtures();

        let output = tgpress_cmd()
            .args([
                "chunks",
                &archive_arg(&fixtures),
                "llamasass",
                "-f",
                "jsonl",
                "--items-per-chunk",
                "2",
                "--overflow",
                "0",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let text = String::from_utf8(output).unwrap();
        for line in text.lines() {
            let chunk: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(chunk["total_weight"].as_u64().unwrap() >= 1);
        }
        assert!(text.lines().count() >= 4);
    }

    #[test]
    fn test_sort_asc_puts_oldest_first() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args([
                "chunks",
                &archive_arg(&fixtures),
                "llamasass",
                "--sort",
                "asc",
                "-f",
                "jsonl",
                "--items-per-chunk",
                "1",
                "--overflow",
                "0",
            ])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(r#"{"index":0"#))
            .stdout(predicate::str::contains("2025-01-01T10:00:00"));
    }
}

// ============================================================================
// chunk-posts
// ============================================================================

mod chunk_posts {
    use super::*;

    #[test]
    fn test_first_chunk_posts_and_comments() {
        let fixtures = setup_fixtures();

        let output = tgpress_cmd()
            .args(["chunk-posts", &archive_arg(&fixtures), "llamasass", "0", "--sort", "asc"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let body: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(body["chunk_index"], 0);
        assert_eq!(body["posts"][0]["telegram_id"], 1);
        assert_eq!(body["comments"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_index_out_of_range() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args(["chunk-posts", &archive_arg(&fixtures), "llamasass", "99"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("not found"));
    }
}

// ============================================================================
// export-idml
// ============================================================================

mod export_idml {
    use super::*;

    #[test]
    fn test_writes_package() {
        let fixtures = setup_fixtures();
        let output = path(&fixtures, "out/llamasass.idml");

        tgpress_cmd()
            .args([
                "export-idml",
                &archive_arg(&fixtures),
                "llamasass",
                path(&fixtures, "layout.json").to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "--media-root",
                fixtures.path().to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Done"))
            .stdout(predicate::str::contains("2 pages, 3 posts"));

        let file = fs::File::open(&output).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");
        assert!(archive.by_name("designmap.xml").is_ok());
    }

    #[test]
    fn test_invalid_layout() {
        let fixtures = setup_fixtures();
        let layout = path(&fixtures, "dup.json");
        fs::write(
            &layout,
            r#"{"pages": [{"page_number": 1, "posts": []}, {"page_number": 1, "posts": []}]}"#,
        )
        .unwrap();

        tgpress_cmd()
            .args([
                "export-idml",
                &archive_arg(&fixtures),
                "llamasass",
                layout.to_str().unwrap(),
                "-o",
                path(&fixtures, "x.idml").to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("more than once"));
    }

    #[test]
    fn test_output_is_required() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args([
                "export-idml",
                &archive_arg(&fixtures),
                "llamasass",
                path(&fixtures, "layout.json").to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--output"));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_unknown_channel() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args(["chunks", &archive_arg(&fixtures), "nobody"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"))
            .stderr(predicate::str::contains("nobody"));
    }

    #[test]
    fn test_nonexistent_archive() {
        tgpress_cmd()
            .args(["chunks", "/nonexistent/archive.json", "llamasass"])
            .assert()
            .failure();
    }

    #[test]
    fn test_invalid_json() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args(["chunks", path(&fixtures, "broken.json").to_str().unwrap(), "llamasass"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_invalid_format_option() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args(["chunks", &archive_arg(&fixtures), "llamasass", "-f", "xml"])
            .assert()
            .failure();
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let fixtures = setup_fixtures();

        tgpress_cmd()
            .args(["-v", "-q", "chunks", &archive_arg(&fixtures), "llamasass"])
            .assert()
            .failure();
    }
}

// ============================================================================
// Help & Version
// ============================================================================

mod help_and_version {
    use super::*;

    #[test]
    fn test_help_lists_subcommands() {
        tgpress_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("chunks"))
            .stdout(predicate::str::contains("chunk-posts"))
            .stdout(predicate::str::contains("export-idml"));
    }

    #[test]
    fn test_version_flag() {
        tgpress_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tgpress"));
    }
}
