//! # tgpress CLI
//!
//! Command-line interface for the tgpress library.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use serde_json::json;

use tgpress::cli::{Args, ChunkingArgs, Command, SourceArgs};
use tgpress::config::{ExportOptions, LayoutConfig};
use tgpress::core::{ChunkReport, calculate_chunks, get_chunk, get_chunk_posts_and_comments};
use tgpress::format::{OutputFormat, report_to_string};
use tgpress::idml::export_frozen_layout;
use tgpress::idml::layout::FrozenLayout;
use tgpress::logging;
use tgpress::repository::{InMemoryRepository, PostRepository};
use tgpress::{Channel, PressError};

fn main() {
    let args = <Args as ClapParser>::parse();
    logging::init(args.verbose, args.quiet);

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), PressError> {
    match args.command {
        Command::Chunks {
            source,
            chunking,
            format,
            output,
        } => run_chunks(&source, &chunking, format.into(), output.as_deref()),
        Command::ChunkPosts {
            source,
            index,
            chunking,
            output,
        } => run_chunk_posts(&source, index, &chunking, output.as_deref()),
        Command::ExportIdml {
            source,
            layout,
            output,
            media_root,
            config,
        } => run_export(&source, &layout, &output, &media_root, config.as_deref()),
    }
}

/// Loads the archive and resolves the channel.
fn load(source: &SourceArgs) -> Result<(InMemoryRepository, Channel), PressError> {
    let repo = InMemoryRepository::from_path(&source.archive)?;
    let channel = repo
        .find_channel(&source.channel)
        .ok_or_else(|| PressError::channel_not_found(&source.channel))?;
    Ok((repo, channel))
}

/// Writes to `output` when given, otherwise prints to stdout.
fn emit(content: &str, output: Option<&Path>) -> Result<(), PressError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("✅ Saved to {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn run_chunks(
    source: &SourceArgs,
    chunking: &ChunkingArgs,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), PressError> {
    let start = Instant::now();
    let (repo, channel) = load(source)?;
    let opts = chunking.to_options(&channel);

    let chunks = calculate_chunks(&repo, &channel.id, &opts);
    let report = ChunkReport::new(&channel.id, &opts, &chunks);

    eprintln!("📦 tgpress v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("📖 Channel: {} ({})", channel.name, channel.id);
    eprintln!(
        "🧮 Chunks:  {} ({} posts, {} comments) in {:.2}s",
        report.total_chunks,
        report.total_posts,
        report.total_comments,
        start.elapsed().as_secs_f64()
    );

    let mut content = report_to_string(&report, format)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }
    emit(&content, output)
}

fn run_chunk_posts(
    source: &SourceArgs,
    index: usize,
    chunking: &ChunkingArgs,
    output: Option<&Path>,
) -> Result<(), PressError> {
    let (repo, channel) = load(source)?;
    let opts = chunking.to_options(&channel);

    let chunk = get_chunk(&repo, &channel.id, index, &opts)?;
    let (posts, comments) = get_chunk_posts_and_comments(&chunk);

    let body = json!({
        "channel_id": channel.id,
        "chunk_index": chunk.index,
        "date_from": chunk.date_from,
        "date_to": chunk.date_to,
        "posts": posts,
        "comments": comments,
    });
    let mut content = serde_json::to_string_pretty(&body)?;
    content.push('\n');
    emit(&content, output)
}

fn run_export(
    source: &SourceArgs,
    layout_path: &Path,
    output: &Path,
    media_root: &Path,
    config: Option<&Path>,
) -> Result<(), PressError> {
    let start = Instant::now();
    let repo = InMemoryRepository::from_path(&source.archive)?;
    let layout = FrozenLayout::from_path(layout_path)?;
    let layout_config = match config {
        Some(path) => LayoutConfig::from_path(path)?,
        None => LayoutConfig::default(),
    };

    println!("📦 tgpress v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Channel: {}", source.channel);
    println!("📐 Layout:  {} ({} pages, {} posts)", layout_path.display(), layout.pages.len(), layout.post_count());
    println!("🖼️  Media:   {}", media_root.display());
    println!("💾 Output:  {}", output.display());
    println!();

    let options = ExportOptions::new()
        .with_media_root(media_root)
        .with_layout(layout_config);
    let path = export_frozen_layout(&repo, &source.channel, &layout, &options, output)?;

    println!("✅ Done! IDML saved to {}", path.display());
    println!("   Total time:  {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
