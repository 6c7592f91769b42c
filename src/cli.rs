//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - global flags and the [`Command`] to run
//! - [`SortArg`] - sort order accepted on the command line
//! - [`OutputFormat`] - report format options
//!
//! All values convert into their library counterparts, so the binary only
//! wires flags to library calls.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::core::{ChunkOptions, SortOrder};
use crate::post::Channel;

/// Paginate archived Telegram channels and export print layouts to InDesign.
#[derive(Parser, Debug, Clone)]
#[command(name = "tgpress")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    tgpress chunks archive.json llamasass
    tgpress chunks archive.json llamasass --items-per-chunk 30 -f csv -o chunks.csv
    tgpress chunk-posts archive.json llamasass 2
    tgpress export-idml archive.json llamasass layout.json -o llamasass.idml --media-root downloads")]
pub struct Args {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the chunk report of a channel
    Chunks {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        chunking: ChunkingArgs,

        /// Report format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the posts and comments of one chunk as JSON
    ChunkPosts {
        #[command(flatten)]
        source: SourceArgs,

        /// 0-based chunk index
        index: usize,

        #[command(flatten)]
        chunking: ChunkingArgs,

        /// Write the JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a frozen page layout as an IDML package
    #[command(name = "export-idml")]
    ExportIdml {
        #[command(flatten)]
        source: SourceArgs,

        /// Frozen layout JSON
        layout: PathBuf,

        /// Output .idml path
        #[arg(short, long)]
        output: PathBuf,

        /// Directory media and avatar paths are relative to
        #[arg(long, value_name = "DIR", default_value = ".")]
        media_root: PathBuf,

        /// Layout config JSON (page sizes, units)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Archive and channel to work on.
#[derive(ClapArgs, Debug, Clone)]
pub struct SourceArgs {
    /// Archive JSON with channels, posts and edits
    pub archive: PathBuf,

    /// Channel id
    pub channel: String,
}

/// Overrides for the channel's chunking settings.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ChunkingArgs {
    /// Target weight of one chunk
    #[arg(long, value_name = "N")]
    pub items_per_chunk: Option<usize>,

    /// Allowed overflow above the target, as a fraction
    #[arg(long, value_name = "F")]
    pub overflow: Option<f64>,

    /// Post order
    #[arg(long, value_enum, default_value = "desc")]
    pub sort: SortArg,

    /// Keep hidden posts
    #[arg(long)]
    pub include_hidden: bool,
}

impl ChunkingArgs {
    /// Channel print settings with the command-line overrides applied.
    pub fn to_options(&self, channel: &Channel) -> ChunkOptions {
        let mut opts = ChunkOptions::from_settings(&channel.effective_print_settings())
            .with_sort_order(self.sort.into())
            .with_include_hidden(self.include_hidden);
        if let Some(items) = self.items_per_chunk {
            opts = opts.with_items_per_chunk(items);
        }
        if let Some(overflow) = self.overflow {
            opts = opts.with_overflow_threshold(overflow);
        }
        opts
    }
}

/// Sort order on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortArg {
    /// Oldest first
    Asc,

    /// Newest first
    #[default]
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> SortOrder {
        match sort {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
        }
    }
}

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One semicolon-delimited row per chunk
    Csv,

    /// The full report
    #[default]
    Json,

    /// One chunk summary per line
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::format::OutputFormat::from(*self).fmt(f)
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrintSettings;

    #[test]
    fn test_parse_chunks_command() {
        let args = Args::try_parse_from([
            "tgpress",
            "chunks",
            "archive.json",
            "llamasass",
            "--items-per-chunk",
            "30",
            "--sort",
            "asc",
            "-f",
            "csv",
        ])
        .unwrap();

        let Command::Chunks {
            source,
            chunking,
            format,
            output,
        } = args.command
        else {
            panic!("expected chunks");
        };
        assert_eq!(source.channel, "llamasass");
        assert_eq!(chunking.items_per_chunk, Some(30));
        assert_eq!(chunking.sort, SortArg::Asc);
        assert_eq!(format, OutputFormat::Csv);
        assert!(output.is_none());
    }

    #[test]
    fn test_parse_export_requires_output() {
        assert!(
            Args::try_parse_from(["tgpress", "export-idml", "a.json", "chan", "layout.json"])
                .is_err()
        );
        let args = Args::try_parse_from([
            "tgpress",
            "-v",
            "export-idml",
            "a.json",
            "chan",
            "layout.json",
            "-o",
            "out.idml",
        ])
        .unwrap();
        assert_eq!(args.verbose, 1);
        assert!(matches!(args.command, Command::ExportIdml { .. }));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(
            Args::try_parse_from(["tgpress", "-v", "-q", "chunks", "a.json", "chan"]).is_err()
        );
    }

    #[test]
    fn test_chunking_overrides() {
        let channel = Channel::new("chan", "Chan").with_print_settings(
            PrintSettings::new()
                .with_items_per_chunk(10)
                .with_overflow_threshold(0.5),
        );

        let defaults = ChunkingArgs::default().to_options(&channel);
        assert_eq!(defaults.items_per_chunk, 10);
        assert_eq!(defaults.sort_order, SortOrder::Desc);

        let args = ChunkingArgs {
            items_per_chunk: Some(20),
            overflow: Some(0.1),
            sort: SortArg::Asc,
            include_hidden: true,
        };
        let opts = args.to_options(&channel);
        assert_eq!(opts.items_per_chunk, 20);
        assert!((opts.overflow_threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(opts.sort_order, SortOrder::Asc);
        assert!(opts.include_hidden);
    }

    #[test]
    fn test_format_conversion() {
        let lib: crate::format::OutputFormat = OutputFormat::Jsonl.into();
        assert_eq!(lib, crate::format::OutputFormat::Jsonl);
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
    }
}
