use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use flowgraph::StyleConfig;
use flowgraph::traffic::{
    TimeWindow, event_list, merge, parse_timestamp, read_document, read_snapshot_sequence,
    snapshot_from_events,
};

/// Merge network traffic graph snapshots into a styled force-graph dataset.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge snapshot files (or stdin) into one deduplicated graph.
    Merge {
        /// Snapshot JSON files, `-` for stdin. Defaults to stdin.
        inputs: Vec<PathBuf>,

        /// TOML style config.
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build a snapshot from a flat list of IDS events.
    Events {
        /// Event JSON file, `-` for stdin.
        input: PathBuf,

        /// Keep events at or after this timestamp.
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Keep events at or before this timestamp.
        #[arg(long, requires = "start")]
        end: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write the default style config.
    InitConfig {
        #[arg(default_value = "flowgraph.toml")]
        path: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct OutputArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Merge {
            inputs,
            config,
            output,
        } => {
            let style = match config {
                Some(path) => StyleConfig::from_file(&path)?,
                None => StyleConfig::default(),
            };
            let input = read_snapshot_sequence(&inputs)?;
            let graph = merge(&input, &style);
            write_json(&graph, &output)
        }
        Command::Events {
            input,
            start,
            end,
            output,
        } => {
            let window = match (start, end) {
                (Some(start), Some(end)) => {
                    Some(TimeWindow::new(timestamp_arg(&start)?, timestamp_arg(&end)?)?)
                }
                _ => None,
            };
            let document = read_document(&input)?;
            let events = event_list(&document)
                .with_context(|| format!("no events in {}", input.display()))?;
            let snapshot = snapshot_from_events(events, window.as_ref());
            write_json(&snapshot, &output)
        }
        Command::InitConfig { path } => init_config(&path),
    }
}

fn timestamp_arg(text: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    parse_timestamp(text).ok_or_else(|| anyhow!("unrecognized timestamp: {text}"))
}

fn write_json<T: Serialize>(value: &T, output: &OutputArgs) -> Result<()> {
    let text = if output.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;

    match &output.output {
        Some(path) => {
            std::fs::write(path, text + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let text = StyleConfig::default().to_toml()?;
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default style config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_config_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join("flowgraph-init-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("flowgraph.toml");
        let _ = std::fs::remove_file(&path);

        init_config(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(StyleConfig::from_toml(&written).is_ok());

        let error = init_config(&path).unwrap_err();
        assert!(error.to_string().contains("already exists"));
    }
}
