//! CLI for archflash.

mod commands;

use anyhow::Result;
use archflash_core::config::{self, FlashConfig, DEFAULT_MIRROR};
use archflash_core::listing::TagPath;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_checksum, run_fetch, run_flash, run_locate};

/// Top-level CLI for archflash.
#[derive(Debug, Parser)]
#[command(name = "archflash")]
#[command(about = "Download the latest Arch Linux ISO, verify it and flash it to a USB drive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where to look for the release.
#[derive(Debug, Args)]
pub struct MirrorArgs {
    /// Mirror directory containing the ISO (see https://archlinux.org/download/).
    #[arg(long, env = "ARCHFLASH_MIRROR", default_value = DEFAULT_MIRROR, value_name = "URL")]
    pub mirror: String,

    /// Element path from the listing root to the file links, e.g. "html>body>pre>a".
    #[arg(long, value_name = "TAGS")]
    pub tag_path: Option<TagPath>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download, verify and write the latest ISO to a device.
    Flash {
        /// Absolute path to the USB drive, e.g. /dev/sdb.
        device: PathBuf,

        #[command(flatten)]
        mirror: MirrorArgs,

        /// Do not download or check the detached GPG signature.
        #[arg(long)]
        skip_signature: bool,

        /// Do not check the image against the mirror's sha256sums.txt.
        #[arg(long)]
        skip_checksum: bool,

        /// Keep the downloaded ISO and signature after flashing.
        #[arg(long)]
        keep_files: bool,

        /// Directory for the downloaded files (default: system temp dir).
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,

        /// Block size handed to dd.
        #[arg(long, default_value = "1M", value_name = "SIZE")]
        block_size: String,
    },

    /// Print the name of the current ISO (or its signature) on the mirror.
    Locate {
        #[command(flatten)]
        mirror: MirrorArgs,

        /// Look for the detached signature instead of the ISO.
        #[arg(long)]
        signature: bool,
    },

    /// Download a single URL to a file, with progress.
    Fetch {
        url: String,
        /// Destination file (created or truncated).
        dest: PathBuf,
    },

    /// Compute SHA-256 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl MirrorArgs {
    fn to_config(&self) -> Result<FlashConfig> {
        let mut cfg = FlashConfig {
            mirror: config::parse_mirror(&self.mirror)?,
            ..FlashConfig::default()
        };
        if let Some(path) = &self.tag_path {
            cfg.tag_path = path.clone();
        }
        Ok(cfg)
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        tracing::debug!("parsed command: {:?}", cli.command);

        match cli.command {
            CliCommand::Flash {
                device,
                mirror,
                skip_signature,
                skip_checksum,
                keep_files,
                work_dir,
                block_size,
            } => {
                let mut cfg = mirror.to_config()?;
                cfg.verify_signature = !skip_signature;
                cfg.verify_checksum = !skip_checksum;
                cfg.keep_files = keep_files;
                cfg.block_size = block_size;
                if let Some(dir) = work_dir {
                    cfg.work_dir = dir;
                }
                run_flash(&cfg, &device)?;
            }
            CliCommand::Locate { mirror, signature } => {
                let cfg = mirror.to_config()?;
                run_locate(&cfg, signature)?;
            }
            CliCommand::Fetch { url, dest } => run_fetch(&url, &dest)?,
            CliCommand::Checksum { path } => run_checksum(&path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
