//! End-to-end run: validate the device, find the current ISO on the mirror,
//! download it (plus signature), verify, flash with `dd`, clean up.
//!
//! Every step either succeeds or aborts the whole run. Staged files are only
//! removed after a successful flash; after a failure they are left behind.

use crate::checksum;
use crate::config::{FlashConfig, CHECKSUM_FILE};
use crate::destination::validate_destination;
use crate::error::{FlashError, Result};
use crate::fetch::{self, CurlOptions};
use crate::imaging::write_image;
use crate::listing::find_on_mirror;
use crate::signature::verify_signature;
use crate::staging::StagedImage;
use std::io;
use std::path::{Path, PathBuf};

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct FlashReport {
    pub staged: StagedImage,
    pub device: PathBuf,
    pub image_bytes: u64,
    pub signature_verified: bool,
    /// SHA-256 of the image when the checksum step ran.
    pub sha256: Option<String>,
    /// False when `keep_files` left the staged files in place.
    pub cleaned_up: bool,
}

pub fn ensure_supported_platform() -> Result<()> {
    match std::env::consts::OS {
        "linux" => Ok(()),
        other => Err(FlashError::UnsupportedPlatform(other)),
    }
}

/// Flashes the mirror's current ISO onto `device`.
pub fn run(cfg: &FlashConfig, device: &Path) -> Result<FlashReport> {
    ensure_supported_platform()?;
    let device = validate_destination(device)?;

    println!("Looking for ISO in {}", cfg.mirror);
    let staged = locate_image(cfg)?;
    tracing::info!(filename = %staged.filename, "found image on mirror");

    let image_bytes = download(cfg, &staged.href, &staged.filename, &staged.image)?;

    if cfg.verify_signature {
        let sig_href = staged.signature_href(&cfg.signature_suffix);
        let sig_name = format!("{}{}", staged.filename, cfg.signature_suffix);
        download(cfg, &sig_href, &sig_name, &staged.signature)?;

        println!("Verifying ISO");
        verify_signature(cfg, &staged.signature, &staged.image)?.print_indented(io::stdout());
    }

    let sha256 = if cfg.verify_checksum {
        println!("Checking SHA-256");
        let digest = check_digest(cfg, &staged)?;
        println!("\t{}  {}", digest, staged.filename);
        Some(digest)
    } else {
        None
    };

    println!("Flashing ISO to {}", device.display());
    write_image(cfg, &staged.image, &device)?.print_indented(io::stdout());
    println!("Flash complete");

    let cleaned_up = !cfg.keep_files;
    if cleaned_up {
        staged.remove()?;
    }
    tracing::info!(device = %device.display(), image_bytes, "flash finished");

    Ok(FlashReport {
        staged,
        device,
        image_bytes,
        signature_verified: cfg.verify_signature,
        sha256,
        cleaned_up,
    })
}

/// Finds the current image on the mirror and decides where it is staged.
pub fn locate_image(cfg: &FlashConfig) -> Result<StagedImage> {
    let href = find_on_mirror(cfg, &cfg.image_suffix)?;
    StagedImage::new(&cfg.work_dir, &href, &cfg.signature_suffix)
}

/// Downloads `href` (relative to the mirror) to `dest` with status lines.
pub fn download(cfg: &FlashConfig, href: &str, name: &str, dest: &Path) -> Result<u64> {
    let url = cfg.file_url(href)?;
    println!("Downloading {} ...", name);
    let bytes = fetch::fetch_to_path(url.as_str(), dest, CurlOptions::from(cfg))?;
    println!("Download complete");
    Ok(bytes)
}

fn check_digest(cfg: &FlashConfig, staged: &StagedImage) -> Result<String> {
    let url = cfg.file_url(CHECKSUM_FILE)?;
    let body = fetch::fetch_text(url.as_str(), CurlOptions::from(cfg))?;
    let sums = String::from_utf8_lossy(&body);
    checksum::verify_file(&staged.image, &staged.filename, &sums)
}
