//! `archflash fetch <url> <dest>` – one streaming download.

use anyhow::{Context, Result};
use archflash_core::fetch::{fetch_to_path, CurlOptions};
use std::path::Path;

pub fn run_fetch(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {} ...", url);
    let bytes = fetch_to_path(url, dest, CurlOptions::default())
        .with_context(|| format!("downloading to {}", dest.display()))?;
    println!("Download complete ({} bytes)", bytes);
    Ok(())
}
