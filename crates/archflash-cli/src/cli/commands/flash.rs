//! `archflash flash <device>` – the whole download/verify/write pipeline.

use anyhow::{Context, Result};
use archflash_core::{pipeline, FlashConfig, FlashError};
use std::path::Path;

pub fn run_flash(cfg: &FlashConfig, device: &Path) -> Result<()> {
    match pipeline::run(cfg, device) {
        Ok(report) => {
            if !report.cleaned_up {
                println!("Kept {}", report.staged.image.display());
            }
            Ok(())
        }
        Err(e @ FlashError::NotFound { .. }) => {
            Err(e).context("Mirror does not have the latest ISO")
        }
        Err(e @ FlashError::Destination { .. }) => {
            println!("Usage:");
            println!("\tarchflash flash /full/path/to/usb");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
