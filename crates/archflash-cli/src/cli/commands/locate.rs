//! `archflash locate` – show what the mirror currently publishes.

use anyhow::Result;
use archflash_core::listing::find_on_mirror;
use archflash_core::FlashConfig;

pub fn run_locate(cfg: &FlashConfig, signature: bool) -> Result<()> {
    let suffix = if signature {
        format!("{}{}", cfg.image_suffix, cfg.signature_suffix)
    } else {
        cfg.image_suffix.clone()
    };
    let name = find_on_mirror(cfg, &suffix)?;
    let url = cfg.file_url(&name)?;
    tracing::debug!(%url, "located");
    println!("{}", name);
    Ok(())
}
