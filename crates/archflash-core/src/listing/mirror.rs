//! Fetch + parse + locate against a live mirror.

use super::{locate, HtmlListing};
use crate::config::FlashConfig;
use crate::error::{FlashError, Result};
use crate::fetch::{self, CurlOptions};

/// Name of the first file in the mirror directory ending in `suffix`.
pub fn find_on_mirror(cfg: &FlashConfig, suffix: &str) -> Result<String> {
    let url = cfg.mirror.as_str();
    let body = fetch::fetch_text(url, CurlOptions::from(cfg))?;
    let listing = HtmlListing::from_bytes(url, &body)?;
    match locate(&listing.root(), &cfg.tag_path, suffix) {
        Some(href) => {
            tracing::debug!(url, %href, suffix, "located file in listing");
            Ok(href)
        }
        None => {
            tracing::warn!(url, suffix, path = %cfg.tag_path, "no matching link in listing");
            Err(FlashError::NotFound {
                suffix: suffix.to_string(),
            })
        }
    }
}
