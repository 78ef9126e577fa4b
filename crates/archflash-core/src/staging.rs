//! Where downloaded files live between download and flash.

use crate::error::{FlashError, Result};
use std::path::{Path, PathBuf};

/// Local paths for one release: the image and its detached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    /// Link target as scraped, relative to the mirror directory.
    pub href: String,
    /// Bare file name, used locally.
    pub filename: String,
    pub image: PathBuf,
    pub signature: PathBuf,
}

impl StagedImage {
    /// Stages `href` (as scraped from the listing) under `work_dir`.
    pub fn new(work_dir: &Path, href: &str, signature_suffix: &str) -> Result<Self> {
        let filename = local_name(href).ok_or_else(|| FlashError::UnusableLink {
            href: href.to_string(),
        })?;
        let image = work_dir.join(filename);
        let signature = with_suffix(&image, signature_suffix);
        Ok(StagedImage {
            href: href.to_string(),
            filename: filename.to_string(),
            image,
            signature,
        })
    }

    /// Link to the signature, relative to the mirror directory.
    pub fn signature_href(&self, signature_suffix: &str) -> String {
        format!("{}{}", self.href, signature_suffix)
    }

    /// Deletes the staged files. A signature that was never downloaded is fine;
    /// a missing image is not.
    pub fn remove(&self) -> Result<()> {
        std::fs::remove_file(&self.image).map_err(|e| FlashError::io(&self.image, e))?;
        match std::fs::remove_file(&self.signature) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(FlashError::io(&self.signature, e)),
        }
        tracing::debug!(image = %self.image.display(), "removed staged files");
        Ok(())
    }
}

/// Last path segment of an href, without query or fragment.
fn local_name(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next()?;
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

/// Appends `suffix` to the whole path (`file.iso` -> `file.iso.sig`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(suffix);
    PathBuf::from(o)
}
