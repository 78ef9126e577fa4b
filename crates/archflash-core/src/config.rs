use crate::error::{FlashError, Result};
use crate::listing::TagPath;
use std::path::PathBuf;
use url::Url;

/// Mirror used when none is given. Full list: <https://archlinux.org/download/>.
pub const DEFAULT_MIRROR: &str = "https://mirrors.ocf.berkeley.edu/archlinux/iso/latest/";

/// Name of the checksum file published next to the ISO.
pub const CHECKSUM_FILE: &str = "sha256sums.txt";

/// Everything a run needs, passed explicitly into each operation.
///
/// There is no config file; the CLI builds one of these from defaults and flags.
#[derive(Debug, Clone)]
pub struct FlashConfig {
    /// Mirror directory holding the release. Always ends in `/`.
    pub mirror: Url,
    /// Element chain from the listing's root to the file anchors.
    pub tag_path: TagPath,
    pub image_suffix: String,
    /// Appended to the image name to get its detached signature.
    pub signature_suffix: String,
    /// Where the image and signature are staged before flashing.
    pub work_dir: PathBuf,
    pub verify_signature: bool,
    pub verify_checksum: bool,
    /// Leave staged files in `work_dir` after a successful flash.
    pub keep_files: bool,
    pub dd_program: String,
    /// Passed to `dd` as `bs=`.
    pub block_size: String,
    pub gpg_program: String,
    /// Connection setup limit. Transfers themselves never time out.
    pub connect_timeout_secs: u64,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            mirror: Url::parse(DEFAULT_MIRROR).expect("default mirror URL is valid"),
            tag_path: TagPath::default(),
            image_suffix: ".iso".to_string(),
            signature_suffix: ".sig".to_string(),
            work_dir: std::env::temp_dir(),
            verify_signature: true,
            verify_checksum: true,
            keep_files: false,
            dd_program: "dd".to_string(),
            block_size: "1M".to_string(),
            gpg_program: "gpg".to_string(),
            connect_timeout_secs: 30,
        }
    }
}

impl FlashConfig {
    /// Defaults with a different mirror. See [`parse_mirror`].
    pub fn with_mirror(mirror: &str) -> Result<Self> {
        Ok(Self {
            mirror: parse_mirror(mirror)?,
            ..Self::default()
        })
    }

    /// URL of a file inside the mirror directory.
    pub fn file_url(&self, name: &str) -> Result<Url> {
        self.mirror.join(name).map_err(|e| FlashError::InvalidMirror {
            url: format!("{}{}", self.mirror, name),
            reason: e.to_string(),
        })
    }
}

/// Parses a mirror URL, requiring http(s), and appends a trailing `/` so that
/// joining a file name stays inside the directory.
pub fn parse_mirror(mirror: &str) -> Result<Url> {
    let invalid = |reason: String| FlashError::InvalidMirror {
        url: mirror.to_string(),
        reason,
    };
    let mut url = Url::parse(mirror.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
