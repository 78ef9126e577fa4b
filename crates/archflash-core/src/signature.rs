//! Detached signature check, delegated to `gpg`.

use crate::command::{run_captured, CommandOutput};
use crate::config::FlashConfig;
use crate::error::Result;
use std::path::Path;
use std::process::Command;

/// `gpg --keyserver-options auto-key-retrieve --verify <signature> <image>`.
///
/// Any non-zero exit means the image is not trusted.
pub fn verify_signature(cfg: &FlashConfig, signature: &Path, image: &Path) -> Result<CommandOutput> {
    let mut cmd = Command::new(&cfg.gpg_program);
    cmd.args(["--keyserver-options", "auto-key-retrieve", "--verify"])
        .arg(signature)
        .arg(image);
    tracing::info!(signature = %signature.display(), image = %image.display(), "verifying signature");
    run_captured(cmd)
}
