//! Block-level copy of the image onto the device, delegated to `dd`.

use crate::command::{run_captured, CommandOutput};
use crate::config::FlashConfig;
use crate::error::Result;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// `dd if=<image> of=<device> bs=<block_size> status=progress`.
///
/// The output is not interpreted; callers print it as-is.
pub fn write_image(cfg: &FlashConfig, image: &Path, device: &Path) -> Result<CommandOutput> {
    let mut cmd = Command::new(&cfg.dd_program);
    cmd.args(dd_args(image, device, &cfg.block_size));
    tracing::info!(image = %image.display(), device = %device.display(), "writing image");
    run_captured(cmd)
}

fn dd_args(image: &Path, device: &Path, block_size: &str) -> Vec<OsString> {
    let mut input = OsString::from("if=");
    input.push(image);
    let mut output = OsString::from("of=");
    output.push(device);
    vec![
        input,
        output,
        OsString::from(format!("bs={}", block_size)),
        OsString::from("status=progress"),
    ]
}
