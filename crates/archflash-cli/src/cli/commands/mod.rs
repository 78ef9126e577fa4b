//! CLI command handlers. Each command is in its own file.

mod checksum;
mod fetch;
mod flash;
mod locate;

pub use checksum::run_checksum;
pub use fetch::run_fetch;
pub use flash::run_flash;
pub use locate::run_locate;
