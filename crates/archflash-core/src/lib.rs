pub mod config;
pub mod error;
pub mod logging;

pub mod checksum;
mod command;
pub mod destination;
pub mod fetch;
pub mod imaging;
pub mod listing;
pub mod pipeline;
pub mod progress;
pub mod signature;
pub mod size;
pub mod staging;

pub use command::CommandOutput;
pub use config::FlashConfig;
pub use error::{FlashError, Result};
