//! Standalone host for the lock plugin: config file handling and a console
//! command surface.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod console;
mod error;

pub use config::Config;
pub use console::{CONSOLE_CHANNEL, Console, stdin_lines};
pub use error::{Error, Result};
