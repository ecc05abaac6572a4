pub mod commands;
pub mod error;
pub mod output;

pub use commands::{ConfigCommand, MemoryCommand};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, format_timestamp, truncate_string};
