pub mod config;
pub mod memory;

pub use config::ConfigCommand;
pub use memory::MemoryCommand;
