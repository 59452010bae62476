pub mod commands;
pub mod display;
pub mod emr;

pub use commands::{CliArgs, Commands};
