//! External command construction and execution

pub mod command;
pub mod runner;

pub use command::CommandLine;
pub use runner::CommandRunner;
