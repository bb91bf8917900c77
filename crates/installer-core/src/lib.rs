//! Installer Core - Shared library for the Laravel application installer
//!
//! This library provides the core functionality for scaffolding a new Laravel
//! application: resolving CLI options into an immutable snapshot, running the
//! external command pipeline (composer, git, gh, node package managers), and
//! applying the textual substitutions the generated `.env` files need.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Primitives** - filesystem capability, command descriptors,
//!   the config store, and package-manager detection
//! - **Layer 2: Mutation & Execution** - `DatabaseConfigurator` and
//!   `CommandRunner`
//! - **Layer 3: Workflows** - the `new`, `clone`, `artisan`, `configure`,
//!   and `docs` command orchestrations consumed by the `laravel` binary
//!
//! External collaborators (composer, git, gh, npm/yarn/pnpm/bun, the PHP
//! runtime) are consumed strictly as child processes: the core hands them a
//! command line and a working directory and reads back an exit code plus a
//! line stream.

pub mod config_store;
pub mod database;
pub mod error;
pub mod fs;
pub mod node;
pub mod options;
pub mod process;
pub mod prompts;
pub mod workflow;

// Re-export main types for convenience
pub use config_store::ConfigStore;
pub use database::DatabaseConfigurator;
pub use error::Error;
pub use fs::{DiskFileManager, FileManager};
pub use node::NodePackageManager;
pub use options::{ApplicationOptions, Database, TestFramework};
pub use process::{CommandLine, CommandRunner};
pub use prompts::Prompter;
