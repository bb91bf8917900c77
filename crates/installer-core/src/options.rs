//! Option resolution for the `new` workflow
//!
//! Raw CLI flags come in as a plain `NewInput`, get merged with the persisted
//! defaults from the config store, and come out as an immutable
//! `ApplicationOptions` snapshot. All validation happens here, before any
//! external command runs; downstream components never see raw key-value
//! input.

use crate::config_store::Defaults;
use crate::error::Error;
use crate::node::NodePackageManager;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The database drivers a generated application can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Database {
    MySql,
    MariaDb,
    Pgsql,
    Sqlite,
    Sqlsrv,
}

impl Database {
    pub const ALL: [Database; 5] = [
        Database::MySql,
        Database::MariaDb,
        Database::Pgsql,
        Database::Sqlite,
        Database::Sqlsrv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Database::MySql => "mysql",
            Database::MariaDb => "mariadb",
            Database::Pgsql => "pgsql",
            Database::Sqlite => "sqlite",
            Database::Sqlsrv => "sqlsrv",
        }
    }

    /// Human-readable name for prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Database::MySql => "MySQL",
            Database::MariaDb => "MariaDB",
            Database::Pgsql => "PostgreSQL",
            Database::Sqlite => "SQLite",
            Database::Sqlsrv => "SQL Server",
        }
    }

    /// Port to write into `.env` when it differs from the template's 3306
    /// default.
    pub fn non_default_port(&self) -> Option<&'static str> {
        match self {
            Database::Pgsql => Some("5432"),
            Database::Sqlsrv => Some("1433"),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|db| db.as_str() == value)
            .ok_or_else(|| Error::InvalidOption {
                option: "database driver",
                value: value.to_string(),
                allowed: Self::ALL
                    .iter()
                    .map(|db| db.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which test framework the generated application ends up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFramework {
    Pest,
    Phpunit,
}

/// Raw flags for the `new` command, before resolution.
///
/// The binary crate maps its clap struct onto this so the core stays free of
/// argument-parsing concerns.
#[derive(Debug, Clone, Default)]
pub struct NewInput {
    pub name: String,
    pub dev: bool,
    pub git: bool,
    pub branch: Option<String>,
    /// `Some(flags)` when `--github` was given; the binary substitutes
    /// `--private` when the flag carries no value.
    pub github: Option<String>,
    pub organization: Option<String>,
    pub database: Option<String>,
    pub react: bool,
    pub vue: bool,
    pub livewire: bool,
    pub no_authentication: bool,
    pub pest: bool,
    pub phpunit: bool,
    pub npm: bool,
    pub pnpm: bool,
    pub yarn: bool,
    pub bun: bool,
    pub using: Option<String>,
    pub force: bool,
    pub quiet: bool,
    pub no_ansi: bool,
    pub no_interaction: bool,
}

/// Immutable configuration snapshot for one installer invocation.
///
/// Constructed once by `resolve`, never mutated afterwards; every workflow
/// step reads from this struct instead of re-inspecting CLI input.
#[derive(Debug, Clone)]
pub struct ApplicationOptions {
    pub name: String,
    pub directory: PathBuf,
    pub force: bool,
    pub version: Option<String>,
    pub starter_kit: Option<String>,
    pub database: Option<Database>,
    pub initialize_git: bool,
    pub git_branch: String,
    pub publish_to_github: bool,
    pub github_flags: Option<String>,
    pub github_organization: Option<String>,
    pub test_framework: TestFramework,
    pub install_dependencies: bool,
    pub package_manager: Option<NodePackageManager>,
    pub quiet: bool,
    pub decorated: bool,
    pub interactive: bool,
}

impl ApplicationOptions {
    /// Resolve raw input plus persisted defaults into a snapshot.
    ///
    /// `cwd` and `default_branch` are passed in explicitly so resolution
    /// stays a pure function of its arguments.
    pub fn resolve(
        input: &NewInput,
        defaults: &Defaults,
        cwd: &Path,
        default_branch: &str,
    ) -> Result<Self, Error> {
        let name = input.name.trim_end_matches(['/', '\\']).to_string();
        if name.is_empty() {
            return Err(Error::InvalidOption {
                option: "application name",
                value: input.name.clone(),
                allowed: "a non-empty directory name".to_string(),
            });
        }

        let database = match input.database.as_deref().or(defaults.database.as_deref()) {
            Some(value) => Some(Database::parse(value)?),
            None => None,
        };

        if input.pest && input.phpunit {
            return Err(Error::ConflictingOptions(
                "The --pest and --phpunit options cannot be combined".to_string(),
            ));
        }

        let publish_to_github = input.github.is_some();

        Ok(Self {
            directory: resolve_directory(&name, cwd),
            force: input.force || defaults.force,
            version: input.dev.then(|| "dev-master".to_string()),
            starter_kit: resolve_starter_kit(input, defaults),
            database,
            initialize_git: input.git || publish_to_github || defaults.git,
            git_branch: input
                .branch
                .clone()
                .or_else(|| defaults.branch.clone())
                .unwrap_or_else(|| default_branch.to_string()),
            publish_to_github,
            github_flags: input.github.clone(),
            github_organization: input
                .organization
                .clone()
                .or_else(|| defaults.organization.clone()),
            test_framework: resolve_test_framework(input, defaults),
            install_dependencies: input.npm || input.pnpm || input.yarn || input.bun,
            package_manager: resolve_package_manager(input, defaults),
            quiet: input.quiet,
            decorated: !input.no_ansi,
            interactive: !input.no_interaction && !input.quiet,
            name,
        })
    }

    /// Whether a starter kit replaces the default skeleton.
    pub fn is_using_starter_kit(&self) -> bool {
        self.starter_kit.is_some()
    }

    /// Repository name including the organization when one was given.
    pub fn full_name(&self) -> String {
        match &self.github_organization {
            Some(org) => format!("{}/{}", org, self.name),
            None => self.name.clone(),
        }
    }

    /// Whether the target is the directory the user is standing in.
    pub fn installs_into_current_directory(&self) -> bool {
        self.name == "."
    }
}

fn resolve_directory(name: &str, cwd: &Path) -> PathBuf {
    if name == "." {
        cwd.to_path_buf()
    } else {
        cwd.join(name)
    }
}

fn resolve_starter_kit(input: &NewInput, defaults: &Defaults) -> Option<String> {
    if let Some(package) = &input.using {
        return Some(package.clone());
    }

    let prefix = if input.no_authentication {
        "laravel/blank-"
    } else {
        "laravel/"
    };

    let stack = match (input.react, input.vue, input.livewire) {
        (true, _, _) => Some("react"),
        (_, true, _) => Some("vue"),
        (_, _, true) => Some("livewire"),
        _ => None,
    };

    stack
        .map(|stack| format!("{prefix}{stack}-starter-kit"))
        .or_else(|| defaults.starter_kit.clone())
}

fn resolve_test_framework(input: &NewInput, defaults: &Defaults) -> TestFramework {
    if input.pest || (defaults.pest && !input.phpunit) {
        TestFramework::Pest
    } else {
        TestFramework::Phpunit
    }
}

fn resolve_package_manager(input: &NewInput, defaults: &Defaults) -> Option<NodePackageManager> {
    match (input.pnpm, input.bun, input.yarn, input.npm) {
        (true, _, _, _) => Some(NodePackageManager::Pnpm),
        (_, true, _, _) => Some(NodePackageManager::Bun),
        (_, _, true, _) => Some(NodePackageManager::Yarn),
        (_, _, _, true) => Some(NodePackageManager::Npm),
        _ => defaults
            .package_manager
            .as_deref()
            .and_then(NodePackageManager::parse),
    }
}

/// The user's globally configured default git branch, falling back to `main`.
pub fn global_default_branch() -> String {
    Command::new("git")
        .args(["config", "--global", "init.defaultBranch"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|branch| !branch.is_empty())
        .unwrap_or_else(|| "main".to_string())
}
