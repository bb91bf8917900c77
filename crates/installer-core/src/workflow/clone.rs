//! The `clone` workflow: set up an existing Laravel repository
//!
//! Clones a git repository, installs its composer dependencies, and when the
//! cloned package declares itself a project, seeds `.env` from the example
//! file and generates an application key.

use crate::fs::{DiskFileManager, FileManager};
use crate::process::{CommandLine, CommandRunner};
use crate::workflow::new_app::{find_composer, php_binary};
use anyhow::{bail, Result};
use std::path::Path;

pub struct CloneInput {
    pub repository: String,
    pub branch: Option<String>,
    pub directory: Option<String>,
    pub quiet: bool,
    pub decorated: bool,
}

/// Run the clone pipeline; returns the process exit code.
pub async fn run(input: &CloneInput) -> Result<i32> {
    let name = match &input.directory {
        Some(directory) => directory.clone(),
        None => repository_name(&input.repository)?,
    };
    let cwd = std::env::current_dir()?;
    let target = cwd.join(&name);
    let runner = CommandRunner::new(input.quiet, input.decorated);
    let files = DiskFileManager;

    cliclack::intro("Laravel Installer")?;
    if let Some(branch) = &input.branch {
        cliclack::log::info(format!("Using branch {}", branch))?;
    }
    cliclack::log::info(format!(
        "Cloning {} into {}",
        input.repository,
        target.display()
    ))?;

    let clone = [clone_command(&input.repository, input.branch.as_deref(), &name)];
    let mut last_exit = runner.run(&clone, &cwd, &[]).await?;
    if last_exit != 0 {
        return Ok(last_exit);
    }

    let install = [CommandLine::shell(format!("{} install", find_composer()))];
    last_exit = runner.run(&install, &target, &[]).await?;

    if is_project(&files, &target) {
        let env = target.join(".env");
        let example = target.join(".env.example");
        if !files.exists(&env) && files.exists(&example) {
            files.copy(&example, &env)?;
        }
        let keygen = [CommandLine::shell(format!(
            "{} artisan key:generate --ansi",
            php_binary()
        ))];
        last_exit = runner.run(&keygen, &target, &[]).await?;
    }

    cliclack::outro(format!("Repository ready in {}.", name))?;
    Ok(last_exit)
}

/// The directory a bare `git clone` would create for this URL.
fn repository_name(repository: &str) -> Result<String> {
    let name = repository
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git");
    if name.is_empty() {
        bail!("Could not derive a directory name from \"{}\"", repository);
    }
    Ok(name.to_string())
}

fn clone_command(repository: &str, branch: Option<&str>, directory: &str) -> CommandLine {
    let line = match branch {
        Some(branch) => format!("git clone -b {} {} \"{}\"", branch, repository, directory),
        None => format!("git clone {} \"{}\"", repository, directory),
    };
    CommandLine::passthrough(line)
}

/// Whether the cloned package's composer manifest declares a project type.
/// Libraries get their dependencies installed but no `.env` or key.
fn is_project(files: &impl FileManager, directory: &Path) -> bool {
    let Ok(manifest) = files.read(&directory.join("composer.json")) else {
        return false;
    };
    serde_json::from_str::<serde_json::Value>(&manifest)
        .ok()
        .and_then(|manifest| manifest.get("type").and_then(|t| t.as_str().map(str::to_string)))
        .is_some_and(|kind| kind == "project")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_name_strips_the_git_suffix() {
        assert_eq!(
            repository_name("https://github.com/laravel/laravel.git").unwrap(),
            "laravel"
        );
        assert_eq!(
            repository_name("git@github.com:laravel/laravel.git").unwrap(),
            "laravel"
        );
        assert_eq!(
            repository_name("https://github.com/acme/blog/").unwrap(),
            "blog"
        );
    }

    #[test]
    fn repository_name_rejects_an_unusable_url() {
        assert!(repository_name("").is_err());
        assert!(repository_name(".git").is_err());
    }

    #[test]
    fn clone_command_is_flag_exempt_and_targets_the_directory() {
        let command = clone_command("https://github.com/acme/blog.git", None, "blog");
        assert_eq!(command.text(), "git clone https://github.com/acme/blog.git \"blog\"");
        assert!(!command.supports_decoration_flags());
    }

    #[test]
    fn clone_command_pins_the_branch() {
        let command = clone_command("https://github.com/acme/blog.git", Some("develop"), "site");
        assert_eq!(
            command.text(),
            "git clone -b develop https://github.com/acme/blog.git \"site\""
        );
    }

    #[test]
    fn only_a_project_manifest_triggers_key_generation() {
        let dir = tempfile::tempdir().unwrap();
        let fm = DiskFileManager;

        assert!(!is_project(&fm, dir.path()));

        std::fs::write(
            dir.path().join("composer.json"),
            r#"{"name": "acme/blog", "type": "library"}"#,
        )
        .unwrap();
        assert!(!is_project(&fm, dir.path()));

        std::fs::write(
            dir.path().join("composer.json"),
            r#"{"name": "acme/blog", "type": "project"}"#,
        )
        .unwrap();
        assert!(is_project(&fm, dir.path()));
    }

    #[test]
    fn a_corrupt_manifest_reads_as_not_a_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("composer.json"), "{ not json").unwrap();
        assert!(!is_project(&DiskFileManager, dir.path()));
    }
}
