//! The `new` workflow: scaffold a fresh Laravel application
//!
//! A linear pipeline of external commands and file substitutions. The
//! project-creation step gates everything else: a non-zero exit there
//! short-circuits the post-creation steps and becomes the program's exit
//! code. Later optional steps (git, Pest, GitHub, node dependencies) are
//! independent of each other; nothing is rolled back on a partial failure.

use crate::database::DatabaseConfigurator;
use crate::error::Error;
use crate::fs::{DiskFileManager, FileManager};
use crate::node::NodePackageManager;
use crate::options::{ApplicationOptions, Database, TestFramework};
use crate::process::{CommandLine, CommandRunner};
use crate::prompts::{Choice, Prompter};
use anyhow::Result;
use std::path::Path;

pub struct NewApplication<'a> {
    options: ApplicationOptions,
    runner: CommandRunner,
    prompter: &'a dyn Prompter,
    files: DiskFileManager,
}

impl<'a> NewApplication<'a> {
    pub fn new(options: ApplicationOptions, prompter: &'a dyn Prompter) -> Self {
        let runner = CommandRunner::new(options.quiet, options.decorated);
        Self {
            options,
            runner,
            prompter,
            files: DiskFileManager,
        }
    }

    /// Run the full pipeline; returns the process exit code.
    pub async fn run(&self) -> Result<i32> {
        verify_target(&self.options)?;

        cliclack::intro("Laravel Installer")?;
        cliclack::log::info(format!(
            "Creating application in {}",
            self.options.directory.display()
        ))?;

        let mut last_exit = self.create_project().await?;
        if last_exit != 0 {
            return Ok(last_exit);
        }

        self.rewrite_app_url()?;

        let database = self.choose_database()?;
        self.configure_database(database)?;

        if self.should_run_migrations()? {
            last_exit = self.run_migrations().await?;
        }

        if self.options.initialize_git {
            last_exit = self.initialize_git().await?;
        }

        if self.options.test_framework == TestFramework::Pest {
            last_exit = self.install_pest().await?;
        }

        if self.options.publish_to_github {
            last_exit = self.publish_to_github().await?;
        }

        let node_result = self.install_node_dependencies().await?;
        if let Some(code) = node_result {
            last_exit = code;
        }

        self.print_next_steps(node_result.is_none())?;

        Ok(last_exit)
    }

    async fn create_project(&self) -> Result<i32> {
        let commands = create_project_commands(&self.options, &find_composer(), php_binary());
        let cwd = std::env::current_dir()?;
        self.runner.run(&commands, &cwd, &[]).await
    }

    fn rewrite_app_url(&self) -> Result<()> {
        rewrite_app_url(&self.files, &self.options.directory, &self.options.name)?;
        Ok(())
    }

    fn choose_database(&self) -> Result<Database> {
        if let Some(database) = self.options.database {
            return Ok(database);
        }

        let choices: Vec<Choice> = Database::ALL
            .iter()
            .map(|db| Choice {
                value: db.as_str(),
                label: db.label(),
            })
            .collect();
        let selected = self.prompter.select(
            "Which database will your application use?",
            &choices,
            Database::Sqlite.as_str(),
        )?;

        Ok(Database::parse(&selected)?)
    }

    fn configure_database(&self, database: Database) -> Result<()> {
        DatabaseConfigurator::new(&self.files).configure(
            &self.options.directory,
            database,
            &self.options.name,
        )?;

        if database == Database::Sqlite {
            let path = self.options.directory.join("database").join("database.sqlite");
            if !self.files.exists(&path) {
                self.files.write(&path, "")?;
            }
        }

        Ok(())
    }

    fn should_run_migrations(&self) -> Result<bool> {
        self.prompter
            .confirm("Run the default database migrations?", true)
    }

    async fn run_migrations(&self) -> Result<i32> {
        let commands = [CommandLine::shell(format!(
            "{} artisan migrate",
            php_binary()
        ))];
        self.runner
            .run(&commands, &self.options.directory, &[])
            .await
    }

    async fn initialize_git(&self) -> Result<i32> {
        let commands = git_init_commands(&self.options.git_branch);
        self.runner
            .run(&commands, &self.options.directory, &[])
            .await
    }

    async fn install_pest(&self) -> Result<i32> {
        // The skeleton's phpunit examples would fail under Pest's init.
        for file in ["tests/Feature/ExampleTest.php", "tests/Unit/ExampleTest.php"] {
            let path = self.options.directory.join(file);
            if self.files.exists(&path) {
                self.files.delete(&path)?;
            }
        }

        let commands = pest_commands(&find_composer(), php_binary(), self.options.initialize_git);
        self.runner
            .run(&commands, &self.options.directory, &[])
            .await
    }

    async fn publish_to_github(&self) -> Result<i32> {
        let probe = [CommandLine::passthrough("gh auth status")];
        let authenticated = self
            .runner
            .run_with(&probe, &self.options.directory, &[], |_| {})
            .await?
            == 0;

        if !authenticated {
            cliclack::log::warning(
                "Make sure the \"gh\" CLI tool is installed and you're authenticated to GitHub. Skipping repository creation.",
            )?;
            return Ok(0);
        }

        let commands = [CommandLine::passthrough(format!(
            "gh repo create {} --source=. --push {}",
            self.options.full_name(),
            self.options.github_flags.as_deref().unwrap_or("--private"),
        ))];
        self.runner
            .run(&commands, &self.options.directory, &[])
            .await
    }

    /// Returns `Some(exit_code)` when the install ran, `None` when skipped.
    async fn install_node_dependencies(&self) -> Result<Option<i32>> {
        let wanted = self.options.install_dependencies
            || self.prompter.confirm(
                "Would you like to run npm install and npm run build?",
                false,
            )?;

        if !wanted {
            return Ok(None);
        }

        let manager = self
            .options
            .package_manager
            .or_else(|| NodePackageManager::from_lock_file(&self.options.directory))
            .unwrap_or_else(NodePackageManager::detect);
        cliclack::log::info(format!("Installing dependencies with {}", manager))?;

        // A starter kit may ship another manager's lockfile; remove it so
        // the chosen tool owns resolution.
        for lock in manager.stale_lock_files() {
            let path = self.options.directory.join(lock);
            if self.files.exists(&path) {
                self.files.delete(&path)?;
            }
        }

        let commands = [
            CommandLine::shell(manager.install_command()),
            CommandLine::shell(manager.build_command()),
        ];
        let code = self
            .runner
            .run(&commands, &self.options.directory, &[])
            .await?;
        Ok(Some(code))
    }

    fn print_next_steps(&self, dependencies_skipped: bool) -> Result<()> {
        let mut steps = Vec::new();
        if !self.options.installs_into_current_directory() {
            steps.push(format!("cd {}", self.options.name));
        }
        if dependencies_skipped {
            steps.push("npm install && npm run build".to_string());
        }
        steps.push("php artisan serve".to_string());

        println!();
        println!("  Next steps");
        println!();
        for (i, step) in steps.iter().enumerate() {
            println!("  {}.  {}", i + 1, step);
        }

        cliclack::outro("Application ready! Build something amazing.")?;
        Ok(())
    }
}

/// Fail before any side effect when the target directory is unusable.
fn verify_target(options: &ApplicationOptions) -> Result<(), Error> {
    if options.force && options.installs_into_current_directory() {
        return Err(Error::ForceIntoCurrentDirectory);
    }

    if !options.force
        && options.directory.exists()
        && !options.installs_into_current_directory()
    {
        return Err(Error::ApplicationAlreadyExists(options.directory.clone()));
    }

    Ok(())
}

/// Point APP_URL at the conventional `{name}.test` host in both env files.
fn rewrite_app_url(
    files: &impl FileManager,
    directory: &Path,
    name: &str,
) -> Result<(), Error> {
    let url = format!("APP_URL=http://{}.test", name.to_lowercase());
    for file in [".env", ".env.example"] {
        files.replace(&directory.join(file), "APP_URL=http://localhost", &url)?;
    }
    Ok(())
}

/// The composer invocation for this environment: a local `composer.phar`
/// takes precedence over a global install.
pub(crate) fn find_composer() -> String {
    let phar = Path::new("composer.phar");
    if phar.exists() {
        format!("{} composer.phar", php_binary())
    } else {
        "composer".to_string()
    }
}

pub(crate) fn php_binary() -> &'static str {
    "php"
}

fn create_project_commands(
    options: &ApplicationOptions,
    composer: &str,
    php: &str,
) -> Vec<CommandLine> {
    let directory = options.directory.display();
    let mut commands = Vec::new();

    if options.force && options.directory.exists() {
        let delete = if cfg!(windows) {
            format!("rd /s /q \"{}\"", directory)
        } else {
            format!("rm -rf \"{}\"", directory)
        };
        commands.push(CommandLine::passthrough(delete));
    }

    let template = options.starter_kit.as_deref().unwrap_or("laravel/laravel");
    let version = options
        .version
        .as_deref()
        .map(|v| format!(" \"{}\"", v))
        .unwrap_or_default();
    commands.push(CommandLine::shell(format!(
        "{composer} create-project {template} \"{directory}\"{version} --remove-vcs --prefer-dist --no-scripts"
    )));
    commands.push(CommandLine::shell(format!(
        "{composer} run post-root-package-install -d \"{directory}\""
    )));
    commands.push(CommandLine::shell(format!(
        "{php} \"{directory}/artisan\" key:generate --ansi"
    )));

    commands
}

fn git_init_commands(branch: &str) -> Vec<CommandLine> {
    vec![
        CommandLine::passthrough("git init -q"),
        CommandLine::passthrough("git add ."),
        CommandLine::passthrough("git commit -q -m \"Set up a fresh Laravel app\""),
        CommandLine::passthrough(format!("git branch -M {}", branch)),
    ]
}

fn pest_commands(composer: &str, php: &str, commit: bool) -> Vec<CommandLine> {
    let mut commands = vec![
        CommandLine::shell(format!(
            "{composer} remove phpunit/phpunit --dev --no-update"
        )),
        CommandLine::shell(format!(
            "{composer} require pestphp/pest pestphp/pest-plugin-laravel --no-update --dev"
        )),
        CommandLine::shell(format!("{composer} update")),
        CommandLine::passthrough(format!("{php} ./vendor/bin/pest --init")),
    ];

    if commit {
        commands.push(CommandLine::passthrough("git add ."));
        commands.push(CommandLine::passthrough("git commit -q -m \"Install Pest\""));
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_store::Defaults;
    use crate::options::NewInput;
    use std::path::PathBuf;

    fn options(name: &str, cwd: &Path) -> ApplicationOptions {
        let input = NewInput {
            name: name.to_string(),
            ..NewInput::default()
        };
        ApplicationOptions::resolve(&input, &Defaults::default(), cwd, "main").unwrap()
    }

    #[test]
    fn existing_directory_without_force_is_rejected_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("my-app")).unwrap();
        std::fs::write(dir.path().join("my-app").join("keep.txt"), "data").unwrap();

        let err = verify_target(&options("my-app", dir.path())).unwrap_err();
        assert!(matches!(err, Error::ApplicationAlreadyExists(_)));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("my-app").join("keep.txt")).unwrap(),
            "data"
        );
    }

    #[test]
    fn an_existing_file_also_blocks_installation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my-app"), "").unwrap();
        let err = verify_target(&options("my-app", dir.path())).unwrap_err();
        assert!(matches!(err, Error::ApplicationAlreadyExists(_)));
    }

    #[test]
    fn force_bypasses_the_existing_directory_guard() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("my-app")).unwrap();

        let mut opts = options("my-app", dir.path());
        opts.force = true;
        assert!(verify_target(&opts).is_ok());
    }

    #[test]
    fn force_into_the_current_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(".", dir.path());
        opts.force = true;
        assert!(matches!(
            verify_target(&opts).unwrap_err(),
            Error::ForceIntoCurrentDirectory
        ));
    }

    #[test]
    fn installing_into_the_current_directory_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(verify_target(&options(".", dir.path())).is_ok());
    }

    #[test]
    fn app_url_is_rewritten_in_both_env_files() {
        let dir = tempfile::tempdir().unwrap();
        let fm = DiskFileManager;
        for file in [".env", ".env.example"] {
            std::fs::write(
                dir.path().join(file),
                "APP_NAME=Laravel\nAPP_URL=http://localhost\n",
            )
            .unwrap();
        }

        rewrite_app_url(&fm, dir.path(), "My-App").unwrap();

        for file in [".env", ".env.example"] {
            let contents = std::fs::read_to_string(dir.path().join(file)).unwrap();
            assert!(contents.contains("APP_URL=http://my-app.test"));
            assert!(!contents.contains("http://localhost"));
        }
    }

    #[test]
    fn app_url_rewrite_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let fm = DiskFileManager;
        for file in [".env", ".env.example"] {
            std::fs::write(dir.path().join(file), "APP_URL=http://localhost\n").unwrap();
        }

        rewrite_app_url(&fm, dir.path(), "my-app").unwrap();
        let first = std::fs::read_to_string(dir.path().join(".env")).unwrap();
        rewrite_app_url(&fm, dir.path(), "my-app").unwrap();
        let second = std::fs::read_to_string(dir.path().join(".env")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "APP_URL=http://my-app.test\n");
    }

    #[test]
    fn create_project_uses_the_default_skeleton() {
        let opts = options("my-app", Path::new("/work"));
        let commands = create_project_commands(&opts, "composer", "php");

        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[0].text(),
            "composer create-project laravel/laravel \"/work/my-app\" --remove-vcs --prefer-dist --no-scripts"
        );
        assert!(commands[1].text().contains("post-root-package-install"));
        assert!(commands[2].text().contains("key:generate"));
    }

    #[test]
    fn create_project_pins_the_dev_version() {
        let mut opts = options("my-app", Path::new("/work"));
        opts.version = Some("dev-master".to_string());
        let commands = create_project_commands(&opts, "composer", "php");
        assert!(commands[0]
            .text()
            .contains("\"/work/my-app\" \"dev-master\" --remove-vcs"));
    }

    #[test]
    fn create_project_substitutes_the_starter_kit() {
        let mut opts = options("my-app", Path::new("/work"));
        opts.starter_kit = Some("laravel/react-starter-kit".to_string());
        let commands = create_project_commands(&opts, "composer", "php");
        assert!(commands[0]
            .text()
            .starts_with("composer create-project laravel/react-starter-kit"));
    }

    #[test]
    fn force_over_an_existing_directory_deletes_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("my-app")).unwrap();
        let mut opts = options("my-app", dir.path());
        opts.force = true;

        let commands = create_project_commands(&opts, "composer", "php");
        assert_eq!(commands.len(), 4);
        assert!(commands[0].text().starts_with(if cfg!(windows) {
            "rd /s /q"
        } else {
            "rm -rf"
        }));
        assert!(!commands[0].supports_decoration_flags());
    }

    #[test]
    fn git_commands_are_flag_exempt_and_end_on_the_branch_rename() {
        let commands = git_init_commands("trunk");
        assert!(commands.iter().all(|c| !c.supports_decoration_flags()));
        assert_eq!(commands[0].text(), "git init -q");
        assert_eq!(commands.last().map(|c| c.text()), Some("git branch -M trunk"));
    }

    #[test]
    fn pest_swap_runs_the_exempt_init_binary() {
        let commands = pest_commands("composer", "php", false);
        let init = commands.last().unwrap();
        assert_eq!(init.text(), "php ./vendor/bin/pest --init");
        assert!(!init.supports_decoration_flags());
        assert!(commands[0].supports_decoration_flags());
    }

    #[test]
    fn pest_swap_commits_when_git_is_enabled() {
        let commands = pest_commands("composer", "php", true);
        assert_eq!(
            commands.last().map(|c| c.text()),
            Some("git commit -q -m \"Install Pest\"")
        );
    }

    #[test]
    fn resolved_directory_is_anchored_at_the_invocation_cwd() {
        let opts = options("my-app", Path::new("/work"));
        assert_eq!(opts.directory, PathBuf::from("/work/my-app"));
    }
}
