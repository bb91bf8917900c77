//! laravel CLI - scaffold new Laravel applications

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use installer_core::config_store::{ConfigStore, Defaults};
use installer_core::options::{global_default_branch, ApplicationOptions, NewInput};
use installer_core::prompts::{InteractivePrompter, NonInteractivePrompter, Prompter};
use installer_core::workflow::clone::CloneInput;
use installer_core::workflow::configure::ConfigureInput;
use installer_core::workflow::{artisan, clone, configure, docs, NewApplication};

#[derive(Parser, Debug)]
#[command(name = "laravel")]
#[command(about = "Create and manage new Laravel applications")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Laravel application
    New(NewArgs),
    /// Clone an existing Laravel repository and install its dependencies
    Clone(CloneArgs),
    /// Forward a command to the current project's artisan script
    Artisan(ArtisanArgs),
    /// Save default options for the new command
    Configure(ConfigureArgs),
    /// Open the Laravel documentation
    Docs(DocsArgs),
}

#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Name of the application directory
    pub name: String,

    /// Install the latest "development" release
    #[arg(long)]
    pub dev: bool,

    /// Initialize a Git repository
    #[arg(long)]
    pub git: bool,

    /// The branch that should be created for a new repository
    #[arg(long)]
    pub branch: Option<String>,

    /// Create a new repository on GitHub, optionally passing flags to `gh repo create`
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "--private")]
    pub github: Option<String>,

    /// The GitHub organization to create the new repository for
    #[arg(long)]
    pub organization: Option<String>,

    /// The database driver your application will use
    #[arg(long)]
    pub database: Option<String>,

    /// Install the React starter kit
    #[arg(long, conflicts_with_all = ["vue", "livewire"])]
    pub react: bool,

    /// Install the Vue starter kit
    #[arg(long, conflicts_with = "livewire")]
    pub vue: bool,

    /// Install the Livewire starter kit
    #[arg(long)]
    pub livewire: bool,

    /// Use a starter kit variant without authentication scaffolding
    #[arg(long = "no-authentication")]
    pub no_authentication: bool,

    /// Install the Pest testing framework
    #[arg(long, conflicts_with = "phpunit")]
    pub pest: bool,

    /// Keep the PHPUnit testing framework
    #[arg(long)]
    pub phpunit: bool,

    /// Install and build the frontend dependencies using npm
    #[arg(long, conflicts_with_all = ["pnpm", "yarn", "bun"])]
    pub npm: bool,

    /// Install and build the frontend dependencies using pnpm
    #[arg(long, conflicts_with_all = ["yarn", "bun"])]
    pub pnpm: bool,

    /// Install and build the frontend dependencies using yarn
    #[arg(long, conflicts_with = "bun")]
    pub yarn: bool,

    /// Install and build the frontend dependencies using bun
    #[arg(long)]
    pub bun: bool,

    /// Install using a custom community starter kit package
    #[arg(long)]
    pub using: Option<String>,

    /// Force install even if the directory already exists
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Suppress subprocess output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long = "no-ansi")]
    pub no_ansi: bool,

    /// Answer every prompt with its default
    #[arg(long = "no-interaction", short = 'n')]
    pub no_interaction: bool,
}

#[derive(Parser, Debug)]
pub struct CloneArgs {
    /// The repository URL to clone
    pub repository: String,

    /// The branch to clone instead of the default
    #[arg(long)]
    pub branch: Option<String>,

    /// The directory name to clone into
    #[arg(long)]
    pub dir: Option<String>,

    /// Suppress subprocess output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long = "no-ansi")]
    pub no_ansi: bool,
}

#[derive(Parser, Debug)]
pub struct ArtisanArgs {
    /// Arguments forwarded to artisan verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigureArgs {
    /// Initialize a Git repository by default
    #[arg(long)]
    pub git: bool,

    /// Default branch name for new repositories
    #[arg(long)]
    pub branch: Option<String>,

    /// Default GitHub organization for new repositories
    #[arg(long)]
    pub organization: Option<String>,

    /// Default starter kit package
    #[arg(long = "using")]
    pub using: Option<String>,

    /// Install the Pest testing framework by default
    #[arg(long)]
    pub pest: bool,

    /// Force install by default
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Default database driver
    #[arg(long)]
    pub database: Option<String>,

    /// Default JavaScript package manager
    #[arg(long = "package-manager")]
    pub package_manager: Option<String>,

    /// Clear all saved defaults
    #[arg(long)]
    pub reset: bool,
}

#[derive(Parser, Debug)]
pub struct DocsArgs {
    /// Documentation version to open
    pub version: Option<String>,
}

impl From<&NewArgs> for NewInput {
    fn from(args: &NewArgs) -> Self {
        NewInput {
            name: args.name.clone(),
            dev: args.dev,
            git: args.git,
            branch: args.branch.clone(),
            github: args.github.clone(),
            organization: args.organization.clone(),
            database: args.database.clone(),
            react: args.react,
            vue: args.vue,
            livewire: args.livewire,
            no_authentication: args.no_authentication,
            pest: args.pest,
            phpunit: args.phpunit,
            npm: args.npm,
            pnpm: args.pnpm,
            yarn: args.yarn,
            bun: args.bun,
            using: args.using.clone(),
            force: args.force,
            quiet: args.quiet,
            no_ansi: args.no_ansi,
            no_interaction: args.no_interaction,
        }
    }
}

impl From<&ConfigureArgs> for ConfigureInput {
    fn from(args: &ConfigureArgs) -> Self {
        ConfigureInput {
            git: args.git,
            branch: args.branch.clone(),
            organization: args.organization.clone(),
            starter_kit: args.using.clone(),
            pest: args.pest,
            force: args.force,
            database: args.database.clone(),
            package_manager: args.package_manager.clone(),
            reset: args.reset,
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    match &args.command {
        Command::New(new_args) => {
            let store = ConfigStore::from_home()?;
            let defaults = Defaults::load(&store);
            let input = NewInput::from(new_args);
            let cwd = std::env::current_dir()?;
            let options =
                ApplicationOptions::resolve(&input, &defaults, &cwd, &global_default_branch())?;

            let prompter: Box<dyn Prompter> = if options.interactive {
                Box::new(InteractivePrompter)
            } else {
                Box::new(NonInteractivePrompter)
            };

            NewApplication::new(options, prompter.as_ref()).run().await
        }
        Command::Clone(clone_args) => {
            let input = CloneInput {
                repository: clone_args.repository.clone(),
                branch: clone_args.branch.clone(),
                directory: clone_args.dir.clone(),
                quiet: clone_args.quiet,
                decorated: !clone_args.no_ansi,
            };
            clone::run(&input).await
        }
        Command::Artisan(artisan_args) => artisan::run(&artisan_args.arguments).await,
        Command::Configure(configure_args) => {
            let store = ConfigStore::from_home()?;
            configure::run(&store, &ConfigureInput::from(configure_args))
        }
        Command::Docs(docs_args) => docs::run(docs_args.version.as_deref()),
    }
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let result = run(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("{} {}", "Error:".red(), error);
            // Validation, precondition, and I/O failures all exit 1; clap
            // keeps its own convention (2) for argument parse errors.
            std::process::exit(1);
        }
    }
}
