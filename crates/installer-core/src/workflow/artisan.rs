//! The `artisan` workflow: proxy to the nearest project's artisan script
//!
//! Walks up from the current directory until a directory containing an
//! `artisan` script is found and forwards the remaining arguments to it
//! verbatim. Artisan owns its own flags, so the forwarded command never
//! gets decoration flags appended.

use crate::process::{CommandLine, CommandRunner};
use crate::workflow::new_app::php_binary;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Forward `arguments` to the enclosing project's artisan script; returns
/// the process exit code.
pub async fn run(arguments: &[String]) -> Result<i32> {
    let cwd = std::env::current_dir()?;
    let Some(directory) = find_artisan_directory(&cwd) else {
        cliclack::log::error("No artisan script found in this directory or any parent.")?;
        return Ok(1);
    };

    let runner = CommandRunner::new(false, true);
    runner
        .run(&[artisan_command(arguments)], &directory, &[])
        .await
}

/// The nearest ancestor (starting at `start` itself) holding an `artisan`
/// script.
fn find_artisan_directory(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|path| path.join("artisan").is_file())
        .map(Path::to_path_buf)
}

fn artisan_command(arguments: &[String]) -> CommandLine {
    let mut line = format!("{} artisan", php_binary());
    for argument in arguments {
        line.push(' ');
        line.push_str(argument);
    }
    CommandLine::passthrough(line)
}
