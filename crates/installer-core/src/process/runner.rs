//! Blocking execution of command sequences with streamed output
//!
//! Commands are joined with ` && ` into a single shell invocation, so a later
//! command never runs after an earlier one fails. Output is surfaced to the
//! caller's sink line-by-line as it is produced on either stream.

use super::command::CommandLine;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Runs ordered command sequences in an explicit working directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    quiet: bool,
    decorated: bool,
}

impl CommandRunner {
    pub fn new(quiet: bool, decorated: bool) -> Self {
        Self { quiet, decorated }
    }

    /// Run the sequence, echoing output to the terminal.
    pub async fn run(
        &self,
        commands: &[CommandLine],
        directory: &Path,
        env: &[(&str, &str)],
    ) -> Result<i32> {
        let quiet = self.quiet;
        self.run_with(commands, directory, env, |line| {
            if !quiet {
                println!("{}", line);
            }
        })
        .await
    }

    /// Run the sequence, handing each output line to `sink`.
    ///
    /// Returns the exit code of the shell invocation, which under ` && `
    /// joining is the exit code of the first failing command (or the last on
    /// full success).
    pub async fn run_with(
        &self,
        commands: &[CommandLine],
        directory: &Path,
        env: &[(&str, &str)],
        mut sink: impl FnMut(&str),
    ) -> Result<i32> {
        let script = commands
            .iter()
            .map(|command| command.rendered(self.quiet, self.decorated))
            .collect::<Vec<_>>()
            .join(" && ");

        let mut command = shell_command(&script);
        command
            .current_dir(directory)
            .stdin(interactive_stdin())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in env {
            command.env(key, value);
        }

        let mut child = command
            .spawn()
            .with_context(|| format!("Failed to start shell for: {}", script))?;

        let stdout = child.stdout.take().context("Failed to capture stdout")?;
        let stderr = child.stderr.take().context("Failed to capture stderr")?;

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();
        let mut stdout_done = false;
        let mut stderr_done = false;

        while !(stdout_done && stderr_done) {
            tokio::select! {
                line = stdout_lines.next_line(), if !stdout_done => {
                    match line {
                        Ok(Some(line)) => sink(&line),
                        Ok(None) => stdout_done = true,
                        Err(_) => stdout_done = true,
                    }
                }
                line = stderr_lines.next_line(), if !stderr_done => {
                    match line {
                        Ok(Some(line)) => sink(&line),
                        Ok(None) => stderr_done = true,
                        Err(_) => stderr_done = true,
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for: {}", script))?;

        Ok(status.code().unwrap_or(1))
    }
}

fn shell_command(script: &str) -> TokioCommand {
    if cfg!(windows) {
        let mut command = TokioCommand::new("cmd");
        command.arg("/C").arg(script);
        command
    } else {
        let mut command = TokioCommand::new("sh");
        command.arg("-c").arg(script);
        command
    }
}

/// Hand the child the controlling terminal when one is available so tools
/// that prompt or colorize based on a TTY keep working. Failure to open the
/// device is never fatal.
fn interactive_stdin() -> Stdio {
    if cfg!(windows) {
        return Stdio::inherit();
    }

    let tty = Path::new("/dev/tty");
    if !tty.exists() {
        return Stdio::inherit();
    }

    match std::fs::File::open(tty) {
        Ok(file) => Stdio::from(file),
        Err(e) => {
            eprintln!(
                "{} failed to attach terminal, continuing without one: {}",
                "Warning:".yellow(),
                e
            );
            Stdio::inherit()
        }
    }
}
