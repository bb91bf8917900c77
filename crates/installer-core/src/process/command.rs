//! Structured command descriptors
//!
//! Whether a command tolerates `--no-ansi`/`--quiet` is decided where the
//! command is built, not guessed later from its text. Tools that reject the
//! flags (`chmod`, `rm`, `git`, `vendor/bin/pest`) are constructed with
//! `passthrough`.

/// One shell command in an orchestrated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
    supports_decoration_flags: bool,
}

impl CommandLine {
    /// A command that accepts the conventional `--no-ansi`/`--quiet` flags.
    pub fn shell(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            supports_decoration_flags: true,
        }
    }

    /// A command that must run exactly as written.
    pub fn passthrough(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            supports_decoration_flags: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn supports_decoration_flags(&self) -> bool {
        self.supports_decoration_flags
    }

    /// The final command text, with output-adaptation flags applied when the
    /// command supports them.
    pub fn rendered(&self, quiet: bool, decorated: bool) -> String {
        let mut text = self.text.clone();
        if self.supports_decoration_flags {
            if !decorated {
                text.push_str(" --no-ansi");
            }
            if quiet {
                text.push_str(" --quiet");
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decorated_non_quiet_output_leaves_commands_untouched() {
        let command = CommandLine::shell("composer install");
        assert_eq!(command.rendered(false, true), "composer install");
    }

    #[test]
    fn non_decorated_output_appends_no_ansi_to_supporting_commands_only() {
        let commands = [
            CommandLine::passthrough("chmod 755 x"),
            CommandLine::shell("composer install"),
        ];
        let rendered: Vec<String> = commands.iter().map(|c| c.rendered(false, false)).collect();
        assert_eq!(rendered[0], "chmod 755 x");
        assert_eq!(rendered[1], "composer install --no-ansi");
    }

    #[test]
    fn quiet_mode_appends_quiet_after_no_ansi() {
        let command = CommandLine::shell("composer install");
        assert_eq!(
            command.rendered(true, false),
            "composer install --no-ansi --quiet"
        );
    }

    #[test]
    fn git_commands_run_exactly_as_written() {
        let command = CommandLine::passthrough("git init -q");
        assert_eq!(command.rendered(true, false), "git init -q");
    }
}
