//! Prompt abstraction for the workflows
//!
//! Workflow code talks to one `Prompter` interface; which implementation it
//! gets is decided once, from configuration (`--no-interaction`, `--quiet`),
//! not by sniffing the environment at each call site. The interactive
//! implementation is cliclack-backed; the non-interactive one answers with
//! the supplied defaults.

use anyhow::Result;

/// One selectable item: machine value plus human label.
#[derive(Debug, Clone, Copy)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

pub trait Prompter {
    fn confirm(&self, label: &str, default: bool) -> Result<bool>;

    fn select(&self, label: &str, choices: &[Choice], default: &str) -> Result<String>;
}

/// Charm-style prompts on the terminal.
pub struct InteractivePrompter;

impl Prompter for InteractivePrompter {
    fn confirm(&self, label: &str, default: bool) -> Result<bool> {
        Ok(cliclack::confirm(label).initial_value(default).interact()?)
    }

    fn select(&self, label: &str, choices: &[Choice], default: &str) -> Result<String> {
        let mut prompt = cliclack::select(label).initial_value(default);
        for choice in choices {
            prompt = prompt.item(choice.value, choice.label, "");
        }
        Ok(prompt.interact()?.to_string())
    }
}

/// CI / scripted path: answers every prompt with its default.
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn confirm(&self, _label: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&self, _label: &str, _choices: &[Choice], default: &str) -> Result<String> {
        Ok(default.to_string())
    }
}
