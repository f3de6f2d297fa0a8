//! Shell completion scripts.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::StudyError;

const BIN_NAME: &str = "studyctl";

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns `StudyError::Validation` if the generated script is not UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, StudyError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).map_err(|e| StudyError::Validation(format!("UTF-8 error: {e}")))
}

/// Where to put the completion script for `shell`.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(studyctl completions bash)

# Or save to a file:
studyctl completions bash > ~/.local/share/bash-completion/completions/studyctl
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
studyctl completions zsh > ~/.zsh/completions/_studyctl
# Then add to ~/.zshrc (before compinit):
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit
"
        .to_string(),

        Shell::Fish => r"# Save to the fish completions directory:
studyctl completions fish > ~/.config/fish/completions/studyctl.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
studyctl completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to the elvish lib directory:
studyctl completions elvish > ~/.config/elvish/lib/studyctl.elv
# Then add to rc.elv:
use studyctl
"
        .to_string(),

        _ => format!("Write the output of 'studyctl completions {shell}' where your shell loads completions.\n"),
    }
}
