use crate::Cli;
use anyhow::{bail, Result};
use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use std::io;

const BIN_NAME: &str = "apptrust";

pub fn run(shell: String) -> Result<()> {
    let mut cmd = Cli::command();
    let mut out = io::stdout();
    match shell.as_str() {
        "bash" => generate(Bash, &mut cmd, BIN_NAME, &mut out),
        "zsh" => generate(Zsh, &mut cmd, BIN_NAME, &mut out),
        "fish" => generate(Fish, &mut cmd, BIN_NAME, &mut out),
        other => bail!("unsupported shell '{}', choose: bash, zsh, fish", other),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_shell() {
        let err = run("powershell".into()).unwrap_err();
        assert!(err.to_string().contains("unsupported shell 'powershell'"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
