use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::aot::Generator;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::CliError;

const BINARY_NAME: &str = "guava";

pub fn render_completions(shell: Shell) -> Vec<u8> {
    let mut command = Cli::command();
    let mut buffer = Vec::new();
    generate(shell, &mut command, BINARY_NAME, &mut buffer);
    buffer
}

/// A directory target receives the shell's conventional file name
/// (`guava.bash`, `_guava`, `guava.fish`, ...).
pub fn completion_target(shell: Shell, output_path: &Path) -> PathBuf {
    if output_path.is_dir() {
        output_path.join(shell.file_name(BINARY_NAME))
    } else {
        output_path.to_path_buf()
    }
}

pub fn run_completions(shell: Shell, output_path: Option<&Path>) -> Result<(), CliError> {
    let script = render_completions(shell);
    let Some(output_path) = output_path else {
        io::stdout().write_all(&script)?;
        return Ok(());
    };

    let target = completion_target(shell, output_path);
    std::fs::write(&target, &script)?;
    println!("{}", target.display());
    Ok(())
}
