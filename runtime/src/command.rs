//! Blocking external commands.

use super::errors::*;
use std::process::Command;

/// Joins an argument vector the way it would be typed.
pub fn display(args: &[String]) -> String {
    args.join(" ")
}

/// Runs `args[0]` with the remaining arguments and returns its stdout. Any
/// stderr output is passed on to the operator. A non-zero exit is an error.
pub fn run(args: &[String]) -> Result<String> {
    let line = display(args);
    let (program, rest) = match args.split_first() {
        Some(split) => split,
        None => bail!(ErrorKind::CommandFailed(line, "empty command".to_string())),
    };

    info!(" > {}", line);
    let output = Command::new(program)
        .args(rest)
        .output()
        .chain_err(|| format!("failed to spawn `{}`", line))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        warn!("{}", stderr.trim_end());
    }

    if !output.status.success() {
        bail!(ErrorKind::CommandFailed(line, output.status.to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
