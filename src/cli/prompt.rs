use crate::utils::resolve_root;
use anyhow::{Context, Result};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Exit status for a run the user aborted
pub const CANCELLED_EXIT_CODE: i32 = 130;

/// The user aborted at a prompt
#[derive(Debug)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operation cancelled by user.")
    }
}

impl std::error::Error for Cancelled {}

/// Print the final cancellation message
pub fn report_cancelled<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "\n{}", Cancelled)?;
    output.flush()
}

/// Exit with the cancellation message on Ctrl-C instead of being killed.
///
/// Can only be installed once per process.
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        let _ = report_cancelled(&mut io::stdout());
        std::process::exit(CANCELLED_EXIT_CODE);
    })
    .context("Failed to install Ctrl-C handler")
}

/// Print `prompt` and read one trimmed line. End of input is `Cancelled`.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read input")?;

    if read == 0 {
        return Err(Cancelled.into());
    }

    Ok(line.trim().to_string())
}

/// Ask which drive or directory to scan
pub fn ask_root<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default: &Path,
) -> Result<PathBuf> {
    let answer = prompt_line(
        input,
        output,
        &format!(
            "Enter drive letter (e.g. D) or full path (default: {}): ",
            default.display()
        ),
    )?;

    Ok(resolve_root(&answer, default))
}

/// Ask a yes/no question; only `y` counts as yes
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<bool> {
    let answer = prompt_line(input, output, &format!("\n{} (y/n): ", prompt))?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
