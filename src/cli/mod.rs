mod prompt;

pub use prompt::{
    ask_root, confirm, install_interrupt_handler, is_yes, report_cancelled, Cancelled,
    CANCELLED_EXIT_CODE,
};

use crate::cleaner::{CleanOptions, CleanResult};
use crate::scanner::{ScanError, ScanErrorKind, ScanReport, SizeCalculator, Target, TargetKind};
use crate::stats::Statistics;
use crate::utils::{absolutize, format_size};
use crate::{Cleaner, Config, Scanner};
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "venv-cleaner")]
#[command(
    version,
    about = "Find and delete Python venv and __pycache__ directories",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report venv and __pycache__ directories without deleting anything
    Scan {
        /// Drive or directory to scan (prompted for when omitted)
        path: Option<PathBuf>,

        /// Maximum scan depth
        #[arg(short, long)]
        depth: Option<usize>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report, confirm, then delete venv and __pycache__ directories
    Clean {
        /// Drive or directory to scan (prompted for when omitted)
        path: Option<PathBuf>,

        /// Maximum scan depth
        #[arg(short, long)]
        depth: Option<usize>,

        /// Dry run - don't actually delete
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate default config file
    InitConfig {
        /// Output path for config file
        path: Option<PathBuf>,
    },
}

/// Settings for one `clean` run
#[derive(Debug, Clone, Default)]
pub struct CleanArgs {
    pub depth: Option<usize>,
    pub dry_run: bool,
    pub yes: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = if let Some(config_path) = &self.config {
            Config::load(config_path)?
        } else {
            Config::load_or_default(Config::default_path())?
        };

        let stdin = io::stdin();
        let mut input = stdin.lock();

        let command = self.command.unwrap_or(Commands::Clean {
            path: None,
            depth: None,
            dry_run: false,
            yes: false,
        });

        match command {
            Commands::Scan { path, depth, json } => {
                // Keep stdout clean for the JSON document.
                let root = if json {
                    resolve_path(path, &config, &mut input, &mut io::stderr())?
                } else {
                    resolve_path(path, &config, &mut input, &mut io::stdout())?
                };
                run_scan(&root, depth, json, &config)?;
            }
            Commands::Clean {
                path,
                depth,
                dry_run,
                yes,
            } => {
                let mut output = io::stdout();
                let root = resolve_path(path, &config, &mut input, &mut output)?;
                let args = CleanArgs {
                    depth,
                    dry_run,
                    yes,
                };
                run_clean(&root, &args, &config, &mut input, &mut output)?;
            }
            Commands::InitConfig { path } => {
                init_config(path)?;
            }
        }

        Ok(())
    }
}

fn resolve_path<R: BufRead, W: Write>(
    path: Option<PathBuf>,
    config: &Config,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    let root = match path {
        Some(path) => path,
        None => ask_root(input, output, &config.default_root())?,
    };
    absolutize(&root)
}

/// Walk `root` and measure every match
pub fn scan_root(
    root: &Path,
    depth: Option<usize>,
    config: &Config,
    quiet: bool,
) -> Result<ScanReport> {
    if !quiet {
        println!(
            "{}",
            format!(
                "Scanning {} for venv and __pycache__ folders...",
                root.display()
            )
            .cyan()
            .bold()
        );
    }

    let mut scanner = Scanner::from_config(root, config);
    if let Some(depth) = depth {
        scanner = scanner.max_depth(depth);
    }
    let mut report = scanner.scan()?;

    if report.is_empty() {
        return Ok(report);
    }

    if !quiet {
        println!("\nCalculating total size...");
    }

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(report.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    SizeCalculator::new().measure(report.targets_mut(), |target| {
        pb.set_message(target.path.display().to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    Ok(report)
}

fn run_scan(root: &Path, depth: Option<usize>, json_output: bool, config: &Config) -> Result<()> {
    let report = scan_root(root, depth, config, json_output)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&JsonReport::new(&report))?);
        return Ok(());
    }

    if report.is_empty() {
        print_nothing_found(&report);
        return Ok(());
    }

    display_report(&report);
    Ok(())
}

/// Scan, report, confirm and delete.
///
/// Returns `None` when nothing was found or the user declined.
pub fn run_clean<R: BufRead, W: Write>(
    root: &Path,
    args: &CleanArgs,
    config: &Config,
    input: &mut R,
    output: &mut W,
) -> Result<Option<CleanResult>> {
    let report = scan_root(root, args.depth, config, false)?;

    if report.is_empty() {
        print_nothing_found(&report);
        return Ok(None);
    }

    display_report(&report);

    let prompt = if args.dry_run {
        "Do you want to simulate deleting these folders?"
    } else {
        "Do you want to delete these folders?"
    };
    if !args.yes && !confirm(input, output, prompt)? {
        println!("\n{}", "Operation cancelled.".yellow());
        return Ok(None);
    }

    let targets = report.into_targets();
    println!(
        "\nFound {} folders to delete",
        targets.len().to_string().green().bold()
    );

    let cleaner = Cleaner::with_options(CleanOptions {
        dry_run: args.dry_run,
        quiet: false,
    });
    let result = cleaner.clean_multiple(&targets);

    print_clean_summary(&result, args.dry_run);

    if !args.dry_run {
        if let Ok(free) = fs2::available_space(root) {
            println!("  Free space on {}: {}", root.display(), format_size(free).cyan());
        }
    }

    Ok(Some(result))
}

fn print_nothing_found(report: &ScanReport) {
    print_scan_errors(&report.errors);
    println!(
        "{}",
        format!(
            "No venv or __pycache__ folders found in {}!",
            report.root.display()
        )
        .yellow()
    );
}

fn display_report(report: &ScanReport) {
    println!("\n{}", "Found the following folders:".cyan().bold());
    for target in report.targets() {
        println!("{}", target_line(target));
    }

    print_scan_errors(&report.errors);

    println!();
    Statistics::from_report(report).display_terminal();

    println!(
        "\n{} {}",
        "Total size:".bold(),
        format_size(report.total_size()).green().bold()
    );
}

fn target_line(target: &Target) -> String {
    let size = match target.size {
        Some(_) => target.size_human().green(),
        None => target.size_human().red(),
    };

    format!(
        "- {} ({}) {}",
        target.path.display(),
        size,
        colored_tag(target.kind)
    )
}

fn colored_tag(kind: TargetKind) -> ColoredString {
    format!("[{}]", kind.tag()).color(kind.color())
}

fn print_scan_errors(errors: &[ScanError]) {
    if errors.is_empty() {
        return;
    }

    println!();
    for error in errors {
        let line = match error.kind {
            ScanErrorKind::PermissionDenied => {
                format!("Permission error accessing some directories: {}", error.message)
            }
            ScanErrorKind::Other => format!("Error during scanning: {}", error.message),
        };
        println!("{}", line.yellow());
    }
}

fn print_clean_summary(result: &CleanResult, dry_run: bool) {
    if dry_run {
        println!("\n{}", "Dry run complete!".green().bold());
    } else {
        println!("\n{}", "Deletion complete!".green().bold());
    }
    println!("  Cleaned: {}", result.cleaned_count.to_string().green());
    println!("  Failed: {}", result.failed_count.to_string().red());
    println!(
        "  {}: {}",
        if dry_run { "Space that would be freed" } else { "Space freed" },
        result.size_freed_human().green().bold()
    );
}

fn init_config(path: Option<PathBuf>) -> Result<()> {
    let config_path = path.unwrap_or_else(Config::default_path);

    Config::default().save(&config_path)?;

    println!(
        "{} {}",
        "Config file created:".green().bold(),
        config_path.display()
    );

    Ok(())
}

/// Machine-readable scan report
#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    targets: Vec<&'a Target>,
    statistics: Statistics,
    total_size: u64,
    total_size_human: String,
    errors: &'a [ScanError],
}

impl<'a> JsonReport<'a> {
    fn new(report: &'a ScanReport) -> Self {
        Self {
            root: &report.root,
            targets: report.targets().collect(),
            statistics: Statistics::from_report(report),
            total_size: report.total_size(),
            total_size_human: format_size(report.total_size()),
            errors: &report.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// `proj/venv` holding 10 MB and `proj/__pycache__` holding 2 KB
    fn sample_project() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let proj = temp.path().join("proj");

        let venv = proj.join("venv");
        fs::create_dir_all(venv.join("lib")).unwrap();
        fs::write(venv.join("lib").join("big.so"), vec![0u8; 10 * 1024 * 1024]).unwrap();

        let pycache = proj.join("__pycache__");
        fs::create_dir_all(&pycache).unwrap();
        fs::write(pycache.join("mod.cpython-312.pyc"), vec![0u8; 2048]).unwrap();

        (temp, venv, pycache)
    }

    fn test_config() -> Config {
        Config {
            exclude_dirs: Vec::new(),
            ..Default::default()
        }
    }

    #[test]
    fn report_lists_both_targets_with_sizes() {
        let (temp, venv, pycache) = sample_project();

        let report = scan_root(temp.path(), None, &test_config(), true).unwrap();

        assert_eq!(report.venvs.len(), 1);
        assert_eq!(report.pycaches.len(), 1);
        assert_eq!(report.venvs[0].path, venv);
        assert_eq!(report.pycaches[0].path, pycache);
        assert_eq!(report.venvs[0].size_human(), "10.00 MB");
        assert_eq!(report.pycaches[0].size_human(), "2.00 KB");
        assert_eq!(report.total_size(), 10 * 1024 * 1024 + 2048);
        assert_eq!(format_size(report.total_size()), "10.00 MB");

        let line = target_line(&report.pycaches[0]);
        assert!(line.contains("__pycache__"));
        assert!(line.contains("[pycache]"));
    }

    #[test]
    fn declining_keeps_directories() {
        let (temp, venv, pycache) = sample_project();
        let mut output = Vec::new();

        let result = run_clean(
            temp.path(),
            &CleanArgs::default(),
            &test_config(),
            &mut Cursor::new("n\n"),
            &mut output,
        )
        .unwrap();

        assert!(result.is_none());
        assert!(venv.exists());
        assert!(pycache.exists());
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("Do you want to delete these folders? (y/n): "));
    }

    #[test]
    fn only_y_confirms_deletion() {
        for answer in ["yes\n", "Yes\n", "\n", "no\n", "1\n"] {
            let (temp, venv, pycache) = sample_project();
            let result = run_clean(
                temp.path(),
                &CleanArgs::default(),
                &test_config(),
                &mut Cursor::new(answer),
                &mut Vec::new(),
            )
            .unwrap();

            assert!(result.is_none(), "answer {:?} deleted folders", answer);
            assert!(venv.exists());
            assert!(pycache.exists());
        }
    }

    #[test]
    fn confirming_deletes_each_target_once() {
        let (temp, venv, pycache) = sample_project();

        let result = run_clean(
            temp.path(),
            &CleanArgs::default(),
            &test_config(),
            &mut Cursor::new("Y\n"),
            &mut Vec::new(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.cleaned_count, 2);
        assert_eq!(result.bytes_freed, 10 * 1024 * 1024 + 2048);
        assert!(!venv.exists());
        assert!(!pycache.exists());
        assert!(temp.path().join("proj").exists());
    }

    #[test]
    fn yes_flag_skips_prompt_and_dry_run_keeps_files() {
        let (temp, venv, pycache) = sample_project();
        let mut output = Vec::new();

        let args = CleanArgs {
            dry_run: true,
            yes: true,
            ..Default::default()
        };
        let result = run_clean(
            temp.path(),
            &args,
            &test_config(),
            &mut Cursor::new(""),
            &mut output,
        )
        .unwrap()
        .unwrap();

        assert!(output.is_empty());
        assert_eq!(result.outcomes.len(), 2);
        assert!(venv.exists());
        assert!(pycache.exists());
    }

    #[test]
    fn end_of_input_cancels_without_deleting() {
        let (temp, venv, _) = sample_project();

        let err = run_clean(
            temp.path(),
            &CleanArgs::default(),
            &test_config(),
            &mut Cursor::new(""),
            &mut Vec::new(),
        )
        .unwrap_err();

        assert!(err.is::<Cancelled>());
        assert!(venv.exists());
    }

    #[test]
    fn nothing_found_returns_none() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();

        let result = run_clean(
            temp.path(),
            &CleanArgs::default(),
            &test_config(),
            &mut Cursor::new("y\n"),
            &mut Vec::new(),
        )
        .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn resolve_path_prefers_argument() {
        let temp = TempDir::new().unwrap();
        let mut output = Vec::new();
        let root = resolve_path(
            Some(temp.path().to_path_buf()),
            &test_config(),
            &mut Cursor::new(""),
            &mut output,
        )
        .unwrap();

        assert_eq!(root, temp.path());
        assert!(output.is_empty());
    }

    #[test]
    fn resolve_path_prompts_with_config_default() {
        let config = Config {
            default_path: Some(PathBuf::from("/srv/projects")),
            ..Default::default()
        };
        let root = resolve_path(None, &config, &mut Cursor::new("\n"), &mut Vec::new()).unwrap();
        assert!(root.ends_with("srv/projects"));
        assert!(root.is_absolute());
    }

    #[test]
    fn json_report_shape() {
        let (temp, _, _) = sample_project();
        let report = scan_root(temp.path(), None, &test_config(), true).unwrap();

        let json = serde_json::to_value(JsonReport::new(&report)).unwrap();
        assert_eq!(json["targets"].as_array().unwrap().len(), 2);
        assert_eq!(json["targets"][0]["kind"], "venv");
        assert_eq!(json["total_size"], 10 * 1024 * 1024 + 2048);
        assert_eq!(json["total_size_human"], "10.00 MB");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["venv-cleaner", "clean", "/tmp", "--dry-run", "-y"]).unwrap();
        match cli.command {
            Some(Commands::Clean {
                path, dry_run, yes, ..
            }) => {
                assert_eq!(path, Some(PathBuf::from("/tmp")));
                assert!(dry_run);
                assert!(yes);
            }
            _ => panic!("expected clean command"),
        }

        let cli = Cli::try_parse_from(["venv-cleaner", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
