use patmut::composer;
use patmut::line_range::LineRange;
use patmut::output;
use patmut::report;
use patmut::rules::RuleCatalog;
use patmut::runner;
use patmut::safety;
use patmut::state;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "patmut", version, about = "Pattern-based mutation testing for your test suite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate mutants and run the test command against each
    Run {
        /// Source files to mutate
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Test command to run against each mutant
        #[arg(short, long)]
        test_cmd: String,
        /// One artifact per mutation kind instead of one cumulative artifact
        #[arg(long)]
        isolated: bool,
        /// Comma-separated mutation kinds (default: all)
        #[arg(short, long)]
        kinds: Option<String>,
        /// Restrict mutation to a 1-indexed line span, e.g. 10:25
        #[arg(short, long)]
        lines: Option<String>,
        /// Annotate mutated lines with tracking comments
        #[arg(long)]
        track: bool,
        /// Also persist mutant files to this directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Timeout multiplier over the baseline test duration
        #[arg(long, default_value = "3")]
        timeout_mult: f64,
        /// Max source files tested concurrently
        #[arg(short, long, default_value = "4")]
        workers: usize,
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
        /// Exit code only, no output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Generate mutant files without running tests
    Generate {
        /// Source files to mutate
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// One artifact per mutation kind instead of one cumulative artifact
        #[arg(long)]
        isolated: bool,
        /// Comma-separated mutation kinds (default: all)
        #[arg(short, long)]
        kinds: Option<String>,
        /// Restrict mutation to a 1-indexed line span, e.g. 10:25
        #[arg(short, long)]
        lines: Option<String>,
        /// Annotate mutated lines with tracking comments
        #[arg(long)]
        track: bool,
        /// Directory for mutant files (default: next to each source file)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Summary of the last run
    Status {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Run {
            files,
            test_cmd,
            isolated,
            kinds,
            lines,
            track,
            out_dir,
            timeout_mult,
            workers,
            json,
            quiet,
        } => cmd_run(
            files, test_cmd, isolated, kinds, lines, track, out_dir, timeout_mult, workers, json,
            quiet,
        ),
        Commands::Generate {
            files,
            isolated,
            kinds,
            lines,
            track,
            out_dir,
            json,
        } => cmd_generate(files, isolated, kinds, lines, track, out_dir, json),
        Commands::Status { json } => cmd_status(json),
    };

    process::exit(exit_code);
}

fn parse_line_range(spec: &str) -> Result<LineRange, String> {
    let (start, end) = spec
        .split_once(':')
        .ok_or_else(|| format!("Expected START:END, got '{}'", spec))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| format!("Invalid start line '{}'", start))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|_| format!("Invalid end line '{}'", end))?;
    Ok(LineRange::new(start, end))
}

struct GenerateOptions {
    isolated: bool,
    kinds: Option<String>,
    lines: Option<String>,
    track: bool,
    out_dir: Option<PathBuf>,
}

/// Resolve CLI options into rules + range, or a usage-error message.
fn resolve_options(
    catalog: &RuleCatalog,
    opts: &GenerateOptions,
) -> Result<(Vec<patmut::rules::MutationRule>, Option<LineRange>), String> {
    let rules = match &opts.kinds {
        Some(spec) => {
            let kinds = patmut::parse_kinds(spec)
                .map_err(|bad| format!("Unknown mutation kind '{}'", bad))?;
            catalog.rules_for(&kinds)
        }
        None => catalog.rules().to_vec(),
    };
    let range = match &opts.lines {
        Some(spec) => Some(parse_line_range(spec)?),
        None => None,
    };
    Ok((rules, range))
}

/// Build per-file jobs, skipping unreadable files. Skips are reported in the
/// final summary, never fatal.
fn build_jobs(
    files: &[PathBuf],
    rules: &[patmut::rules::MutationRule],
    range: Option<LineRange>,
    track: bool,
    isolated: bool,
    out_dir: Option<&PathBuf>,
) -> (Vec<runner::FileJob>, Vec<String>) {
    let mut jobs = Vec::new();
    let mut failed_files = Vec::new();

    for file in files {
        let source = match std::fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                output::print_warning(&format!("Skipping {}: {}", file.display(), e));
                failed_files.push(format!("{}: {}", file.display(), e));
                continue;
            }
        };

        let artifacts = if isolated {
            composer::compose_isolated(
                &source,
                file,
                rules,
                range,
                track,
                out_dir.map(|p| p.as_path()),
            )
        } else {
            let output_path =
                out_dir.map(|dir| dir.join(composer::mutant_file_name(file, None)));
            composer::compose_cumulative(&source, rules, range, track, output_path.as_deref())
                .into_iter()
                .collect()
        };

        if artifacts.is_empty() {
            continue;
        }
        jobs.push(runner::FileJob {
            source_path: file.clone(),
            original: source,
            artifacts,
        });
    }

    (jobs, failed_files)
}

fn ensure_out_dir(out_dir: Option<&PathBuf>) -> Result<(), i32> {
    if let Some(dir) = out_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            output::print_error(&format!(
                "Cannot create output directory {}: {}",
                dir.display(),
                e
            ));
            return Err(3);
        }
    }
    Ok(())
}

fn cmd_run(
    files: Vec<PathBuf>,
    test_cmd: String,
    isolated: bool,
    kinds: Option<String>,
    lines: Option<String>,
    track: bool,
    out_dir: Option<PathBuf>,
    timeout_mult: f64,
    workers: usize,
    json_mode: bool,
    quiet: bool,
) -> i32 {
    let catalog = RuleCatalog::standard();
    let opts = GenerateOptions { isolated, kinds, lines, track, out_dir };
    let (rules, range) = match resolve_options(&catalog, &opts) {
        Ok(r) => r,
        Err(msg) => {
            output::print_error(&msg);
            return 2;
        }
    };
    if let Err(code) = ensure_out_dir(opts.out_dir.as_ref()) {
        return code;
    }

    // Recover any file a previously interrupted run left mutated in place.
    for file in &files {
        if let Some(bak) = safety::check_interrupted_run(file) {
            match safety::restore_from_backup(file, &bak) {
                Ok(()) => output::print_warning(&format!(
                    "Recovered {} from a previously interrupted run",
                    file.display()
                )),
                Err(e) => {
                    output::print_error(&format!(
                        "Found backup {} but could not restore it: {}",
                        bak.display(),
                        e
                    ));
                    return 3;
                }
            }
        }
    }

    let (jobs, failed_files) = build_jobs(
        &files,
        &rules,
        range,
        opts.track,
        opts.isolated,
        opts.out_dir.as_ref(),
    );

    if jobs.is_empty() {
        let report = report::aggregate_with_failures(Vec::new(), failed_files);
        state::save_last_run(&report);
        if !quiet {
            if json_mode {
                println!("{}", serde_json::to_string(&report).unwrap());
            } else {
                output::print_success("No mutable code found.");
            }
        }
        return 0;
    }

    let baseline = runner::run_baseline(&test_cmd);
    let timeout_ms = match baseline {
        runner::BaselineResult::Failed(detail) => {
            output::print_error(&format!(
                "Tests fail before mutation. Fix failing tests first.\n{}",
                detail
            ));
            return 3;
        }
        runner::BaselineResult::Ok { duration_ms } => {
            (duration_ms as f64 * timeout_mult) as u64 + 2000
        }
    };

    let results = runner::run_all(&jobs, &test_cmd, timeout_ms, workers);
    let report = report::aggregate_with_failures(results, failed_files);
    state::save_last_run(&report);

    if quiet {
        return if report.survived_count > 0 { 1 } else { 0 };
    }
    if json_mode {
        println!("{}", serde_json::to_string(&report).unwrap());
    } else {
        output::print_report(&report);
    }

    if report.survived_count > 0 { 1 } else { 0 }
}

fn cmd_generate(
    files: Vec<PathBuf>,
    isolated: bool,
    kinds: Option<String>,
    lines: Option<String>,
    track: bool,
    out_dir: Option<PathBuf>,
    json_mode: bool,
) -> i32 {
    let catalog = RuleCatalog::standard();
    let opts = GenerateOptions { isolated, kinds, lines, track, out_dir };
    let (rules, range) = match resolve_options(&catalog, &opts) {
        Ok(r) => r,
        Err(msg) => {
            output::print_error(&msg);
            return 2;
        }
    };
    if let Err(code) = ensure_out_dir(opts.out_dir.as_ref()) {
        return code;
    }

    let mut written: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for file in &files {
        let source = match std::fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                output::print_warning(&format!("Skipping {}: {}", file.display(), e));
                skipped += 1;
                continue;
            }
        };
        // Default to writing next to the source file.
        let parent = file.parent().map(|p| p.to_path_buf()).unwrap_or_default();
        let dir = opts.out_dir.clone().unwrap_or(parent);

        let artifacts = if opts.isolated {
            composer::compose_isolated(&source, file, &rules, range, opts.track, Some(dir.as_path()))
        } else {
            let output_path = dir.join(composer::mutant_file_name(file, None));
            composer::compose_cumulative(&source, &rules, range, opts.track, Some(output_path.as_path()))
                .into_iter()
                .collect()
        };
        for artifact in &artifacts {
            if let Some(path) = &artifact.output_path {
                written.push(path.display().to_string());
            }
        }
    }

    if json_mode {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "written": written,
                "skipped": skipped,
            }))
            .unwrap()
        );
    } else if written.is_empty() {
        output::print_success("No mutable code found.");
    } else {
        for path in &written {
            output::print_success(&format!("Wrote {}", path));
        }
    }
    0
}

fn cmd_status(json_mode: bool) -> i32 {
    match state::load_last_run() {
        Some(report) => {
            if json_mode {
                println!("{}", serde_json::to_string(&report).unwrap());
            } else {
                output::print_status(&report);
            }
            0
        }
        None => {
            output::print_error("No previous run found. Run `patmut run` first.");
            2
        }
    }
}
