use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::composer::MutatedArtifact;
use crate::rules::MutationKind;

/// Output fragments that mark a failing test run even when the runner exits
/// zero (some runners report failures on stdout without a failing status).
const FAILURE_SIGNATURES: &[&str] = &[
    "FAILED",
    "FAILURES",
    "assertion failed",
    "AssertionError",
    "panicked at",
];

pub enum BaselineResult {
    Ok { duration_ms: u64 },
    Failed(String),
}

/// Terminal state of one mutant's test run. A mutant starts Pending, enters
/// Running when the test process spawns, and ends here. Errored (spawn
/// failure or timeout) is never folded into Detected or Survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutantOutcome {
    Detected,
    Survived,
    Errored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationTestResult {
    pub kind: Option<MutationKind>,
    pub outcome: MutantOutcome,
    pub test_output: String,
    pub mutant_file: Option<String>,
    pub diff: String,
    pub duration_ms: u64,
}

impl MutationTestResult {
    /// Tests passing against a mutant means the mutant survived.
    pub fn test_passed(&self) -> bool {
        self.outcome == MutantOutcome::Survived
    }
}

/// All mutants generated from one original source file. Tested strictly
/// sequentially, since they share the file's in-place swap slot.
pub struct FileJob {
    pub source_path: PathBuf,
    pub original: String,
    pub artifacts: Vec<MutatedArtifact>,
}

/// Writes the original contents back over the swapped file when dropped, so
/// restoration happens on every exit path, including panic and timeout.
struct RestoreGuard<'a> {
    path: &'a Path,
    original: &'a str,
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        let _ = std::fs::write(self.path, self.original);
    }
}

pub fn parse_test_cmd(cmd: &str) -> (String, Vec<String>) {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    if parts.len() > 1 {
        (parts[0].to_string(), parts[1..].iter().map(|s| s.to_string()).collect())
    } else {
        (cmd.to_string(), vec![])
    }
}

fn has_failure_signature(output: &str) -> bool {
    FAILURE_SIGNATURES.iter().any(|sig| output.contains(sig))
}

/// Run the test command once against the unmutated sources. A failing
/// baseline means mutation results would be meaningless.
pub fn run_baseline(test_cmd: &str) -> BaselineResult {
    let start = Instant::now();
    let (program, args) = parse_test_cmd(test_cmd);
    let output = Command::new(&program).args(&args).output();

    match output {
        Ok(o) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            if o.status.success() {
                BaselineResult::Ok { duration_ms }
            } else {
                let stdout = String::from_utf8_lossy(&o.stdout).to_string();
                let stderr = String::from_utf8_lossy(&o.stderr).to_string();
                BaselineResult::Failed(format!("{}\n{}", stdout, stderr))
            }
        }
        Err(e) => BaselineResult::Failed(format!("Failed to run {}: {}", test_cmd, e)),
    }
}

/// Swap one mutant into place, run the test command, classify, restore.
pub fn run_mutant(
    source_path: &Path,
    original: &str,
    artifact: &MutatedArtifact,
    test_cmd: &str,
    timeout_ms: u64,
) -> MutationTestResult {
    let mutant_file = artifact
        .output_path
        .as_ref()
        .map(|p| p.display().to_string());
    let diff = generate_diff(original, &artifact.mutated_code);

    if let Err(e) = std::fs::write(source_path, &artifact.mutated_code) {
        return MutationTestResult {
            kind: artifact.kind,
            outcome: MutantOutcome::Errored,
            test_output: format!("Could not swap mutant into place: {}", e),
            mutant_file,
            diff,
            duration_ms: 0,
        };
    }
    let _guard = RestoreGuard { path: source_path, original };

    let start = Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let (program, args) = parse_test_cmd(test_cmd);
    let child = Command::new(&program)
        .args(&args)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn();

    let mut child = match child {
        Ok(c) => c,
        Err(e) => {
            return MutationTestResult {
                kind: artifact.kind,
                outcome: MutantOutcome::Errored,
                test_output: format!("Failed to spawn {}: {}", test_cmd, e),
                mutant_file,
                diff,
                duration_ms: start.elapsed().as_millis() as u64,
            };
        }
    };

    let (outcome, test_output) = loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let mut output = String::new();
                if let Some(mut out) = child.stdout.take() {
                    let _ = std::io::Read::read_to_string(&mut out, &mut output);
                }
                if let Some(mut err) = child.stderr.take() {
                    let _ = std::io::Read::read_to_string(&mut err, &mut output);
                }
                if status.success() && !has_failure_signature(&output) {
                    break (MutantOutcome::Survived, output);
                }
                break (MutantOutcome::Detected, output);
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    break (
                        MutantOutcome::Errored,
                        format!("Test run exceeded {} ms and was killed", timeout_ms),
                    );
                }
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
            Err(e) => break (MutantOutcome::Errored, format!("Wait failed: {}", e)),
        }
    };

    MutationTestResult {
        kind: artifact.kind,
        outcome,
        test_output,
        mutant_file,
        diff,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

pub fn generate_diff(original: &str, mutated: &str) -> String {
    use similar::TextDiff;
    let diff = TextDiff::from_lines(original, mutated);
    let mut output = String::new();
    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                output.push_str(&format!("- {}", change));
            }
            similar::ChangeTag::Insert => {
                output.push_str(&format!("+ {}", change));
            }
            _ => {}
        }
    }
    output
}

/// Test every mutant of one file, in order, restoring the original between
/// mutants. A backup of the pristine contents sits on disk for the whole
/// pass, so even a killed process leaves enough behind to recover from.
pub fn run_file(job: &FileJob, test_cmd: &str, timeout_ms: u64) -> Vec<MutationTestResult> {
    if let Err(e) = crate::safety::write_backup(&job.source_path, &job.original) {
        crate::output::print_warning(&format!(
            "Could not write backup for {}: {}",
            job.source_path.display(),
            e
        ));
    }
    let results = job
        .artifacts
        .iter()
        .map(|a| run_mutant(&job.source_path, &job.original, a, test_cmd, timeout_ms))
        .collect();
    crate::safety::clear_backup(&job.source_path);
    results
}

/// Run all file jobs. Files run concurrently on a fixed pool of `workers`
/// threads; mutants within one file stay serialized on whichever worker
/// picked the file up.
pub fn run_all(
    jobs: &[FileJob],
    test_cmd: &str,
    timeout_ms: u64,
    workers: usize,
) -> Vec<MutationTestResult> {
    let workers = workers.clamp(1, jobs.len().max(1));
    let next = AtomicUsize::new(0);
    let results: Mutex<Vec<MutationTestResult>> = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    let i = next.fetch_add(1, Ordering::SeqCst);
                    let Some(job) = jobs.get(i) else { break };
                    let file_results = run_file(job, test_cmd, timeout_ms);
                    results
                        .lock()
                        .expect("result collection poisoned")
                        .extend(file_results);
                }
            });
        }
    });

    results.into_inner().expect("result collection poisoned")
}
