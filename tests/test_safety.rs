use std::path::Path;

use patmut::safety;

#[test]
fn backup_path_is_hidden_and_suffixed() {
    let bak = safety::backup_path(Path::new("/tmp/project/app.js"));
    assert_eq!(bak, Path::new("/tmp/project/.app.js.patmut.bak"));
}

#[test]
fn check_interrupted_run_none_without_backup() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    std::fs::write(&source, "a + b").unwrap();
    assert!(safety::check_interrupted_run(&source).is_none());
}

#[test]
fn write_backup_then_check_finds_it() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    std::fs::write(&source, "a + b").unwrap();

    let bak = safety::write_backup(&source, "a + b").unwrap();
    assert!(bak.exists());
    assert_eq!(safety::check_interrupted_run(&source), Some(bak));
}

#[test]
fn restore_from_backup_recovers_and_cleans_up() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    std::fs::write(&source, "a - b").unwrap();
    let bak = safety::write_backup(&source, "a + b").unwrap();

    safety::restore_from_backup(&source, &bak).unwrap();
    assert_eq!(std::fs::read_to_string(&source).unwrap(), "a + b");
    assert!(!bak.exists());
}

#[test]
fn clear_backup_is_quiet_when_nothing_exists() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    safety::clear_backup(&source);
}

#[test]
fn run_file_leaves_no_backup_behind() {
    use patmut::composer::MutatedArtifact;
    use patmut::runner::{self, FileJob};

    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    std::fs::write(&source, "a + b\n").unwrap();

    let job = FileJob {
        source_path: source.clone(),
        original: "a + b\n".to_string(),
        artifacts: vec![MutatedArtifact {
            mutated_code: "a - b\n".to_string(),
            kind: None,
            output_path: None,
        }],
    };
    runner::run_file(&job, "true", 5000);

    assert!(safety::check_interrupted_run(&source).is_none());
    assert_eq!(std::fs::read_to_string(&source).unwrap(), "a + b\n");
}
