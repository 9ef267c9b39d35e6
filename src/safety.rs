use std::path::{Path, PathBuf};

pub fn backup_path(source_file: &Path) -> PathBuf {
    let mut backup = source_file.to_path_buf();
    let name = format!(
        ".{}.patmut.bak",
        source_file.file_name().unwrap_or_default().to_string_lossy()
    );
    backup.set_file_name(name);
    backup
}

/// Write the pristine contents next to the source before any in-place swap.
/// If the whole process dies mid-run the backup survives for recovery.
pub fn write_backup(source_file: &Path, contents: &str) -> std::io::Result<PathBuf> {
    let bak = backup_path(source_file);
    std::fs::write(&bak, contents)?;
    Ok(bak)
}

/// Check if a backup file exists from a previous interrupted run.
pub fn check_interrupted_run(source_file: &Path) -> Option<PathBuf> {
    let bak = backup_path(source_file);
    if bak.exists() { Some(bak) } else { None }
}

/// Restore source from its backup and remove the backup.
pub fn restore_from_backup(source_file: &Path, backup_file: &Path) -> std::io::Result<()> {
    std::fs::copy(backup_file, source_file)?;
    std::fs::remove_file(backup_file)?;
    Ok(())
}

/// Remove the backup once a file's mutants have all been tested and the
/// original is back in place.
pub fn clear_backup(source_file: &Path) {
    let _ = std::fs::remove_file(backup_path(source_file));
}
