use std::path::PathBuf;

use crate::report::Report;

fn state_path() -> PathBuf {
    let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    dir.join(".patmut-state.json")
}

pub fn save_last_run(report: &Report) {
    if let Ok(json) = serde_json::to_string(report) {
        let _ = std::fs::write(state_path(), json);
    }
}

pub fn load_last_run() -> Option<Report> {
    let data = std::fs::read_to_string(state_path()).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_to_path(report: &Report, path: &std::path::Path) {
    if let Ok(json) = serde_json::to_string(report) {
        let _ = std::fs::write(path, json);
    }
}

pub fn load_from_path(path: &std::path::Path) -> Option<Report> {
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}
