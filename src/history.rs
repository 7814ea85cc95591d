//! Trend tracking - persist page scores to .sitegrade-history.json

use crate::config::CONFIG_FILENAME;
use crate::{AnalysisResult, Grade};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const HISTORY_FILENAME: &str = ".sitegrade-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRun {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Keyed by page label (file path, `-`, or URL)
    pub pages: HashMap<String, PageScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScore {
    pub score: u8,
    pub grade: Grade,
    pub critical: usize,
    pub warnings: usize,
}

/// Find project root (directory containing the history file, the config file, or .git)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };

    loop {
        if dir.join(HISTORY_FILENAME).exists() {
            return Some(dir.to_path_buf());
        }
        if dir.join(CONFIG_FILENAME).exists() || dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    if let Ok(content) = fs::read_to_string(&path) {
        match serde_json::from_str::<HistoryFile>(&content) {
            Ok(history) => return history,
            Err(e) => log::warn!("Ignoring unreadable history {}: {}", path.display(), e),
        }
    }
    HistoryFile::default()
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> std::io::Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history).unwrap_or_else(|_| "{}".to_string());
    fs::write(path, content)
}

/// Get the previous score for a page from the latest run
pub fn previous_score(history: &HistoryFile, label: &str) -> Option<u8> {
    let run = history.runs.last()?;
    run.pages.get(label).map(|p| p.score)
}

/// Build a new run from labelled analysis results and append to history
pub fn append_run(
    history: &mut HistoryFile,
    results: &[(String, AnalysisResult)],
    commit: Option<String>,
) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let pages = results
        .iter()
        .map(|(label, r)| {
            (
                label.clone(),
                PageScore {
                    score: r.overall_score,
                    grade: r.grade,
                    critical: r.summary.critical,
                    warnings: r.summary.warning,
                },
            )
        })
        .collect();
    history.runs.push(HistoryRun {
        timestamp,
        commit,
        pages,
    });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Format delta for console: "[was 82, down 4]" or "[was 82, up 2]" or ""
pub fn format_delta(previous: Option<u8>, current: u8) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    if prev == current {
        return format!(" [unchanged at {}]", current);
    }
    let diff = current as i16 - prev as i16;
    if diff > 0 {
        format!(" [was {}, up {}]", prev, diff)
    } else {
        format!(" [was {}, down {}]", prev, -diff)
    }
}
