use crate::error::Result;
use crate::services::classifier::SessionState;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One JSON line appended to the session log at shutdown.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub ended_at: String,
    pub zero_articles: usize,
    pub low_articles: usize,
    pub dno_changes: usize,
}

impl SessionSummary {
    pub fn from_session(session: &SessionState) -> Self {
        SessionSummary {
            ended_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            zero_articles: session.zeros().len(),
            low_articles: session.lows().len(),
            dno_changes: session.dno_changes(),
        }
    }
}

/// Append the summary line. Callers only invoke this when the session saw a
/// mutating action; an untouched session leaves the log untouched.
pub fn append(path: &Path, summary: &SessionSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let line = serde_json::to_string(summary)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}", line)?;
    info!(path = %path.display(), "session log written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn summaries_append_one_parseable_line_each() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");

        for dno_changes in [1usize, 2] {
            let summary = SessionSummary {
                ended_at: "2026-01-05 18:00:00".to_string(),
                zero_articles: 4,
                low_articles: 2,
                dno_changes,
            };
            append(&path, &summary).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: SessionSummary = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.dno_changes, 2);
        assert_eq!(parsed.zero_articles, 4);
    }
}
