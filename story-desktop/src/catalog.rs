use std::fmt;
use std::path::{Path, PathBuf};

use story_script::ScriptSummary;
use walkdir::WalkDir;

/// One playable script found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEntry {
    pub path: PathBuf,
    pub summary: ScriptSummary,
}

impl fmt::Display for ScriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} {:>3} segments  {}",
            self.summary.title,
            self.summary.segment_count,
            self.path.display()
        )
    }
}

/// Every `*.json` under `root` whose title and size can be read, sorted by
/// path. Unreadable files are skipped with a warning.
pub fn scan(root: impl AsRef<Path>) -> Vec<ScriptEntry> {
    let root = root.as_ref();
    log::info!("Scanning scripts at: {:?}", root);

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|e| e != "json") {
            continue;
        }
        match ScriptSummary::peek(path) {
            Ok(summary) => entries.push(ScriptEntry { path: path.to_path_buf(), summary }),
            Err(e) => log::warn!("Skipping {:?}: {}", path, e),
        }
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    log::info!("Found {} scripts", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_json_scripts_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("act2")).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"title":"Night","segments":[{"text":"x"}]}"#).unwrap();
        fs::write(dir.path().join("act2/a.json"), r#"{"segments":{"k":{},"j":{}}}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a script").unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();

        let found = scan(dir.path());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].summary.title, "Adventure");
        assert_eq!(found[0].summary.segment_count, 2);
        assert_eq!(found[1].summary.title, "Night");
        assert!(found[1].to_string().contains("Night"));
    }
}
