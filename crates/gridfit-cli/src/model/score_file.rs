use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use chrono::{DateTime, Utc};
use gridfit_engine::{ScoreRecord, ScoreStore, ScoreStoreError, normalize_player_name};
use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

/// A leaderboard entry as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreEntry {
    fn to_record(&self) -> ScoreRecord {
        ScoreRecord {
            name: self.name.clone(),
            score: self.score,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScoreFileData {
    scores: Vec<ScoreEntry>,
}

/// [`ScoreStore`] backed by a JSON file.
///
/// The file is read on every query and rewritten on every submission; a
/// missing file is an empty leaderboard.
#[derive(Debug, Clone)]
pub struct ScoreFile {
    path: PathBuf,
}

impl ScoreFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, best first; equal scores are ordered by recording time.
    pub fn ranked_entries(&self) -> anyhow::Result<Vec<ScoreEntry>> {
        let mut entries = self.load()?.scores;
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.recorded_at.cmp(&b.recorded_at))
        });
        Ok(entries)
    }

    fn load(&self) -> anyhow::Result<ScoreFileData> {
        if !self.path.exists() {
            return Ok(ScoreFileData::default());
        }
        util::read_json_file("scores", &self.path)
    }

    /// Writes to a sibling temporary file, then renames it over the
    /// leaderboard so readers never see a half-written file.
    fn save(&self, data: &ScoreFileData) -> anyhow::Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        Output::create(tmp.clone())?.write_json(data)?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "Failed to replace {} with {}",
                self.path.display(),
                tmp.display()
            )
        })
    }

    fn append(&self, entry: ScoreEntry) -> anyhow::Result<()> {
        let mut data = self.load()?;
        data.scores.push(entry);
        self.save(&data)
    }
}

fn backend_error(err: &anyhow::Error) -> ScoreStoreError {
    ScoreStoreError::Backend(format!("{err:#}"))
}

impl ScoreStore for ScoreFile {
    fn fetch_top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        if limit == 0 {
            return Err(ScoreStoreError::InvalidLimit);
        }
        let entries = self.ranked_entries().map_err(|err| backend_error(&err))?;
        Ok(entries.iter().take(limit).map(ScoreEntry::to_record).collect())
    }

    fn submit_score(&mut self, name: &str, score: u32) -> Result<ScoreRecord, ScoreStoreError> {
        let entry = ScoreEntry {
            name: normalize_player_name(name)?,
            score,
            recorded_at: Utc::now(),
        };
        let record = entry.to_record();
        self.append(entry).map_err(|err| backend_error(&err))?;
        Ok(record)
    }
}
