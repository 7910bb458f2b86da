use crate::error::CorpusError;
use domain::models::{CorpusRecord, QaPair};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads the line-delimited JSON question/answer corpus.
pub struct CorpusLoader {
    path: PathBuf,
}

impl CorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<QaPair>, CorpusError> {
        let file = File::open(&self.path).map_err(|source| CorpusError::Io {
            path: self.path.clone(),
            source,
        })?;
        let pairs = self.parse(BufReader::new(file))?;
        if pairs.is_empty() {
            return Err(CorpusError::Empty(self.path.clone()));
        }
        tracing::info!(path = %self.path.display(), entries = pairs.len(), "corpus loaded");
        Ok(pairs)
    }

    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Vec<QaPair>, CorpusError> {
        let mut pairs = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| CorpusError::Io {
                path: self.path.clone(),
                source,
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            tracing::trace!(line = idx + 1, "parsing corpus line");
            let record: CorpusRecord = serde_json::from_str(line)
                .map_err(|source| CorpusError::Malformed {
                    line: idx + 1,
                    source,
                })?;
            pairs.push(record.into_pair());
        }
        Ok(pairs)
    }
}
