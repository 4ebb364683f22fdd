// src/report/store.rs
//! Dated report artifacts: `<dir>/<stem>-<YYYY-MM-DD>.csv`.
//!
//! Writes go to a temp file in the same directory and are renamed into place,
//! so readers never see a half-written report. Only the run date's file is
//! ever touched.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::rows::ReportRow;
use crate::record::{Category, ClassifiedRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, category: Category, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.csv",
            category.stem(),
            date.format(DATE_FORMAT)
        ))
    }

    /// Write the rows of `records` that belong to `R`'s category.
    pub fn write<R: ReportRow>(
        &self,
        records: &[ClassifiedRecord],
        date: NaiveDate,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path_for(R::CATEGORY, date);

        let mut tmp = NamedTempFile::new_in(&self.dir).context("creating temp report")?;
        {
            let mut w = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file_mut());
            w.write_record(R::HEADERS).context("writing csv header")?;
            for row in records.iter().filter_map(R::from_record) {
                w.serialize(row).context("writing csv row")?;
            }
            w.flush().context("flushing report")?;
        }
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("renaming report into {}", path.display()))?;
        Ok(path)
    }

    /// Artifact with the greatest date in its file name, if any.
    pub fn latest(&self, category: Category) -> Result<Option<(NaiveDate, PathBuf)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("listing {}", self.dir.display()))
            }
        };

        let mut best: Option<(NaiveDate, PathBuf)> = None;
        for entry in entries {
            let entry = entry.context("reading report dir entry")?;
            let name = entry.file_name();
            let Some(date) = name.to_str().and_then(|n| artifact_date(category, n)) else {
                continue;
            };
            if best.as_ref().map_or(true, |(d, _)| date > *d) {
                best = Some((date, entry.path()));
            }
        }
        Ok(best)
    }

    pub fn load<R: ReportRow>(&self, path: &Path) -> Result<Vec<R>> {
        let mut rdr = csv::Reader::from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        rdr.deserialize()
            .collect::<std::result::Result<Vec<R>, _>>()
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// Rows of the latest artifact for `R`'s category, or `None` when there is none.
    pub fn load_latest<R: ReportRow>(&self) -> Result<Option<(NaiveDate, Vec<R>)>> {
        match self.latest(R::CATEGORY)? {
            Some((date, path)) => Ok(Some((date, self.load(&path)?))),
            None => Ok(None),
        }
    }
}

/// Date part of `<stem>-<YYYY-MM-DD>.csv` for this category's stem.
fn artifact_date(category: Category, file_name: &str) -> Option<NaiveDate> {
    let rest = file_name
        .strip_prefix(category.stem())?
        .strip_prefix('-')?
        .strip_suffix(".csv")?;
    NaiveDate::parse_from_str(rest, DATE_FORMAT).ok()
}
