use crate::serializable_struct_with_getters;
use anyhow::{anyhow, Context, Result};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Classroom,
    Transport,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Classroom => "classroom",
            Family::Transport => "transport",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "classroom" => Ok(Family::Classroom),
            "transport" => Ok(Family::Transport),
            _ => Err(anyhow!(
                "Unknown problem family '{}' (expected classroom or transport)",
                s
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Optimal,
    Approximate,
    Infeasible,
    Failure,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Optimal => "optimal",
            Status::Approximate => "approximate",
            Status::Infeasible => "infeasible",
            Status::Failure => "failure",
        }
    }

    /// Whether a run with this status produced a usable cost.
    pub fn has_cost(&self) -> bool {
        matches!(self, Status::Optimal | Status::Approximate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

serializable_struct_with_getters! {
    RunRecord {
        status: Status,
        cost: f64,
        time: f64,
        code: String,
    }
}

impl RunRecord {
    pub fn new(status: Status, cost: f64, time: f64, code: impl Into<String>) -> Self {
        Self {
            status,
            cost,
            time,
            code: code.into(),
        }
    }

    pub fn failure(time: f64, code: impl Into<String>) -> Self {
        Self::new(Status::Failure, -1.0, time, code)
    }
}

/// Per-instance results csv: `{folder}/{family}_{instance}_results.csv`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsFile {
    path: PathBuf,
}

impl ResultsFile {
    pub fn new<P: AsRef<Path>>(folder: P, family: Family, instance: &str) -> Self {
        Self {
            path: folder
                .as_ref()
                .join(format!("{}_{}_results.csv", family, instance)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create results folder {}", parent.display())
                })?;
            }
        }
        let write_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record to {}", self.path.display()))?;
        writer.flush()?;
        Ok(())
    }

    /// All records, or an empty list when the file does not exist yet.
    pub fn read(&self) -> Result<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<RunRecord>().enumerate() {
            let record = row.with_context(|| {
                format!("Malformed row {} in {}", i + 2, self.path.display())
            })?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn records_for(&self, code: &str) -> Result<Vec<RunRecord>> {
        Ok(self
            .read()?
            .into_iter()
            .filter(|r| r.code == code)
            .collect())
    }

    pub fn count(&self, code: &str) -> Result<usize> {
        Ok(self.records_for(code)?.len())
    }

    /// Draws up to `k` records of one solver without replacement.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        code: &str,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<RunRecord>> {
        let records = self.records_for(code)?;
        Ok(records.choose_multiple(rng, k).cloned().collect())
    }
}
