use allot_challenges::{classroom, transport};
use allot_structs::results::Family;
use anyhow::{anyhow, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Generator parameters settable from the command line, all `u32`.
pub const GENERATOR_FLAGS: [&str; 8] = [
    "min_students",
    "max_students",
    "min_capacity",
    "max_capacity",
    "min_distance",
    "max_distance",
    "min_value",
    "max_value",
];

/// Parses `N` (square) or `NxM`.
pub fn parse_size(size: &str) -> Result<(usize, usize)> {
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|e| anyhow!("Invalid size '{}': {}", size, e))
    };
    match size.split_once('x') {
        Some((rows, cols)) => Ok((parse(rows)?, parse(cols)?)),
        None => {
            let n = parse(size)?;
            Ok((n, n))
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSpec {
    pub family: Family,
    pub size: (usize, usize),
    /// Generator parameters beyond the size, e.g. `{"max_value": 50}`.
    pub generator: Map<String, Value>,
    pub seed: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instance {
    Classroom(classroom::Challenge),
    Transport(transport::Challenge),
}

impl InstanceSpec {
    pub fn new(family: Family, size: (usize, usize), seed: u64) -> Self {
        Self {
            family,
            size,
            generator: Map::new(),
            seed,
        }
    }

    fn difficulty<T: DeserializeOwned>(&self, size_keys: [&str; 2]) -> Result<T> {
        let mut fields = self.generator.clone();
        fields.insert(size_keys[0].to_string(), Value::from(self.size.0));
        fields.insert(size_keys[1].to_string(), Value::from(self.size.1));
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| anyhow!("Invalid {} generator parameters: {}", self.family, e))
    }

    pub fn classroom_difficulty(&self) -> Result<classroom::Difficulty> {
        self.difficulty(["num_disciplines", "num_rooms"])
    }

    pub fn transport_difficulty(&self) -> Result<transport::Difficulty> {
        self.difficulty(["num_sources", "num_destinations"])
    }

    pub fn instance_name(&self) -> Result<String> {
        Ok(match self.family {
            Family::Classroom => self.classroom_difficulty()?.instance_name(self.seed),
            Family::Transport => self.transport_difficulty()?.instance_name(self.seed),
        })
    }

    pub fn path<P: AsRef<Path>>(&self, folder: P) -> Result<PathBuf> {
        let file_name = match self.family {
            Family::Classroom => self.classroom_difficulty()?.file_name(self.seed),
            Family::Transport => self.transport_difficulty()?.file_name(self.seed),
        };
        Ok(folder.as_ref().join(file_name))
    }

    pub fn generate(&self) -> Result<Instance> {
        Ok(match self.family {
            Family::Classroom => Instance::Classroom(classroom::Challenge::generate_instance(
                self.seed,
                &self.classroom_difficulty()?,
            )?),
            Family::Transport => Instance::Transport(transport::Challenge::generate_instance(
                self.seed,
                &self.transport_difficulty()?,
            )?),
        })
    }

    /// Generates the instance and writes its csv into `folder`.
    pub fn generate_to<P: AsRef<Path>>(&self, folder: P) -> Result<(Instance, PathBuf)> {
        let path = self.path(folder)?;
        let instance = self.generate()?;
        instance.write_csv(&path)?;
        info!("Instance saved to {}", path.display());
        Ok((instance, path))
    }

    pub fn load<P: AsRef<Path>>(&self, folder: P) -> Result<Instance> {
        let path = self.path(folder)?;
        if !path.exists() {
            return Err(anyhow!("Instance file {} not found", path.display()));
        }
        Instance::read_csv(self.family, &path)
    }

    /// Loads the instance, generating it first when the file is missing.
    pub fn load_or_generate<P: AsRef<Path>>(&self, folder: P) -> Result<Instance> {
        let path = self.path(&folder)?;
        if path.exists() {
            Instance::read_csv(self.family, &path)
        } else {
            Ok(self.generate_to(folder)?.0)
        }
    }
}

impl Instance {
    pub fn family(&self) -> Family {
        match self {
            Instance::Classroom(_) => Family::Classroom,
            Instance::Transport(_) => Family::Transport,
        }
    }

    pub fn read_csv<P: AsRef<Path>>(family: Family, path: P) -> Result<Self> {
        Ok(match family {
            Family::Classroom => Instance::Classroom(classroom::Challenge::read_csv(path)?),
            Family::Transport => Instance::Transport(transport::Challenge::read_csv(path)?),
        })
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        match self {
            Instance::Classroom(c) => c.write_csv(path),
            Instance::Transport(c) => c.write_csv(path),
        }
    }
}
