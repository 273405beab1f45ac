use crate::{classroom, ensure_parent_dir, transport};
use anyhow::{Context, Result};
use log::info;
use std::{fmt::Write, fs, path::Path};

pub const CLASSROOM_MODEL: &str = r"set DISCIPLINES;
set ROOMS;

param N {DISCIPLINES};
param C {ROOMS};
param D {DISCIPLINES, ROOMS};

var x {DISCIPLINES, ROOMS} binary;

minimize Total_Distance:
    sum {i in DISCIPLINES, j in ROOMS} N[i] * D[i,j] * x[i,j];

subject to One_Room_Per_Discipline {i in DISCIPLINES}:
    sum {j in ROOMS} x[i,j] = 1;

subject to One_Discipline_Per_Room {j in ROOMS}:
    sum {i in DISCIPLINES} x[i,j] <= 1;

subject to Room_Capacity {i in DISCIPLINES, j in ROOMS}:
    N[i] * x[i,j] <= C[j];
";

pub const TRANSPORT_MODEL: &str = r"set I;
set J;

param O {I} >= 0;
param D {J} >= 0;
param C {I, J} >= 0;

var x {I, J} integer >= 0;

minimize Total_Cost:
    sum {i in I, j in J} C[i,j] * x[i,j];

subject to Supply {i in I}:
    sum {j in J} x[i,j] <= O[i];

subject to Demand {j in J}:
    sum {i in I} x[i,j] >= D[j];
";

/// An instance that can be handed to AMPL as a model plus a data file.
pub trait AmplInstance {
    const MODEL: &'static str;
    const OBJECTIVE: &'static str;
    /// Prefix of the model and data file names.
    const FILE_STEM: &'static str;

    fn ampl_data(&self) -> String;
}

impl AmplInstance for classroom::Challenge {
    const MODEL: &'static str = CLASSROOM_MODEL;
    const OBJECTIVE: &'static str = "Total_Distance";
    const FILE_STEM: &'static str = "classroom";

    fn ampl_data(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "set DISCIPLINES := {};", self.disciplines.join(" "));
        let _ = writeln!(out, "set ROOMS := {};\n", self.rooms.join(" "));
        out.push_str("param N :=\n");
        for (d, n) in self.disciplines.iter().zip(&self.students) {
            let _ = writeln!(out, "{} {}", d, n);
        }
        out.push_str(";\n\nparam C :=\n");
        for (r, c) in self.rooms.iter().zip(&self.capacities) {
            let _ = writeln!(out, "{} {}", r, c);
        }
        let _ = writeln!(out, ";\n\nparam D : {} :=", self.rooms.join(" "));
        for (d, row) in self.disciplines.iter().zip(&self.distances) {
            let _ = writeln!(out, "{} {}", d, join_numbers(row));
        }
        out.push_str(";\n");
        out
    }
}

impl AmplInstance for transport::Challenge {
    const MODEL: &'static str = TRANSPORT_MODEL;
    const OBJECTIVE: &'static str = "Total_Cost";
    const FILE_STEM: &'static str = "transport";

    fn ampl_data(&self) -> String {
        let sources: Vec<String> = (0..self.num_sources()).map(|i| format!("i{}", i)).collect();
        let destinations: Vec<String> = (0..self.num_destinations())
            .map(|j| format!("j{}", j))
            .collect();
        let mut out = String::new();
        let _ = writeln!(out, "set I := {};", sources.join(" "));
        let _ = writeln!(out, "set J := {};\n", destinations.join(" "));
        out.push_str("param O :=\n");
        for (i, o) in sources.iter().zip(&self.supplies) {
            let _ = writeln!(out, "{} {}", i, o);
        }
        out.push_str(";\n\nparam D :=\n");
        for (j, d) in destinations.iter().zip(&self.demands) {
            let _ = writeln!(out, "{} {}", j, d);
        }
        let _ = writeln!(out, ";\n\nparam C : {} :=", destinations.join(" "));
        for (i, row) in sources.iter().zip(&self.costs) {
            let _ = writeln!(out, "{} {}", i, join_numbers(row));
        }
        out.push_str(";\n");
        out
    }
}

fn join_numbers(row: &[u32]) -> String {
    row.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_model<T: AmplInstance, P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    fs::write(path, T::MODEL)
        .with_context(|| format!("Failed to write AMPL model {}", path.display()))
}

/// Writes the data file unless it already exists. Returns whether it was written.
pub fn write_data<T: AmplInstance, P: AsRef<Path>>(instance: &T, path: P) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        info!("AMPL data {} already exists, skipping", path.display());
        return Ok(false);
    }
    ensure_parent_dir(path)?;
    fs::write(path, instance.ampl_data())
        .with_context(|| format!("Failed to write AMPL data {}", path.display()))?;
    info!("AMPL data saved to {}", path.display());
    Ok(true)
}
