use crate::{results::Family, serializable_struct_with_getters};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    InProcess,
    /// Every run is a separate `allot-runtime compute_solution` process.
    Subprocess { runtime: String },
}

fn default_sizes() -> Vec<usize> {
    let mut sizes: Vec<usize> = (1..=10).map(|i| i * 100 + 1).collect();
    sizes.push(2001);
    sizes
}

fn default_repetitions() -> usize {
    10
}

fn default_seed() -> u64 {
    42
}

fn default_instances_folder() -> String {
    "instances".to_string()
}

fn default_solutions_folder() -> String {
    "solutions".to_string()
}

fn default_alpha() -> f64 {
    0.01
}

serializable_struct_with_getters! {
    BenchmarkConfig {
        family: Family,
        #[serde(default = "default_sizes")]
        sizes: Vec<usize>,
        #[serde(default)]
        solvers: Vec<String>,
        #[serde(default = "default_repetitions")]
        repetitions: usize,
        /// Generator parameters layered over the size, e.g. `{"max_value": 50}`.
        #[serde(default)]
        generator: Map<String, Value>,
        #[serde(default = "default_seed")]
        seed: u64,
        #[serde(default = "default_instances_folder")]
        instances_folder: String,
        #[serde(default = "default_solutions_folder")]
        solutions_folder: String,
        #[serde(default)]
        run_mode: RunMode,
        #[serde(default)]
        hyperparameters: Map<String, Value>,
        #[serde(default = "default_alpha")]
        alpha: f64,
        reference: Option<String>,
        ampl: Option<String>,
        shuffle_seed: Option<u64>,
    }
}

impl BenchmarkConfig {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            sizes: default_sizes(),
            solvers: Vec::new(),
            repetitions: default_repetitions(),
            generator: Map::new(),
            seed: default_seed(),
            instances_folder: default_instances_folder(),
            solutions_folder: default_solutions_folder(),
            run_mode: RunMode::default(),
            hyperparameters: Map::new(),
            alpha: default_alpha(),
            reference: None,
            ampl: None,
            shuffle_seed: None,
        }
    }

    /// Hyper-parameters configured for one solver code, if any.
    pub fn hyperparameters_for(&self, code: &str) -> Option<Map<String, Value>> {
        match self.hyperparameters.get(code) {
            Some(Value::Object(map)) => Some(map.clone()),
            _ => None,
        }
    }
}
