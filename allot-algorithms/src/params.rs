use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Overlays user hyper-parameters on a solver's defaults. Unknown keys are ignored.
pub fn merge_hyperparameters<T>(
    defaults: T,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(defaults)?;
    if let (Value::Object(ref mut obj), Some(map)) = (&mut merged, hyperparameters) {
        for (k, v) in map {
            obj.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(merged).map_err(|e| anyhow!("Invalid hyperparameters: {}", e))
}
