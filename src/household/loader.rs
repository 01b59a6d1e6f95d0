//! Load household snapshots from JSON

use super::PlanInputs;
use crate::error::{PlannerError, PlannerResult};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load a single household from a JSON file
pub fn load_plan_inputs<P: AsRef<Path>>(path: P) -> PlannerResult<PlanInputs> {
    let reader = open(path.as_ref())?;
    load_plan_inputs_from_reader(reader)
}

/// Load a single household from any reader (request body, stdin, ...)
pub fn load_plan_inputs_from_reader<R: Read>(reader: R) -> PlannerResult<PlanInputs> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a batch of households from a JSON array file
pub fn load_plan_batch<P: AsRef<Path>>(path: P) -> PlannerResult<Vec<PlanInputs>> {
    let reader = open(path.as_ref())?;
    load_plan_batch_from_reader(reader)
}

/// Load a batch of households from any reader
pub fn load_plan_batch_from_reader<R: Read>(reader: R) -> PlannerResult<Vec<PlanInputs>> {
    Ok(serde_json::from_reader(reader)?)
}

fn open(path: &Path) -> PlannerResult<BufReader<File>> {
    let file = File::open(path).map_err(|source| PlannerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}
