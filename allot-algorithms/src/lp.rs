use anyhow::{anyhow, Result};
use microlp::{Problem, Solution, Variable};

/// `Ok(None)` when the model is infeasible.
pub(crate) fn solve(problem: &Problem) -> Result<Option<Solution>> {
    match problem.solve() {
        Ok(solution) => Ok(Some(solution)),
        Err(microlp::Error::Infeasible) => Ok(None),
        Err(e) => Err(anyhow!("LP solver failed: {}", e)),
    }
}

pub(crate) fn integral_value(solution: &Solution, var: Variable) -> u32 {
    solution[var].round().max(0.0) as u32
}
