//! The single branch in the workflow: read first, or modify directly.

use std::collections::BTreeSet;

use crate::state::PlanStep;

/// Successor chosen after planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ReadFile,
    ModifyCode,
}

/// Read the file iff the plan asks for it.
pub fn route(plan_steps: &BTreeSet<PlanStep>) -> Route {
    if plan_steps.contains(&PlanStep::ReadFile) {
        Route::ReadFile
    } else {
        Route::ModifyCode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_step_routes_to_read() {
        let steps = BTreeSet::from([PlanStep::ReadFile, PlanStep::ModifyCode]);
        assert_eq!(route(&steps), Route::ReadFile);
        assert_eq!(route(&BTreeSet::from([PlanStep::ReadFile])), Route::ReadFile);
    }

    #[test]
    fn otherwise_routes_to_modify() {
        assert_eq!(route(&BTreeSet::new()), Route::ModifyCode);
        assert_eq!(
            route(&BTreeSet::from([PlanStep::ModifyCode])),
            Route::ModifyCode
        );
    }
}
