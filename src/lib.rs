//! planact — turn one natural-language instruction into a rewritten,
//! saved and executed source file.
//!
//! A run walks a small fixed graph: acquire the instruction, ask the model
//! for a plan, optionally read the target, ask the model for new code,
//! write it, run it. Failures are reported inline in the run's record;
//! a run always completes.

pub mod error;
pub mod graph;
pub mod llm;
pub mod prompts;
pub mod router;
pub mod stages;
pub mod state;
pub mod tools;

#[cfg(test)]
mod testing;

pub use graph::{Node, RunReport, Workflow};
pub use state::{FileContent, PlanStep, RunState};
