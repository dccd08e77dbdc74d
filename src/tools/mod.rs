//! Side-effecting collaborators used by the workflow stages.
//!
//! Tools don't think — they execute. File I/O is plain functions; process
//! execution sits behind the `ScriptRunner` trait so tests can swap it out.

pub mod file_ops;
pub mod interpreter;

pub use file_ops::FileError;
pub use interpreter::{Interpreter, RunError, ScriptOutput, ScriptRunner};
