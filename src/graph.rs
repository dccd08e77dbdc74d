//! Graph executor — drives one run from Prompt to Done.
//!
//! ```text
//! Prompt → Plan ─┬─ (route: ReadFile) ─→ Read ─┐
//!                └─ (route: ModifyCode) ───────┴→ Modify → Persist → Execute → Done
//! ```
//!
//! The executor owns the record: it calls the current node's stage, merges
//! the returned update, and picks the successor. The router is consulted
//! only when leaving Plan. No node is visited twice.

use std::fmt;
use std::sync::Arc;

use planact_config::DEFAULT_FILE;
use tracing::Instrument;

use crate::llm::LanguageModel;
use crate::router::{route, Route};
use crate::stages::prompt::InstructionSource;
use crate::stages::{execute, modify, persist, plan, prompt, read};
use crate::state::RunState;
use crate::tools::ScriptRunner;

/// Workflow nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Prompt,
    Plan,
    Read,
    Modify,
    Persist,
    Execute,
    Done,
}

impl Node {
    /// Successor of this node given the record after its stage ran.
    pub fn successor(self, state: &RunState) -> Node {
        match self {
            Node::Prompt => Node::Plan,
            Node::Plan => match route(&state.plan_steps) {
                Route::ReadFile => Node::Read,
                Route::ModifyCode => Node::Modify,
            },
            Node::Read => Node::Modify,
            Node::Modify => Node::Persist,
            Node::Persist => Node::Execute,
            Node::Execute | Node::Done => Node::Done,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Node::Prompt => "prompt",
            Node::Plan => "plan",
            Node::Read => "read",
            Node::Modify => "modify",
            Node::Persist => "persist",
            Node::Execute => "execute",
            Node::Done => "done",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub state: RunState,
    /// Nodes in the order they were visited, ending with `Done`.
    pub path: Vec<Node>,
}

impl RunReport {
    pub fn execution_result(&self) -> &str {
        &self.state.execution_result
    }
}

/// The plan → act workflow with its collaborators.
pub struct Workflow {
    model: Arc<dyn LanguageModel>,
    runner: Arc<dyn ScriptRunner>,
    source: Arc<dyn InstructionSource>,
    default_file: String,
}

impl Workflow {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        runner: Arc<dyn ScriptRunner>,
        source: Arc<dyn InstructionSource>,
    ) -> Self {
        Self {
            model,
            runner,
            source,
            default_file: DEFAULT_FILE.to_string(),
        }
    }

    /// Target used when the plan resolves no path.
    pub fn with_default_file(mut self, default_file: impl Into<String>) -> Self {
        self.default_file = default_file.into();
        self
    }

    /// Run the graph once on a fresh record. Always reaches `Done`.
    pub async fn run(&self) -> RunReport {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("run", run_id = %run_id);

        let (state, path) = self.drive().instrument(span).await;
        RunReport {
            run_id,
            state,
            path,
        }
    }

    async fn drive(&self) -> (RunState, Vec<Node>) {
        let mut state = RunState::default();
        let mut path = Vec::new();
        let mut node = Node::Prompt;

        while node != Node::Done {
            tracing::info!(node = %node, "entering node");
            path.push(node);

            let update = match node {
                Node::Prompt => prompt::acquire(self.source.as_ref()).await,
                Node::Plan => plan::plan(&state, self.model.as_ref()).await,
                Node::Read => read::read(&state).await,
                Node::Modify => {
                    modify::modify(&state, self.model.as_ref(), &self.default_file).await
                }
                Node::Persist => persist::persist(&state, &self.default_file).await,
                Node::Execute => execute::execute(&state, self.runner.as_ref()).await,
                Node::Done => break,
            };
            state.apply(update);
            node = node.successor(&state);
        }

        path.push(Node::Done);
        tracing::info!(path = ?path, "run complete");
        (state, path)
    }
}
