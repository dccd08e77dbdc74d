use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use planact::llm::LlmPool;
use planact::stages::prompt::{FixedInstruction, InstructionSource, StdinInstruction};
use planact::tools::Interpreter;
use planact::Workflow;
use planact_config::FlowConfig;

#[derive(Parser)]
#[command(name = "planact", version)]
#[command(about = "Plan, rewrite, save and run a source file from one instruction")]
struct Cli {
    /// Instruction to carry out. Read from stdin when omitted.
    instruction: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model alias or full model id (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Interpreter used to run generated Python files (overrides config)
    #[arg(long)]
    interpreter: Option<String>,

    /// Print the whole run record as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("planact=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FlowConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FlowConfig::default(),
    };
    if let Some(model) = cli.model {
        config.model.name = model;
    }
    if let Some(interpreter) = cli.interpreter {
        config.workspace.interpreter = interpreter;
    }

    let pool = LlmPool::from_config(&config.model).context("initializing language model")?;
    tracing::info!(model = pool.default_model(), "language model ready");

    let interpreter = Interpreter::new(config.workspace.interpreter.clone())
        .with_timeout(config.workspace.timeout_secs.map(Duration::from_secs));

    let source: Arc<dyn InstructionSource> = match cli.instruction {
        Some(text) => Arc::new(FixedInstruction(text)),
        None => Arc::new(StdinInstruction),
    };

    let workflow = Workflow::new(Arc::new(pool), Arc::new(interpreter), source)
        .with_default_file(config.workspace.default_file.clone());

    let report = workflow.run().await;

    if cli.json {
        let json = serde_json::json!({
            "run_id": report.run_id,
            "path": report.path.iter().map(|n| n.name()).collect::<Vec<_>>(),
            "state": report.state,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", report.state.save_status);
        println!("Final Execution Result: {}", report.execution_result());
    }

    Ok(())
}
