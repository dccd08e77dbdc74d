//! Prompt acquisition — the run's instruction enters the message log.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::llm::types::Message;
use crate::state::StateUpdate;

/// Where the instruction comes from.
#[async_trait]
pub trait InstructionSource: Send + Sync {
    async fn instruction(&self) -> String;
}

/// Instruction supplied up front (command line, tests).
#[derive(Debug, Clone)]
pub struct FixedInstruction(pub String);

#[async_trait]
impl InstructionSource for FixedInstruction {
    async fn instruction(&self) -> String {
        self.0.clone()
    }
}

/// Interactive instruction read from stdin.
#[derive(Debug, Default)]
pub struct StdinInstruction;

#[async_trait]
impl InstructionSource for StdinInstruction {
    async fn instruction(&self) -> String {
        let mut stdout = tokio::io::stdout();
        let written = match stdout.write_all(b"Please enter your prompt: ").await {
            Ok(()) => stdout.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            tracing::warn!("failed to write prompt: {e}");
        }

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        if let Err(e) = reader.read_line(&mut line).await {
            tracing::warn!("failed to read instruction from stdin: {e}");
            return String::new();
        }
        line.trim_end_matches(['\r', '\n']).to_string()
    }
}

/// Append the instruction as a user message. Empty instructions pass through.
pub async fn acquire(source: &dyn InstructionSource) -> StateUpdate {
    let instruction = source.instruction().await;
    if instruction.trim().is_empty() {
        tracing::warn!("empty instruction");
    }
    StateUpdate {
        messages: vec![Message::user(instruction)],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_user_message() {
        let update = acquire(&FixedInstruction("Write a hello-world script".into())).await;
        assert_eq!(update.messages, vec![Message::user("Write a hello-world script")]);
        assert!(update.file_path.is_none());
    }

    #[tokio::test]
    async fn empty_instruction_is_accepted() {
        let update = acquire(&FixedInstruction(String::new())).await;
        assert_eq!(update.messages.len(), 1);
        assert_eq!(update.messages[0].content, "");
    }
}
