//! Prompt templates for the two model calls.
//!
//! - PLANNING_PROMPT: break the instruction into actions and find the file
//! - MODIFICATION_PROMPT: produce the complete replacement source

/// Instructions for the planning call. The instruction text is appended.
pub const PLANNING_PROMPT: &str = "\
Analyze the following instruction and break it down into actionable steps.
If the instruction involves modifying a file (e.g. adding features to a file), \
output a JSON object with key \"steps\" containing the two members \"read_file\" and \"modify_code\".
If a file path is mentioned, extract it and put it in the same JSON object under the key \"file_path\". \
Note that the file name itself may be the path.
The answer must use this format: {\"steps\": [\"read_file\", \"modify_code\"], \"file_path\": \"path/to/file\"}";

/// Instructions for the modification call.
pub const MODIFICATION_PROMPT: &str = "\
You are a code assistant. Given the following instruction and code, generate the updated code. \
Include comments that explain how the instruction influenced the changes.";

/// Closing rules for the modification call.
pub const MODIFICATION_RULES: &str = "\
Output the complete new code in a single fenced code block. \
The output code must be able to run from the command line.";

/// Build the planning prompt for an instruction.
pub fn build_plan_prompt(instruction: &str) -> String {
    format!("{PLANNING_PROMPT}\n\nInstruction: {instruction}")
}

/// Build the modification prompt.
///
/// `language` names the fence tag the reply must use, when one is known.
pub fn build_modify_prompt(instruction: &str, code: &str, language: Option<&str>) -> String {
    let mut prompt = MODIFICATION_PROMPT.to_string();
    if let Some(lang) = language {
        prompt.push_str(&format!(" The code is {lang}; tag the fenced block as `{lang}`."));
    }
    prompt.push_str(&format!(
        "\nPrompt: {instruction}\nCode Content: {code}\n{MODIFICATION_RULES}"
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_prompt_carries_instruction() {
        let prompt = build_plan_prompt("Add a docstring to utils.py");
        assert!(prompt.starts_with(PLANNING_PROMPT));
        assert!(prompt.ends_with("Instruction: Add a docstring to utils.py"));
        assert!(prompt.contains("read_file"));
    }

    #[test]
    fn modify_prompt_with_language() {
        let prompt = build_modify_prompt("Add logging", "print(1)", Some("python"));
        assert!(prompt.contains("tag the fenced block as `python`"));
        assert!(prompt.contains("Prompt: Add logging"));
        assert!(prompt.contains("Code Content: print(1)"));
        assert!(prompt.ends_with(MODIFICATION_RULES));
    }

    #[test]
    fn modify_prompt_without_language() {
        let prompt = build_modify_prompt("Write hello world", "", None);
        assert!(!prompt.contains("tag the fenced block"));
        assert!(prompt.contains("Code Content: \n"));
    }
}
