// file: src/agent/prompt.rs
// description: default persona prompt and task for LinkedIn post generation

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a tech analyst and content strategist. \
Research topics carefully and write concise, engaging LinkedIn posts.";

pub const DEFAULT_TASK: &str = "Research the latest AI agent trends in 2025 \
and create a professional but engaging LinkedIn post.";

/// Persona prompt plus the tool roster, so the model knows what it may call.
pub fn build_system_prompt(persona: &str, tool_names: &[&str]) -> String {
    if tool_names.is_empty() {
        return persona.to_string();
    }

    format!(
        "{}\n\nYou can call these tools when you need fresh information: {}. \
When you have enough material, reply with the finished post only.",
        persona.trim_end(),
        tool_names.join(", ")
    )
}
