//! Agent module - the conversational avatar logic.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context: persona prompt + document corpus + history + message
//! 2. Call the LLM with the declared milestone tools
//! 3. If the model requests tool calls, execute them and feed results back
//! 4. Repeat until the model answers in text or the tool budget runs out

mod agent_loop;
mod prompt;

pub use agent_loop::Agent;
pub use prompt::build_system_prompt;
