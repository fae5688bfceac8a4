pub mod backlog;
pub mod commands;
pub mod engine;
pub mod format;
pub mod services;
pub mod signal;
pub mod variables;

pub use backlog::Backlog;
pub use commands::{CommandContext, CommandFlow, CommandRegistry, ScriptCommand, Wait};
pub use engine::{ScriptEngine, ScriptEngineOptions};
pub use format::format_rich_text;
pub use services::*;
pub use signal::{CancelToken, Completion};
pub use variables::{canonical_key, interpolate, MemoryVariables, VariableStore};
