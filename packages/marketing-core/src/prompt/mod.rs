pub mod builder;
pub mod hooks;
pub mod schedule;

pub use builder::{build, BuiltPrompt};
pub use hooks::classify_hook;
pub use schedule::schedule_days;
