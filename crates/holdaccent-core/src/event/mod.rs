// Holdaccent Event Handling
// Timer scheduling, replay scripts and the host session driver

pub mod scheduler;
pub mod script;
pub mod session;

pub use scheduler::{Scheduler, TimerId, TimerQueue};
pub use script::{parse_key_token, Script, ScriptCommand, ScriptError, ScriptStep};
pub use session::{Session, DEFAULT_CONTEXT};
