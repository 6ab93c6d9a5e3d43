// Holdaccent Core Library
// Timed accent substitution: hold an accent key, tap the leader, get the umlaut

pub mod action;
pub mod config;
pub mod event;
pub mod input;
pub mod key;
pub mod leader;
pub mod mapping;
pub mod output;
pub mod transform;

pub use action::Action;
pub use config::{Config, ConfigError, TimeoutConfig};
pub use event::{
    Scheduler, Script, ScriptCommand, ScriptError, ScriptStep, Session, TimerId, TimerQueue,
};
pub use input::KeyEvent;
pub use key::Key;
pub use leader::LeaderKey;
pub use mapping::{MappingSlot, MappingTable, MAX_MAPPING_SLOTS};
pub use output::{CommitSink, Output, Transcript};
pub use transform::{Decision, Disposition, Pending, PendingState, SubstitutionEngine};
