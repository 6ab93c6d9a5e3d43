// Holdaccent Transform Module
// Key event -> commit/suppress/pass-through decisions

pub mod engine;
pub mod pending;

pub use engine::{Decision, Disposition, SubstitutionEngine};
pub use pending::{Pending, PendingState};
