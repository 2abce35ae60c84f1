//! Shared states: доступны всем архетипам
//!
//! Каждый агент владеет одним экземпляром каждого состояния (arena),
//! локальные таймеры сбрасываются в Enter.

pub mod attack;
pub mod hide;
pub mod idle;
pub mod move_to;
pub mod run;
pub mod run_to_hide;
pub mod wander;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod states_tests;

pub use attack::AttackState;
pub use hide::HideState;
pub use idle::IdleState;
pub use move_to::MoveToState;
pub use run::RunState;
pub use run_to_hide::RunToHideState;
pub use wander::WanderState;
