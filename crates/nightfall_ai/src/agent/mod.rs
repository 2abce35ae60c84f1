//! Agent: layered state machine + archetype capability
//!
//! Архитектура:
//! - `Agent<A>` = `AgentCore` (то, что видят states) + archetype + arena состояний
//! - States переходят через `AgentCore::request` (один слот, применяется
//!   сразу после callback'а); Enter/Exit не могут запускать переходы
//! - Внешний мир приходит через `TickContext` (spatial queries, аниматор, сигналы)

pub mod alert;
pub mod archetype;
pub mod agent_core;
pub mod error;
pub mod events;
pub mod machine;
pub mod state;
pub mod table;


pub use alert::alert_recipients;
pub use archetype::Archetype;
pub use agent_core::{yaw_towards, AgentCore, Request, Target};
pub use error::TransitionError;
pub use events::{AgentEvent, DamageReport};
pub use machine::{Agent, StateChange};
pub use state::{State, StateId, StateTag, TickContext};
pub use table::{Roster, StateTable};
