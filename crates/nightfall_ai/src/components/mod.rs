//! ECS Components агентов и мира
//!
//! Организация по доменам:
//! - health: здоровье (агенты, игрок, постройки, кристалл)
//! - presence: видимые/физические части тела (Hide)
//! - animation: параметры аниматора (AnimatorParams)
//! - signals: день/ночь и окно удара

pub mod animation;
pub mod health;
pub mod presence;
pub mod signals;

// Re-exports для удобного импорта
pub use animation::*;
pub use health::*;
pub use presence::*;
pub use signals::*;
