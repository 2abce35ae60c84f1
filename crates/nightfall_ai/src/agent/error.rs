use thiserror::Error;

/// Почему переход не состоялся. Ни одна из ошибок не фатальна:
/// машина логирует и применяет fallback сама, caller может игнорировать.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Запрос пришёл из Enter/Exit другого перехода
    #[error("transition already in progress, nested request dropped")]
    Reentrant,

    /// Path follower выключен или не на навигационной поверхности (retry next tick)
    #[error("navigation is not ready")]
    NavigationUnavailable,

    #[error("level {level} is out of range ({count} levels)")]
    LevelOutOfRange { level: usize, count: usize },

    #[error("level {level} has no states")]
    EmptyLevel { level: usize },
}
