//! Глобальный logger для agent brains.
//!
//! Brain'ы тикают и внутри Bevy systems, и в unit-тестах без App,
//! поэтому sink один на процесс (`LogPrinter`), а не Bevy resource.
//! Фильтр уровня применяется до форматирования: отключённый Debug
//! почти ничего не стоит в горячем цикле тиков.

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex, MutexGuard};

struct Sink {
    printer: Option<Box<dyn LogPrinter>>,
    min_level: LogLevel,
}

static SINK: Lazy<Mutex<Sink>> = Lazy::new(|| {
    Mutex::new(Sink {
        printer: None,
        min_level: LogLevel::Debug,
    })
});

/// Poisoned mutex не роняет симуляцию
fn sink() -> MutexGuard<'static, Sink> {
    SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Куда уходят строки лога (консоль, Godot, буфер в тестах)
pub trait LogPrinter: Send + Sync {
    fn print(&self, level: LogLevel, line: &str);
}

pub fn set_logger(printer: Box<dyn LogPrinter>) {
    sink().printer = Some(printer);
}

/// Ставит printer только если его ещё нет (повторные `create_headless_app`)
pub fn set_logger_if_needed(printer: Box<dyn LogPrinter>) {
    let mut sink = sink();
    if sink.printer.is_none() {
        sink.printer = Some(printer);
    }
}

pub fn set_log_level(level: LogLevel) {
    sink().min_level = level;
}

pub fn log_with_level(level: LogLevel, message: &str) {
    let sink = sink();
    if level < sink.min_level {
        return;
    }
    let Some(printer) = sink.printer.as_ref() else {
        return;
    };

    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    printer.print(level, &format!("[{}] {}", timestamp, message));
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

/// stdout printer для headless прогонов
pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn print(&self, level: LogLevel, line: &str) {
        println!("[{:<5}] {}", level.label(), line);
    }
}

/// Копит строки в памяти (проверка логов в тестах, replay отчёты)
#[derive(Clone, Default)]
pub struct BufferLogger {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl BufferLogger {
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }
}

impl LogPrinter for BufferLogger {
    fn print(&self, level: LogLevel, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, line.to_string()));
        }
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}
