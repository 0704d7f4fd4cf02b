//! Browser Console Logger
//!
//! `log` backend that writes each record to the matching `console` method.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install the console logger; later calls only adjust the level
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
}

fn format_record(level: Level, target: &str, args: &std::fmt::Arguments<'_>) -> String {
    format!("[{level:<5} {target}] {args}")
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from(format_record(record.level(), record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug => web_sys::console::log_1(&line),
            Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        let line = format_record(Level::Warn, "task_sync_ui::view_model", &format_args!("add failed: {}", 3));
        assert_eq!(line, "[WARN  task_sync_ui::view_model] add failed: 3");
    }
}
