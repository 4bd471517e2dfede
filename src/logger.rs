//! Console logger behind the `log` facade: colored lines while developing,
//! one JSON object per line in release builds.

use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

static COLOR_LOGGER: Lazy<ColorLogger> = Lazy::new(ColorLogger::default);

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let filter = config.min_level;
    COLOR_LOGGER.update_config(config);

    log::set_logger(&*COLOR_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))?;
    log::set_max_level(filter);
    Ok(())
}

/// Development config for debug builds, production for release builds.
pub fn config_for_build() -> LoggerConfig {
    if cfg!(debug_assertions) {
        LoggerConfig::development()
    } else {
        LoggerConfig::production()
    }
}

fn level_badge(level: Level) -> (&'static str, Color) {
    match level {
        Level::Trace => ("🔍", Color::Cyan),
        Level::Debug => ("🐛", Color::Blue),
        Level::Info => ("🖍️", Color::Green),
        Level::Warn => ("⚠️", Color::Yellow),
        Level::Error => ("❌", Color::Red),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level: record.level().to_string(),
            message: record.args().to_string(),
            module: record.module_path().unwrap_or("unknown").to_string(),
            file: record.file().unwrap_or("unknown").to_string(),
            line: record.line().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LevelFilter,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_file_location: bool,
    pub timestamp_format: String,
    pub output_json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LevelFilter::Info,
            show_colors: true,
            show_emojis: true,
            show_file_location: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
        }
    }
}

impl LoggerConfig {
    pub fn development() -> Self {
        Self {
            min_level: LevelFilter::Debug,
            show_file_location: true,
            ..Default::default()
        }
    }

    pub fn production() -> Self {
        Self {
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }
}

#[derive(Default)]
pub struct ColorLogger {
    config: Mutex<LoggerConfig>,
}

impl ColorLogger {
    pub fn update_config(&self, config: LoggerConfig) {
        *self.config.lock().unwrap_or_else(|e| e.into_inner()) = config;
    }

    fn format_line(&self, entry: &LogEntry, level: Level, config: &LoggerConfig) -> String {
        if config.output_json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let (emoji, color) = level_badge(level);
        let label = if config.show_emojis {
            format!("{} {}", emoji, entry.level)
        } else {
            entry.level.clone()
        };
        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        let location = format!("({}:{})", entry.file, entry.line);

        let mut line = if config.show_colors {
            format!(
                "{} [{}] {}::{}",
                timestamp.bright_black(),
                label.color(color).bold(),
                entry.module.bright_blue(),
                entry.message
            )
        } else {
            format!("{} [{}] {}::{}", timestamp, label, entry.module, entry.message)
        };

        if config.show_file_location {
            line.push(' ');
            if config.show_colors {
                line.push_str(&location.bright_black().to_string());
            } else {
                line.push_str(&location);
            }
        }
        line
    }
}

impl log::Log for ColorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.config
            .lock()
            .map(|config| metadata.level() <= config.min_level)
            .unwrap_or(true)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        if let Ok(config) = self.config.lock() {
            println!("{}", self.format_line(&entry, record.level(), &config));
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Logs how long a block took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  {} finished in {}ms",
            self.name,
            self.start.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    log::debug!("⏱️  Starting timer: {}", name);
    Timer {
        start: Instant::now(),
        name: name.to_string(),
    }
}

pub fn log_startup_info(app_name: &str, version: &str, port: u16) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("🌐 Coloring page form on http://127.0.0.1:{}", port);
}

pub fn log_config_info(config: &crate::config::Config) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Endpoint: {}", config.generations_url());
    log::info!("   Model: {} ({})", config.model, config.size);
    log::info!(
        "   API key: {}",
        if config.api_key.is_some() { "✅" } else { "❌ missing" }
    );
    match config.timeout {
        Some(timeout) => log::info!("   Request timeout: {}s", timeout.as_secs()),
        None => log::info!("   Request timeout: none"),
    }
}
