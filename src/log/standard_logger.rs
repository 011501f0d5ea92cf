use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::LogFilters;

// ISO 8601 timestamp, color coded level, target
const PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
const APPENDER: &str = "stderr";

impl LogFilters {
    /// Builds a log4rs config from the current filters and installs it, replacing the
    /// config installed by an earlier call.
    pub(in crate::log) fn install(&mut self) {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build();
        let loggers = self
            .modules
            .iter()
            .map(|(module, level)| Logger::builder().build(module.as_str(), *level));
        let config = Config::builder()
            .appender(Appender::builder().build(APPENDER, Box::new(stderr)))
            .loggers(loggers)
            .build(Root::builder().appender(APPENDER).build(self.level));
        let config = match config {
            Ok(config) => config,
            Err(e) => {
                eprintln!("invalid logging configuration: {e}");
                return;
            }
        };

        if let Some(handle) = &self.handle {
            handle.set_config(config);
            return;
        }
        match log4rs::init_config(config) {
            Ok(handle) => self.handle = Some(handle),
            // Another logger owns the process; keep `log`'s own level in step with ours.
            Err(e) => {
                eprintln!("failed to install logger: {e}");
                log::set_max_level(self.level);
            }
        }
    }
}
