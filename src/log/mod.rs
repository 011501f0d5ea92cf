//! Logging for the crate. Re-exports the five `log` macros (`error!`, `warn!`, `info!`,
//! `debug!`, `trace!`) and keeps a single global set of filters.
//!
//! Logging is off until a level is set. The runner derives the filters from `-v` and
//! `--log-level`; library users call [`set_log_level`] and [`set_module_filter`], or
//! hand a whole directive string to [`apply_directives`]:
//!
//! ```rust
//! use seqiahr::log::{apply_directives, set_log_level, LevelFilter};
//!
//! // Warnings everywhere, every step a node takes, and registry activity.
//! apply_directives("warn,seqiahr::step=trace,seqiahr::model=debug").unwrap();
//! set_log_level(LevelFilter::Off);
//! ```
//!
//! Messages go to standard error, so a report written to standard output stays clean.
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

pub use log::{debug, error, info, trace, warn, LevelFilter};

use crate::error::SeqiahrError;

static FILTERS: LazyLock<Mutex<LogFilters>> = LazyLock::new(Mutex::default);

/// One item of a directive string: a bare level for every target, or `module=level`
/// for one module path and everything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Global(LevelFilter),
    Module(String, LevelFilter),
}

fn parse_level(text: &str) -> Result<LevelFilter, SeqiahrError> {
    LevelFilter::from_str(text.trim())
        .map_err(|_| SeqiahrError::from(format!("unknown log level `{}`", text.trim())))
}

impl FromStr for Directive {
    type Err = SeqiahrError;

    fn from_str(item: &str) -> Result<Self, Self::Err> {
        match item.split_once('=') {
            Some((module, level)) => {
                let module = module.trim();
                if module.is_empty() {
                    return Err(format!("missing module path in `{item}`").into());
                }
                Ok(Directive::Module(module.to_string(), parse_level(level)?))
            }
            None => Ok(Directive::Global(parse_level(item)?)),
        }
    }
}

/// Splits a comma separated directive string such as `info,seqiahr::node=debug`.
/// Empty items are skipped.
///
/// # Errors
///
/// Returns an error naming the first level or item that cannot be read.
pub fn parse_directives(spec: &str) -> Result<Vec<Directive>, SeqiahrError> {
    spec.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(Directive::from_str)
        .collect()
}

/// The global level and the per-module overrides, plus whatever the active backend
/// needs to swap its configuration.
#[derive(Debug)]
pub(in crate::log) struct LogFilters {
    pub(in crate::log) level: LevelFilter,
    pub(in crate::log) modules: BTreeMap<String, LevelFilter>,

    #[cfg(feature = "logging")]
    handle: Option<log4rs::Handle>,
}

impl Default for LogFilters {
    fn default() -> Self {
        LogFilters {
            level: LevelFilter::Off,
            modules: BTreeMap::new(),

            #[cfg(feature = "logging")]
            handle: None,
        }
    }
}

impl LogFilters {
    /// Applies `directives` in order; the backend is reinstalled once, and only if a
    /// filter actually changed.
    fn apply(&mut self, directives: &[Directive]) {
        let mut changed = false;
        for directive in directives {
            changed |= match directive {
                Directive::Global(level) => std::mem::replace(&mut self.level, *level) != *level,
                Directive::Module(module, level) => {
                    self.modules.insert(module.clone(), *level) != Some(*level)
                }
            };
        }
        if changed {
            self.install();
        }
    }

    fn remove(&mut self, module: &str) {
        if self.modules.remove(module).is_some() {
            self.install();
        }
    }
}

fn filters() -> MutexGuard<'static, LogFilters> {
    FILTERS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets the level for every target without its own filter. `LevelFilter::Off`
/// silences them.
pub fn set_log_level(level: LevelFilter) {
    filters().apply(&[Directive::Global(level)]);
}

/// Sets the level for `module` (for example `"seqiahr::step"`) and its submodules.
pub fn set_module_filter(module: &str, level: LevelFilter) {
    filters().apply(&[Directive::Module(module.to_string(), level)]);
}

/// Drops the filter for `module`; the global level applies to it again.
pub fn remove_module_filter(module: &str) {
    filters().remove(module);
}

/// Parses and applies a directive string in one go, returning what was applied.
///
/// # Errors
///
/// Returns an error if any item is malformed, in which case nothing is applied.
pub fn apply_directives(spec: &str) -> Result<Vec<Directive>, SeqiahrError> {
    let directives = parse_directives(spec)?;
    filters().apply(&directives);
    Ok(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The filters are process-wide; tests that change them take this lock.
    static SERIAL: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    fn reset() {
        let mut filters = filters();
        filters.modules.clear();
        filters.apply(&[Directive::Global(LevelFilter::Off)]);
    }

    #[test]
    fn parses_levels_and_module_items() {
        assert_eq!(
            parse_directives("info, seqiahr::step = TRACE,,").unwrap(),
            vec![
                Directive::Global(LevelFilter::Info),
                Directive::Module("seqiahr::step".to_string(), LevelFilter::Trace),
            ]
        );
        assert!(parse_directives("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_items() {
        assert!(matches!(
            "loud".parse::<Directive>(),
            Err(SeqiahrError::SeqiahrError(ref message)) if message == "unknown log level `loud`"
        ));
        assert!("=debug".parse::<Directive>().is_err());
        assert!(parse_directives("info,seqiahr::node=chatty").is_err());
    }

    #[test]
    fn malformed_string_applies_nothing() {
        let _guard = SERIAL.lock().unwrap();
        reset();
        assert!(apply_directives("debug,seqiahr::node=chatty").is_err());
        assert_eq!(filters().level, LevelFilter::Off);
        assert!(filters().modules.is_empty());
    }

    #[test]
    fn applies_global_and_module_filters() {
        let _guard = SERIAL.lock().unwrap();
        reset();
        let applied = apply_directives("trace,seqiahr::step=error,seqiahr::node=debug").unwrap();
        assert_eq!(applied.len(), 3);
        {
            let filters = filters();
            assert_eq!(filters.level, LevelFilter::Trace);
            assert_eq!(filters.modules.get("seqiahr::step"), Some(&LevelFilter::Error));
            assert_eq!(filters.modules.get("seqiahr::node"), Some(&LevelFilter::Debug));
        }
        assert_eq!(log::max_level(), LevelFilter::Trace);
        trace!("emitted while the global level is trace");

        remove_module_filter("seqiahr::step");
        set_module_filter("seqiahr::node", LevelFilter::Warn);
        {
            let filters = filters();
            assert!(!filters.modules.contains_key("seqiahr::step"));
            assert_eq!(filters.modules.get("seqiahr::node"), Some(&LevelFilter::Warn));
        }

        set_log_level(LevelFilter::Error);
        assert_eq!(filters().level, LevelFilter::Error);
        reset();
    }
}
