//! Backend for builds without the `logging` feature. Filters are still recorded so the
//! public API behaves the same, but nothing is written anywhere.

use crate::log::LogFilters;

impl LogFilters {
    /// Raises `log`'s max level to the loudest configured filter.
    pub(in crate::log) fn install(&mut self) {
        let loudest = self.modules.values().copied().fold(self.level, std::cmp::max);
        log::set_max_level(loudest);
    }
}
