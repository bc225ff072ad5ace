//! Routes records from the `log` facade through a [`Logger`].

use crate::clock::{Clock, SystemClock};
use crate::{Level, Logger, WriteColor};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;
use std::io::Write as _;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Level {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

/// A [`log::Log`] implementation backed by a [`Logger`].
///
/// Unlike a bare `Logger`, the bridge serializes writers: each record is
/// rendered while holding a lock, so lines from different threads never mix
/// their colors.
pub struct LogBridge<W, C = SystemClock> {
    logger: Mutex<Logger<W, C>>,
    filter: LevelFilter,
}

impl<W: WriteColor, C: Clock> LogBridge<W, C> {
    pub fn new(logger: Logger<W, C>, filter: LevelFilter) -> LogBridge<W, C> {
        LogBridge { logger: Mutex::new(logger), filter }
    }

    /// Run `f` with exclusive access to the wrapped logger, e.g. to change
    /// options while records are flowing.
    pub fn with_logger<T>(&self, f: impl FnOnce(&mut Logger<W, C>) -> T) -> T {
        f(&mut self.logger.lock())
    }

    pub fn into_inner(self) -> Logger<W, C> {
        self.logger.into_inner()
    }
}

impl<W, C> Log for LogBridge<W, C>
where
    W: WriteColor + Send,
    C: Clock + Send,
{
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // The facade has nowhere to report a failed write.
        let _ = self.logger.lock().log_fmt(record.level().into(), *record.args());
    }

    fn flush(&self) {
        let _ = self.logger.lock().get_mut().flush();
    }
}

/// Install `logger` as the global `log` backend, passing records up to
/// `filter`.
pub fn install<W, C>(logger: Logger<W, C>, filter: LevelFilter) -> Result<(), SetLoggerError>
where
    W: WriteColor + Send + 'static,
    C: Clock + Send + 'static,
{
    log::set_boxed_logger(Box::new(LogBridge::new(logger, filter)))?;
    log::set_max_level(filter);
    Ok(())
}
