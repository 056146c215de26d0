use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// Writes timestamped log lines to stderr
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    /// `verbosity` counts `-v` flags: none shows info, one debug, two or more trace.
    pub fn new(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%H:%M:%S%.3f");
        let mut stderr = std::io::stderr().lock();
        let _ = match record.level() {
            Level::Error | Level::Warn => writeln!(
                stderr,
                "{} {:<5} [{}] {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            ),
            _ => writeln!(stderr, "{} {:<5} {}", timestamp, record.level(), record.args()),
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_verbosity_levels() {
        let quiet = StderrLogger::new(0);
        assert!(quiet.enabled(&Metadata::builder().level(Level::Info).build()));
        assert!(!quiet.enabled(&Metadata::builder().level(Level::Debug).build()));

        let verbose = StderrLogger::new(1);
        assert!(verbose.enabled(&Metadata::builder().level(Level::Debug).build()));
        assert!(!verbose.enabled(&Metadata::builder().level(Level::Trace).build()));

        assert!(StderrLogger::new(5).enabled(&Metadata::builder().level(Level::Trace).build()));
    }
}
