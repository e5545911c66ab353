//! Build-log noise filtering.
//!
//! The external renderer reports every source file it copies, reads, and
//! writes, which buries real errors. The filter removes lines matching
//! the configured noise patterns and keeps everything else in order.

use regex::RegexSet;

use crate::BuildError;

/// Line filter over a set of noise patterns.
#[derive(Debug)]
pub struct LogFilter {
    patterns: RegexSet,
}

impl LogFilter {
    /// Compile a filter from regex patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid regex.
    pub fn new<P: AsRef<str>>(patterns: &[P]) -> Result<Self, BuildError> {
        Ok(Self {
            patterns: RegexSet::new(patterns.iter().map(AsRef::as_ref))?,
        })
    }

    /// Remove noise lines from a log, preserving the order of the rest.
    #[must_use]
    pub fn filter(&self, log: &str) -> String {
        log.lines()
            .filter(|line| !self.patterns.is_match(line))
            .map(|line| format!("{line}\n"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise_filter() -> LogFilter {
        LogFilter::new(&["copying ", "reading sources", "writing output"]).unwrap()
    }

    #[test]
    fn test_noise_lines_removed_order_preserved() {
        let log = "Running builder\n\
                   copying static files\n\
                   reading sources... [ 50%] intro\n\
                   first kept line\n\
                   writing output... [100%] intro\n\
                   second kept line\n";
        assert_eq!(
            noise_filter().filter(log),
            "Running builder\nfirst kept line\nsecond kept line\n"
        );
    }

    #[test]
    fn test_all_noise_yields_empty() {
        let log = "copying a\ncopying b\n";
        assert_eq!(noise_filter().filter(log), "");
    }

    #[test]
    fn test_no_patterns_keeps_everything() {
        let filter = LogFilter::new::<&str>(&[]).unwrap();
        let log = "copying a\nerror: boom\n";
        assert_eq!(filter.filter(log), log);
    }

    #[test]
    fn test_error_lines_survive() {
        let log = "copying a\nERROR: toc entry missing\ncopying b\n";
        assert_eq!(noise_filter().filter(log), "ERROR: toc entry missing\n");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = LogFilter::new(&["["]).unwrap_err();
        assert!(matches!(err, BuildError::Pattern(_)));
    }
}
