//! Access logging codec.

use ruststack_bucket_model::resource::LoggingConfig;
use ruststack_bucket_model::types::{BucketLoggingStatus, LoggingEnabled};

use super::non_empty;

/// Expand logging. An empty config expands to a status that disables logging.
#[must_use]
pub fn expand_logging(logging: &LoggingConfig) -> BucketLoggingStatus {
    if logging.is_empty() {
        return BucketLoggingStatus::default();
    }
    BucketLoggingStatus {
        logging_enabled: Some(LoggingEnabled {
            target_bucket: logging.target_bucket.clone(),
            target_prefix: logging.target_prefix.clone().unwrap_or_default(),
        }),
    }
}

/// Flatten logging. `None` when logging is disabled.
#[must_use]
pub fn flatten_logging(status: &BucketLoggingStatus) -> Option<LoggingConfig> {
    status.logging_enabled.as_ref().map(|enabled| LoggingConfig {
        target_bucket: enabled.target_bucket.clone(),
        target_prefix: non_empty(Some(&enabled.target_prefix)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_round_trip_logging() {
        let logging = LoggingConfig {
            target_bucket: "log-bucket".to_owned(),
            target_prefix: Some("log/".to_owned()),
        };
        assert_eq!(flatten_logging(&expand_logging(&logging)), Some(logging));
    }

    #[test]
    fn test_should_disable_logging_for_empty_config() {
        let status = expand_logging(&LoggingConfig::default());
        assert!(status.logging_enabled.is_none());
        assert_eq!(flatten_logging(&status), None);
    }

    #[test]
    fn test_should_drop_empty_target_prefix() {
        let logging = LoggingConfig {
            target_bucket: "log-bucket".to_owned(),
            target_prefix: None,
        };
        let status = expand_logging(&logging);
        assert_eq!(
            status.logging_enabled.as_ref().map(|l| l.target_prefix.as_str()),
            Some("")
        );
        assert_eq!(flatten_logging(&status), Some(logging));
    }
}
