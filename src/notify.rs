use crate::error::FetchError;
use std::io::Write;

/// User-facing channel for fetch failures.
pub trait Notifier {
    fn alert(&self, error: &FetchError);
}

/// Writes one `Error: <name>: <detail>` line per alert.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, error: &FetchError) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", alert_message(error));
    }
}

pub fn alert_message(error: &FetchError) -> String {
    format!("Error: {}: {}", error.name(), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;

    #[test]
    fn test_alert_message_leads_with_name() {
        let err: FetchError = FeedError::InvalidProfileUrl("https://github.com/".to_string()).into();
        let msg = alert_message(&err);
        assert!(msg.starts_with("Error: InputError: "));
        assert!(msg.contains("no username"));
    }
}
