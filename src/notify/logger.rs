use crate::notify::{Delivery, Notifier, render_message};
use crate::schedule::ProcessedSchedule;

/// Writes the rendered message to the log at info level
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn deliver(&self, schedule: &ProcessedSchedule) -> Delivery {
        log::info!("Schedule changed:\n{}", render_message(schedule));
        Delivery::delivered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_always_delivers() {
        let notifier = LogNotifier;
        assert_eq!(notifier.name(), "log");
        assert!(notifier.deliver(&ProcessedSchedule::default()).delivered);
    }
}
