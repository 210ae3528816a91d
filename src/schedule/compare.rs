use crate::schedule::model::{MergedPeriod, ProcessedSchedule, ScheduleAddress};

/// Exact, order-sensitive equality between two processed schedules.
///
/// A missing queue compares equal to an empty one.
pub fn schedules_equal(a: &ProcessedSchedule, b: &ProcessedSchedule) -> bool {
    a.update_date == b.update_date
        && addresses_equal(&a.address, &b.address)
        && a.periods.len() == b.periods.len()
        && a.periods.iter().zip(&b.periods).all(|(x, y)| periods_equal(x, y))
}

fn addresses_equal(a: &ScheduleAddress, b: &ScheduleAddress) -> bool {
    a.city == b.city
        && a.street == b.street
        && a.building == b.building
        && a.queue.as_deref().unwrap_or_default() == b.queue.as_deref().unwrap_or_default()
}

fn periods_equal(a: &MergedPeriod, b: &MergedPeriod) -> bool {
    a.start_time == b.start_time && a.end_time == b.end_time && a.date == b.date
}

/// Whether `current` must be delivered given the last notified snapshot
pub fn should_notify(current: &ProcessedSchedule, last_notified: Option<&ProcessedSchedule>) -> bool {
    match last_notified {
        Some(previous) => !schedules_equal(current, previous),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProcessedSchedule {
        ProcessedSchedule {
            update_date: Some("26.11.2025 10:15".to_string()),
            address: ScheduleAddress {
                city: "Kyiv".to_string(),
                street: "Main".to_string(),
                building: "1".to_string(),
                queue: Some("Queue 3.1".to_string()),
            },
            periods: vec![
                MergedPeriod::new("06:00", "08:00").with_date("26.11.25"),
                MergedPeriod::new("12:30", "14:00").with_date("26.11.25"),
            ],
        }
    }

    #[test]
    fn test_reflexive() {
        let schedule = sample();
        assert!(schedules_equal(&schedule, &schedule));
        assert!(schedules_equal(&ProcessedSchedule::default(), &ProcessedSchedule::default()));
    }

    #[test]
    fn test_detects_single_field_changes() {
        let base = sample();
        let mut variants = Vec::new();

        let mut changed = base.clone();
        changed.update_date = None;
        variants.push(changed);

        let mut changed = base.clone();
        changed.address.city = "Lviv".to_string();
        variants.push(changed);

        let mut changed = base.clone();
        changed.address.street = "Other".to_string();
        variants.push(changed);

        let mut changed = base.clone();
        changed.address.building = "2".to_string();
        variants.push(changed);

        let mut changed = base.clone();
        changed.address.queue = Some("Queue 1.1".to_string());
        variants.push(changed);

        let mut changed = base.clone();
        changed.periods[1].end_time = "14:30".to_string();
        variants.push(changed);

        let mut changed = base.clone();
        changed.periods[0].start_time = "05:30".to_string();
        variants.push(changed);

        let mut changed = base.clone();
        changed.periods[0].date = None;
        variants.push(changed);

        let mut changed = base.clone();
        changed.periods.pop();
        variants.push(changed);

        for variant in &variants {
            assert!(!schedules_equal(&base, variant), "not detected: {:?}", variant);
            assert!(!schedules_equal(variant, &base));
        }
    }

    #[test]
    fn test_order_sensitive() {
        let base = sample();
        let mut reversed = base.clone();
        reversed.periods.reverse();
        assert!(!schedules_equal(&base, &reversed));
    }

    #[test]
    fn test_missing_queue_equals_empty_queue() {
        let mut a = sample();
        let mut b = sample();
        a.address.queue = None;
        b.address.queue = Some(String::new());
        assert!(schedules_equal(&a, &b));
    }

    #[test]
    fn test_should_notify_policy() {
        let schedule = sample();
        assert!(should_notify(&schedule, None));
        assert!(!should_notify(&schedule, Some(&schedule.clone())));
        assert!(should_notify(&schedule, Some(&ProcessedSchedule::default())));
    }
}
