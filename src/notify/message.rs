use crate::schedule::{MergedPeriod, ProcessedSchedule, ScheduleAddress};
use chrono::NaiveDate;
use indexmap::IndexMap;

const UNDATED: &str = "Date not specified";

/// Render a schedule as a Telegram-flavoured HTML message.
///
/// Periods are grouped by date in calendar order; periods without a date come last.
pub fn render_message(schedule: &ProcessedSchedule) -> String {
    let mut lines = vec!["🔌 <b>Power outage schedule</b>".to_string()];

    let place = address_line(&schedule.address);
    if !place.is_empty() {
        lines.push(format!("🏠 {}", escape(&place)));
    }
    if let Some(queue) = &schedule.address.queue {
        lines.push(format!("📍 <b>{}</b>", escape(queue)));
    }
    if let Some(updated) = &schedule.update_date {
        lines.push(format!("📅 <b>Updated:</b> {}", escape(updated)));
    }

    if schedule.periods.is_empty() {
        lines.push(String::new());
        lines.push("✅ <b>No outages planned</b>".to_string());
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push("⏰ <b>Outage periods:</b>".to_string());

    for (date, periods) in group_by_date(&schedule.periods) {
        lines.push(String::new());
        lines.push(format!("📆 <b>{}:</b>", escape(date.unwrap_or(UNDATED))));
        for period in periods {
            lines.push(format!("🕯️ {} - {}", period.start_time, period.end_time));
        }
    }

    lines.join("\n")
}

fn address_line(address: &ScheduleAddress) -> String {
    [&address.city, &address.street, &address.building]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn group_by_date(periods: &[MergedPeriod]) -> Vec<(Option<&str>, Vec<&MergedPeriod>)> {
    let mut groups: IndexMap<Option<&str>, Vec<&MergedPeriod>> = IndexMap::new();
    for period in periods {
        groups.entry(period.date.as_deref()).or_default().push(period);
    }

    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| date_key(*a).cmp(&date_key(*b)));
    groups
}

/// Undated last, then calendar dates, then anything unparseable by text
fn date_key(date: Option<&str>) -> (bool, Option<NaiveDate>, String) {
    match date {
        None => (true, None, String::new()),
        Some(text) => {
            let parsed = ["%d.%m.%y", "%d.%m.%Y"]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok());
            // unparseable dates sort after parseable ones
            (false, parsed.map_or(Some(NaiveDate::MAX), Some), text.to_string())
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn address() -> ScheduleAddress {
        ScheduleAddress {
            city: "Kyiv".to_string(),
            street: "Main".to_string(),
            building: String::new(),
            queue: Some("Queue 3.1".to_string()),
        }
    }

    #[test]
    fn test_empty_schedule_message() {
        let schedule = ProcessedSchedule {
            update_date: Some("26.11.2025 10:15".to_string()),
            address: address(),
            periods: vec![],
        };

        assert_eq!(
            render_message(&schedule),
            "🔌 <b>Power outage schedule</b>\n\
             🏠 Kyiv, Main\n\
             📍 <b>Queue 3.1</b>\n\
             📅 <b>Updated:</b> 26.11.2025 10:15\n\
             \n\
             ✅ <b>No outages planned</b>"
        );
    }

    #[test]
    fn test_periods_grouped_by_calendar_date() {
        let schedule = ProcessedSchedule {
            update_date: None,
            address: ScheduleAddress { queue: None, ..address() },
            periods: vec![
                MergedPeriod::new("20:00", "22:00"),
                MergedPeriod::new("08:00", "10:00").with_date("01.12.25"),
                MergedPeriod::new("00:00", "01:30").with_date("30.11.25"),
                MergedPeriod::new("12:00", "13:00").with_date("01.12.25"),
            ],
        };

        assert_eq!(
            render_message(&schedule),
            "🔌 <b>Power outage schedule</b>\n\
             🏠 Kyiv, Main\n\
             \n\
             ⏰ <b>Outage periods:</b>\n\
             \n\
             📆 <b>30.11.25:</b>\n\
             🕯️ 00:00 - 01:30\n\
             \n\
             📆 <b>01.12.25:</b>\n\
             🕯️ 08:00 - 10:00\n\
             🕯️ 12:00 - 13:00\n\
             \n\
             📆 <b>Date not specified:</b>\n\
             🕯️ 20:00 - 22:00"
        );
    }

    #[test]
    fn test_unparseable_dates_after_calendar_dates() {
        assert!(date_key(Some("30.11.25")) < date_key(Some("tomorrow")));
        assert!(date_key(Some("tomorrow")) < date_key(None));
        assert!(date_key(Some("31.12.2025")) < date_key(Some("01.01.26")));
    }

    #[test]
    fn test_markup_is_escaped() {
        let schedule = ProcessedSchedule {
            update_date: None,
            address: ScheduleAddress { queue: Some("<Queue & 1>".to_string()), ..Default::default() },
            periods: vec![],
        };

        let message = render_message(&schedule);
        assert!(message.contains("📍 <b>&lt;Queue &amp; 1&gt;</b>"), "{}", message);
        assert!(!message.contains("🏠"));
    }
}
