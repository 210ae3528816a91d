use crate::schedule::cell::CellClassification;
use crate::schedule::merge::merge_cells;
use serde::{Deserialize, Serialize};

/// Current version of the persisted schedule record
pub const SCHEDULE_RECORD_VERSION: u32 = 1;

/// Address whose schedule is requested from the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

impl AddressQuery {
    /// Create a query for a city; values are trimmed
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into().trim().to_string(), street: None, building: None }
    }

    /// Builder method: set street (blank values leave it unset)
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = non_blank(street.into());
        self
    }

    /// Builder method: set building (blank values leave it unset)
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = non_blank(building.into());
        self
    }

    /// Human readable `city, street, building` form for logs
    pub fn describe(&self) -> String {
        let mut parts = vec![self.city.as_str()];
        parts.extend(self.street.as_deref());
        parts.extend(self.building.as_deref());
        parts.join(", ")
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Address block carried by persisted and processed schedules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleAddress {
    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub street: String,

    #[serde(default)]
    pub building: String,

    /// Queue / group the address belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

impl ScheduleAddress {
    /// Address block for a query; absent parts become empty strings
    pub fn from_query(query: &AddressQuery, queue: Option<String>) -> Self {
        Self {
            city: query.city.clone(),
            street: query.street.clone().unwrap_or_default(),
            building: query.building.clone().unwrap_or_default(),
            queue,
        }
    }
}

/// One classified table cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "className", alias = "classification")]
    pub classification: CellClassification,

    /// `"HH-HH"` label of the column the cell sits in
    #[serde(rename = "timeSlot", alias = "timeSlotLabel")]
    pub time_slot: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CellRecord {
    pub fn new(classification: CellClassification, time_slot: impl Into<String>) -> Self {
        Self { classification, time_slot: time_slot.into(), date: None }
    }

    /// Builder method: set date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder method: set an optional date
    pub fn with_optional_date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }
}

/// A maximal contiguous outage interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPeriod {
    /// `HH:MM`
    pub start_time: String,

    /// `HH:MM`
    pub end_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl MergedPeriod {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self { start_time: start_time.into(), end_time: end_time.into(), date: None }
    }

    /// Builder method: set date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Schedule as compared and delivered to subscribers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,

    #[serde(default)]
    pub address: ScheduleAddress,

    #[serde(default)]
    pub periods: Vec<MergedPeriod>,
}

/// Raw schedule record written every cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSchedule {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,

    #[serde(default)]
    pub address: ScheduleAddress,

    #[serde(default)]
    pub outages: Vec<CellRecord>,
}

fn default_version() -> u32 {
    SCHEDULE_RECORD_VERSION
}

impl PersistedSchedule {
    pub fn new(address: ScheduleAddress, outages: Vec<CellRecord>) -> Self {
        Self { version: SCHEDULE_RECORD_VERSION, update_date: None, address, outages }
    }

    /// Builder method: set update date
    pub fn with_update_date(mut self, update_date: Option<String>) -> Self {
        self.update_date = update_date;
        self
    }

    /// Merge the raw cells into the comparable, notifiable form
    pub fn process(&self) -> ProcessedSchedule {
        ProcessedSchedule {
            update_date: self.update_date.clone(),
            address: self.address.clone(),
            periods: merge_cells(&self.outages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_address_query_builder() {
        let query = AddressQuery::new(" Kyiv ").with_street("  ").with_building("12A");

        assert_eq!(query.city, "Kyiv");
        assert_eq!(query.street, None);
        assert_eq!(query.building.as_deref(), Some("12A"));
        assert_eq!(query.describe(), "Kyiv, 12A");
    }

    #[test]
    fn test_schedule_address_from_query() {
        let query = AddressQuery::new("Kyiv").with_street("Main");
        let address = ScheduleAddress::from_query(&query, Some("Queue 3.1".to_string()));

        assert_eq!(address.street, "Main");
        assert_eq!(address.building, "");
        assert_eq!(address.queue.as_deref(), Some("Queue 3.1"));
    }

    #[test]
    fn test_persisted_record_shape() {
        let record = PersistedSchedule::new(
            ScheduleAddress { city: "Kyiv".into(), ..Default::default() },
            vec![CellRecord::new(CellClassification::FirstHalf, "09-10").with_date("26.11.25")],
        )
        .with_update_date(Some("26.11.2025 10:15".to_string()));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "version": 1,
                "updateDate": "26.11.2025 10:15",
                "address": {"city": "Kyiv", "street": "", "building": ""},
                "outages": [{"className": "cell-first-half", "timeSlot": "09-10", "date": "26.11.25"}]
            })
        );
    }

    #[test]
    fn test_persisted_record_defaults_on_missing() {
        let json = r#"{"address": {"city": "Kyiv"}, "outages": [{"className": "cell-scheduled", "timeSlot": "06-07"}]}"#;
        let record: PersistedSchedule = serde_json::from_str(json).unwrap();

        assert_eq!(record.version, SCHEDULE_RECORD_VERSION);
        assert_eq!(record.update_date, None);
        assert_eq!(record.address.street, "");
        assert_eq!(record.outages[0].classification, CellClassification::Full);
        assert_eq!(record.outages[0].date, None);

        let empty: PersistedSchedule = serde_json::from_str("{}").unwrap();
        assert!(empty.outages.is_empty());
    }

    #[test]
    fn test_process_merges_cells() {
        let record = PersistedSchedule::new(
            ScheduleAddress::default(),
            vec![
                CellRecord::new(CellClassification::Full, "06-07"),
                CellRecord::new(CellClassification::Full, "07-08"),
            ],
        );

        let processed = record.process();
        assert_eq!(processed.periods, vec![MergedPeriod::new("06:00", "08:00")]);
        assert_eq!(processed.update_date, None);
    }

    #[test]
    fn test_processed_schedule_json() {
        let schedule = ProcessedSchedule {
            update_date: None,
            address: ScheduleAddress::default(),
            periods: vec![MergedPeriod::new("05:30", "06:00").with_date("26.11.25")],
        };

        let json = serde_json::to_string(&schedule).unwrap();
        assert!(json.contains("\"startTime\":\"05:30\""));
        assert!(!json.contains("updateDate"));

        let back: ProcessedSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }
}
