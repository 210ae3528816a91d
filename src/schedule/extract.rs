//! Rendered page → raw cell records
//!
//! The primary path walks the fact tables of the rendered schedule page. When
//! no schedule container is present, or it yields nothing, the payload is
//! retried as a JSON document holding an array of records.

use crate::schedule::cell::{CellClassification, TimeSlot, parse_clock};
use crate::schedule::model::{AddressQuery, CellRecord, PersistedSchedule, ScheduleAddress};
use chrono::DateTime;
use chrono_tz::Tz;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

const CONTAINER_SELECTORS: [&str; 3] = ["#discon-fact", "#tableRenderElem", ".discon-schedule-table"];

static CONTAINERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTAINER_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .collect()
});
static FACT_TABLE: LazyLock<Selector> = LazyLock::new(|| selector(".discon-fact-table"));
static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("thead th"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static DATE_TAB: LazyLock<Selector> = LazyLock::new(|| selector(".date[rel]"));
static DATE_TEXT: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[rel="date"]"#));
static UPDATE_TEXT: LazyLock<Selector> = LazyLock::new(|| selector("span.update"));
static GROUP_NAME: LazyLock<Selector> = LazyLock::new(|| selector("#group-name"));

static SLOT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s*[-–—]\s*(\d{1,2})").expect("slot label pattern is valid"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector '{}': {}", css, e))
}

const CLASS_KEYS: [&str; 4] = ["className", "class", "classification", "type"];
const SLOT_KEYS: [&str; 5] = ["timeSlot", "time_slot", "timeSlotLabel", "slot", "time"];
const DATE_KEYS: [&str; 2] = ["date", "day"];
const START_KEYS: [&str; 3] = ["start", "startTime", "from"];
const END_KEYS: [&str; 3] = ["end", "endTime", "to"];

/// Where the extracted cells came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionSource {
    Markup,
    Json,
    #[default]
    Empty,
}

/// Result of extracting one payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub cells: Vec<CellRecord>,
    pub update_date: Option<String>,
    pub queue: Option<String>,
    /// Address block: query values unless the payload names its own
    pub address: ScheduleAddress,
    pub source: ExtractionSource,
}

impl Extraction {
    /// Build the persisted record for this extraction
    pub fn into_record(self) -> PersistedSchedule {
        let mut address = self.address;
        address.queue = self.queue;
        PersistedSchedule::new(address, self.cells).with_update_date(self.update_date)
    }
}

/// Zone the site's unix `rel` day markers are midnights of
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Kyiv;

/// Extract cells and auxiliary fields from a page or JSON payload
pub fn extract(payload: &str, address: &AddressQuery) -> Extraction {
    extract_in(payload, address, DEFAULT_TIMEZONE)
}

/// [`extract`] with unix day markers read in `timezone`
pub fn extract_in(payload: &str, address: &AddressQuery, timezone: Tz) -> Extraction {
    let mut extraction = Extraction { address: ScheduleAddress::from_query(address, None), ..Default::default() };

    if let Some(markup) = from_markup(payload, timezone) {
        extraction.update_date = markup.update_date;
        extraction.queue = markup.queue;
        if !markup.cells.is_empty() {
            extraction.cells = markup.cells;
            extraction.source = ExtractionSource::Markup;
            return extraction;
        }
        log::debug!("Schedule container found but no outage cells were recognised");
    } else {
        log::debug!("No schedule container found in payload");
    }

    match from_json(payload) {
        Some(json) => {
            log::debug!("Payload parsed as JSON, {} records mapped", json.cells.len());
            extraction.source = if json.cells.is_empty() { ExtractionSource::Empty } else { ExtractionSource::Json };
            extraction.cells = json.cells;
            extraction.update_date = extraction.update_date.or(json.update_date);
            extraction.queue = extraction.queue.or(json.queue);
            if let Some(city) = json.city {
                extraction.address.city = city;
            }
            if let Some(street) = json.street {
                extraction.address.street = street;
            }
            if let Some(building) = json.building {
                extraction.address.building = building;
            }
        }
        None => log::debug!("Fallback JSON parse found nothing usable"),
    }

    if extraction.update_date.is_none() {
        log::warn!("Update date not found on page");
    }
    if extraction.queue.is_none() {
        log::warn!("Queue / group name not found on page");
    }

    extraction
}

struct MarkupFields {
    cells: Vec<CellRecord>,
    update_date: Option<String>,
    queue: Option<String>,
}

fn from_markup(markup: &str, timezone: Tz) -> Option<MarkupFields> {
    let document = Html::parse_document(markup);
    let root = document.root_element();
    let container = CONTAINERS.iter().find_map(|sel| document.select(sel).next())?;

    let date_labels = date_labels(root);
    let mut cells = Vec::new();

    let blocks: Vec<ElementRef> = container.select(&FACT_TABLE).collect();
    if blocks.is_empty() {
        let tables: Vec<ElementRef> = if container.value().name() == "table" {
            vec![container]
        } else {
            container.select(&TABLE).collect()
        };
        for table in tables {
            let date = table_date(table, &date_labels, timezone);
            cells.extend(walk_table(table, date.as_deref()));
        }
    } else {
        for block in blocks {
            let date = table_date(block, &date_labels, timezone);
            let table = if block.value().name() == "table" { Some(block) } else { block.select(&TABLE).next() };
            match table {
                Some(table) => cells.extend(walk_table(table, date.as_deref())),
                None => log::debug!("Fact table block without a <table> skipped"),
            }
        }
    }

    let update_date = first_text(container, &UPDATE_TEXT).or_else(|| first_text(root, &UPDATE_TEXT));
    let queue = first_text(container, &GROUP_NAME).or_else(|| first_text(root, &GROUP_NAME));

    Some(MarkupFields { cells, update_date, queue })
}

/// Map of date-tab `rel` value to its visible date label
fn date_labels(root: ElementRef) -> HashMap<String, String> {
    root.select(&DATE_TAB)
        .filter_map(|tab| {
            let rel = tab.value().attr("rel")?.trim().to_string();
            let label = first_text(tab, &DATE_TEXT)?;
            Some((rel, label))
        })
        .collect()
}

fn table_date(block: ElementRef, date_labels: &HashMap<String, String>, timezone: Tz) -> Option<String> {
    if let Some(label) = first_text(block, &DATE_TEXT) {
        return Some(label);
    }

    let rel = block.value().attr("rel")?.trim();
    if let Some(label) = date_labels.get(rel) {
        return Some(label.clone());
    }

    rel.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| at.with_timezone(&timezone).format("%d.%m.%y").to_string())
}

fn walk_table(table: ElementRef, date: Option<&str>) -> Vec<CellRecord> {
    let mut header_cells: Vec<ElementRef> = table.select(&HEADER_CELL).collect();
    let mut body_rows: Vec<ElementRef> = table.select(&ROW).filter(|row| row_cells(*row, "td").next().is_some()).collect();

    if header_cells.is_empty() {
        // no <thead>: the first all-<th> row plays the header
        if let Some(header_row) = table.select(&ROW).find(|row| row_cells(*row, "td").next().is_none()) {
            header_cells = row_cells(header_row, "th").collect();
        }
    } else {
        body_rows.retain(|row| !is_inside_thead(*row));
    }

    let mut labels: Vec<Option<String>> = Vec::new();
    for cell in header_cells {
        let label = slot_label(&collapse_text(cell));
        let span = colspan(cell);
        labels.push(label);
        labels.extend(std::iter::repeat_n(None, span - 1));
    }

    if labels.iter().all(Option::is_none) {
        log::debug!("Table without time-slot headers skipped");
        return Vec::new();
    }

    let mut records = Vec::new();
    for row in body_rows {
        let mut columns: Vec<ElementRef> = Vec::new();
        for cell in row.children().filter_map(ElementRef::wrap) {
            let name = cell.value().name();
            if name == "td" || name == "th" {
                columns.extend(std::iter::repeat_n(cell, colspan(cell)));
            }
        }

        // align from the right so any number of leading label cells is skipped
        let offset = labels.len() as isize - columns.len() as isize;
        for (position, cell) in columns.into_iter().enumerate() {
            let index = position as isize + offset;
            if index < 0 {
                continue;
            }
            let Some(Some(label)) = labels.get(index as usize) else {
                continue;
            };

            let classification = CellClassification::classify(cell.value().classes());
            if !classification.is_outage() {
                continue;
            }

            records.push(CellRecord::new(classification, label.clone()).with_optional_date(date.map(str::to_string)));
        }
    }

    records
}

fn row_cells<'a>(row: ElementRef<'a>, tag: &'static str) -> impl Iterator<Item = ElementRef<'a>> {
    row.children().filter_map(ElementRef::wrap).filter(move |cell| cell.value().name() == tag)
}

fn is_inside_thead(row: ElementRef) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "thead")
}

fn colspan(cell: ElementRef) -> usize {
    cell.value()
        .attr("colspan")
        .and_then(|value| value.trim().parse::<usize>().ok())
        .map(|span| span.clamp(1, 48))
        .unwrap_or(1)
}

/// Normalise the first `H-H` pattern in a header text to `"HH-HH"`
fn slot_label(text: &str) -> Option<String> {
    let captures = SLOT_LABEL.captures(text)?;
    let start: u16 = captures.get(1)?.as_str().parse().ok()?;
    let end: u16 = captures.get(2)?.as_str().parse().ok()?;
    TimeSlot::parse(&format!("{}-{}", start, end)).map(|slot| slot.label())
}

fn collapse_text(element: ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .map(collapse_text)
        .find(|text| !text.is_empty())
}

struct JsonFields {
    cells: Vec<CellRecord>,
    update_date: Option<String>,
    queue: Option<String>,
    city: Option<String>,
    street: Option<String>,
    building: Option<String>,
}

fn from_json(payload: &str) -> Option<JsonFields> {
    let value: Value = serde_json::from_str(payload.trim()).ok()?;

    let cells = find_record_array(&value)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_object)
        .flat_map(record_to_cells)
        .collect();

    let root = value.as_object();

    Some(JsonFields {
        cells,
        update_date: root.and_then(|object| pick(object, &["updateDate", "update"])),
        queue: root.and_then(|object| pick(object, &["queue", "group"])),
        city: root.and_then(|object| pick(object, &["city", "City"])),
        street: root.and_then(|object| pick(object, &["street", "Street"])),
        building: root.and_then(|object| pick(object, &["building", "Building", "house"])),
    })
}

/// Depth-first search for the first array; object members are visited in document order
fn find_record_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(object) => {
            for member in object.values() {
                match member {
                    Value::Array(items) => return Some(items),
                    Value::Object(_) => {
                        if let Some(items) = find_record_array(member).filter(|items| !items.is_empty()) {
                            return Some(items);
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

fn record_to_cells(record: &Map<String, Value>) -> Vec<CellRecord> {
    let date = pick(record, &DATE_KEYS);

    if let (Some(class), Some(slot)) = (pick(record, &CLASS_KEYS), pick(record, &SLOT_KEYS)) {
        let classification = CellClassification::from_class_attr(&class);
        let label = slot_label(&slot);
        return match (classification.is_outage(), label) {
            (true, Some(label)) => vec![CellRecord::new(classification, label).with_optional_date(date)],
            _ => Vec::new(),
        };
    }

    let start = pick(record, &START_KEYS).and_then(|value| parse_clock(&value));
    let end = pick(record, &END_KEYS).and_then(|value| parse_clock(&value));
    match (start, end) {
        (Some(start), Some(end)) => range_to_cells(start, end)
            .into_iter()
            .map(|cell| cell.with_optional_date(date.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Decompose a half-hour aligned `[start, end)` range into equivalent cells
fn range_to_cells(start: u16, end: u16) -> Vec<CellRecord> {
    if start >= end || start % 30 != 0 || end % 30 != 0 {
        log::debug!("Record range {}..{} is not half-hour aligned, skipped", start, end);
        return Vec::new();
    }

    let slot = |hour: u16| format!("{:02}-{:02}", hour, hour + 1);
    let mut cells = Vec::new();
    let mut cursor = start;

    if cursor % 60 == 30 {
        cells.push(CellRecord::new(CellClassification::SecondHalf, slot(cursor / 60)));
        cursor += 30;
    }
    while cursor + 60 <= end {
        cells.push(CellRecord::new(CellClassification::Full, slot(cursor / 60)));
        cursor += 60;
    }
    if cursor < end {
        cells.push(CellRecord::new(CellClassification::FirstHalf, slot(cursor / 60)));
    }

    cells
}

fn pick(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key)?.as_str())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::compare::schedules_equal;
    use crate::schedule::model::MergedPeriod;
    use pretty_assertions::assert_eq;

    fn query() -> AddressQuery {
        AddressQuery::new("Kyiv").with_street("Main").with_building("1")
    }

    fn header(slots: &[&str]) -> String {
        let cells: String = slots.iter().map(|slot| format!("<th><div>{}</div></th>", slot)).collect();
        format!("<thead><tr><th colspan=\"2\">Time slots</th>{}</tr></thead>", cells)
    }

    fn row(day: &str, classes: &[&str]) -> String {
        let cells: String = classes.iter().map(|class| format!("<td class=\"{}\"></td>", class)).collect();
        format!("<tr><td>{}</td><td></td>{}</tr>", day, cells)
    }

    const FACT_PAGE: &str = r#"
        <html><body>
        <div id="group-name">  Queue
            3.1 </div>
        <div id="discon-fact">
          <div class="dates">
            <div class="date active" rel="1764108000"><div><span rel="date">26.11.25</span></div></div>
            <div class="date" rel="1764194400"><div><span rel="date">27.11.25</span></div></div>
          </div>
          <div class="discon-fact-tables">
            <div class="discon-fact-table active" rel="1764108000">
              <table>
                <thead><tr><th colspan="2">Time slots</th><th>05-06</th><th>06-07</th><th>07-08</th><th>08-09</th><th>09-10</th></tr></thead>
                <tbody><tr>
                  <td colspan="2">Wednesday</td>
                  <td class="cell-second-half"></td>
                  <td class="cell-scheduled"></td>
                  <td class="cell-scheduled-maybe"></td>
                  <td class="cell-non-scheduled"></td>
                  <td class="cell-first-half"></td>
                </tr></tbody>
              </table>
            </div>
            <div class="discon-fact-table" rel="1764194400">
              <table>
                <thead><tr><th colspan="2">Time slots</th><th>05-06</th><th>06-07</th><th>07-08</th><th>08-09</th><th>09-10</th></tr></thead>
                <tbody><tr>
                  <td colspan="2">Thursday</td>
                  <td class="cell-non-scheduled"></td>
                  <td class="cell-non-scheduled"></td>
                  <td class="cell-scheduled"></td>
                  <td class="cell-non-scheduled"></td>
                  <td class="cell-non-scheduled"></td>
                </tr></tbody>
              </table>
            </div>
          </div>
          <div class="discon-fact-info"><span class="update">26.11.2025 10:15</span></div>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_fact_tables_with_dates() {
        let extraction = extract(FACT_PAGE, &query());

        assert_eq!(extraction.source, ExtractionSource::Markup);
        assert_eq!(extraction.update_date.as_deref(), Some("26.11.2025 10:15"));
        assert_eq!(extraction.queue.as_deref(), Some("Queue 3.1"));
        assert_eq!(
            extraction.cells,
            vec![
                CellRecord::new(CellClassification::SecondHalf, "05-06").with_date("26.11.25"),
                CellRecord::new(CellClassification::Full, "06-07").with_date("26.11.25"),
                CellRecord::new(CellClassification::Full, "07-08").with_date("26.11.25"),
                CellRecord::new(CellClassification::FirstHalf, "09-10").with_date("26.11.25"),
                CellRecord::new(CellClassification::Full, "07-08").with_date("27.11.25"),
            ]
        );
    }

    #[test]
    fn test_fact_page_end_to_end_periods() {
        let record = extract(FACT_PAGE, &query()).into_record();
        let processed = record.process();

        assert_eq!(processed.address.queue.as_deref(), Some("Queue 3.1"));
        assert_eq!(processed.address.city, "Kyiv");
        assert_eq!(
            processed.periods,
            vec![
                MergedPeriod::new("05:30", "08:00").with_date("26.11.25"),
                MergedPeriod::new("09:00", "09:30").with_date("26.11.25"),
                MergedPeriod::new("07:00", "08:00").with_date("27.11.25"),
            ]
        );
    }

    #[test]
    fn test_week_table_without_dates() {
        let html = format!(
            "<div id=\"tableRenderElem\"><table>{}<tbody>{}{}</tbody></table></div>",
            header(&["00-01", "01-02", "02-03"]),
            row("Monday", &["cell-scheduled", "cell-non-scheduled", "cell-first-half"]),
            row("Tuesday", &["", "cell-second-half", "unknown"]),
        );

        let extraction = extract(&html, &query());
        assert_eq!(
            extraction.cells,
            vec![
                CellRecord::new(CellClassification::Full, "00-01"),
                CellRecord::new(CellClassification::FirstHalf, "02-03"),
                CellRecord::new(CellClassification::SecondHalf, "01-02"),
            ]
        );
        assert_eq!(extraction.update_date, None);
        assert_eq!(extraction.queue, None);
    }

    #[test]
    fn test_header_without_match_leaves_gap() {
        let html = r#"<div id="tableRenderElem"><table>
            <thead><tr><th>Day</th><th>00-01</th><th>n/a</th><th>02-03</th></tr></thead>
            <tbody><tr><td>Mon</td><td class="cell-scheduled"></td><td class="cell-scheduled"></td><td class="cell-scheduled"></td></tr></tbody>
        </table></div>"#;

        let slots: Vec<String> = extract(html, &query()).cells.into_iter().map(|cell| cell.time_slot).collect();
        assert_eq!(slots, vec!["00-01".to_string(), "02-03".to_string()]);
    }

    #[test]
    fn test_header_labels_are_normalised() {
        assert_eq!(slot_label("5 – 6"), Some("05-06".to_string()));
        assert_eq!(slot_label(" 23-24 "), Some("23-24".to_string()));
        assert_eq!(slot_label("Time slots"), None);
        assert_eq!(slot_label("30-31"), None);
    }

    #[test]
    fn test_headerless_row_labels_aligned_right() {
        // header carries only slot columns, rows carry two label cells
        let html = r#"<div class="discon-schedule-table"><table>
            <thead><tr><th>10-11</th><th>11-12</th></tr></thead>
            <tbody><tr><td>1</td><td>Mon</td><td class="cell-first-half"></td><td class="cell-scheduled"></td></tr></tbody>
        </table></div>"#;

        let extraction = extract(html, &query());
        assert_eq!(
            extraction.cells,
            vec![
                CellRecord::new(CellClassification::FirstHalf, "10-11"),
                CellRecord::new(CellClassification::Full, "11-12"),
            ]
        );
    }

    #[test]
    fn test_table_without_thead() {
        let html = r#"<div id="tableRenderElem"><table>
            <tr><th></th><th>12-13</th></tr>
            <tr><td>Fri</td><td class="cell-scheduled"></td></tr>
        </table></div>"#;

        let extraction = extract(html, &query());
        assert_eq!(extraction.cells, vec![CellRecord::new(CellClassification::Full, "12-13")]);
    }

    #[test]
    fn test_unix_rel_without_date_tab() {
        let html = r#"<div id="discon-fact"><div class="discon-fact-table" rel="1764108000"><table>
            <thead><tr><th></th><th>01-02</th></tr></thead>
            <tbody><tr><td>x</td><td class="cell-scheduled"></td></tr></tbody>
        </table></div></div>"#;

        let extraction = extract(html, &query());
        assert_eq!(extraction.cells[0].date.as_deref(), Some("26.11.25"));

        // 22:00 UTC is already the next day in Kyiv
        let utc = extract_in(html, &query(), chrono_tz::UTC);
        assert_eq!(utc.cells[0].date.as_deref(), Some("25.11.25"));
    }

    #[test]
    fn test_rel_fallback_matches_date_tab() {
        let table = r#"<div class="discon-fact-table" rel="1764108000"><table>
            <thead><tr><th></th><th>01-02</th></tr></thead>
            <tbody><tr><td>x</td><td class="cell-scheduled"></td></tr></tbody>
        </table></div>"#;
        let with_tab = format!(
            r#"<div class="date" rel="1764108000"><span rel="date">26.11.25</span></div><div id="discon-fact">{}</div>"#,
            table
        );
        let without_tab = format!(r#"<div id="discon-fact">{}</div>"#, table);

        let labelled = extract(&with_tab, &query()).into_record().process();
        let derived = extract(&without_tab, &query()).into_record().process();

        assert_eq!(labelled.periods, derived.periods);
        assert!(schedules_equal(&labelled, &derived));
    }

    #[test]
    fn test_empty_container_yields_empty_extraction() {
        let html = r#"<div id="discon-fact"><div class="discon-fact-table"><table>
            <thead><tr><th></th><th>01-02</th></tr></thead>
            <tbody><tr><td>x</td><td class="cell-non-scheduled"></td></tr></tbody>
        </table></div></div>"#;

        let extraction = extract(html, &query());
        assert!(extraction.cells.is_empty());
        assert_eq!(extraction.update_date, None);
        assert_eq!(extraction.queue, None);
        assert_eq!(extraction.source, ExtractionSource::Empty);

        let processed = extraction.into_record().process();
        assert!(processed.periods.is_empty());
        assert_eq!(processed.update_date, None);
        assert_eq!(processed.address.queue, None);
    }

    #[test]
    fn test_missing_container_is_not_fatal() {
        let extraction = extract("<html><body><p>Maintenance</p></body></html>", &query());
        assert!(extraction.cells.is_empty());
        assert_eq!(extraction.address.street, "Main");
    }

    #[test]
    fn test_json_fallback_records() {
        let payload = r#"{
            "meta": {"ok": true},
            "data": {
                "updateDate": "27.11.2025 08:00",
                "items": [
                    {"className": "cell-scheduled", "timeSlot": "06-07", "date": "27.11.25"},
                    {"class": "cell-first-half", "slot": "9-10"},
                    {"type": "cell-non-scheduled", "time": "10-11"},
                    {"from": "12:30", "to": "14:30", "day": "28.11.25"},
                    "not a record"
                ]
            },
            "queue": "Queue 2.2",
            "street": "Side"
        }"#;

        let extraction = extract(payload, &query());
        assert_eq!(extraction.source, ExtractionSource::Json);
        assert_eq!(extraction.queue.as_deref(), Some("Queue 2.2"));
        assert_eq!(extraction.address.street, "Side");
        assert_eq!(extraction.address.city, "Kyiv");
        // update date lives below the root; only root-level fields are auxiliary
        assert_eq!(extraction.update_date, None);
        assert_eq!(
            extraction.cells,
            vec![
                CellRecord::new(CellClassification::Full, "06-07").with_date("27.11.25"),
                CellRecord::new(CellClassification::FirstHalf, "09-10"),
                CellRecord::new(CellClassification::SecondHalf, "12-13").with_date("28.11.25"),
                CellRecord::new(CellClassification::Full, "13-14").with_date("28.11.25"),
                CellRecord::new(CellClassification::FirstHalf, "14-15").with_date("28.11.25"),
            ]
        );
    }

    #[test]
    fn test_json_without_array() {
        let extraction = extract(r#"{"status": "ok", "nested": {"value": 1}}"#, &query());
        assert!(extraction.cells.is_empty());
        assert_eq!(extraction.source, ExtractionSource::Empty);

        let extraction = extract("[]", &query());
        assert!(extraction.cells.is_empty());
    }

    #[test]
    fn test_range_decomposition() {
        assert_eq!(range_to_cells(360, 420), vec![CellRecord::new(CellClassification::Full, "06-07")]);
        assert_eq!(range_to_cells(390, 420), vec![CellRecord::new(CellClassification::SecondHalf, "06-07")]);
        assert!(range_to_cells(400, 420).is_empty());
        assert!(range_to_cells(420, 360).is_empty());
    }
}
