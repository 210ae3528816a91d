use crate::schedule::cell::{TimeSlot, format_minutes, parse_clock};
use crate::schedule::model::{CellRecord, MergedPeriod};
use indexmap::IndexMap;

/// Minute-of-day interval tagged with the reference date it came from
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    start: u16,
    end: u16,
    date: Option<String>,
}

/// Merge classified cells into contiguous periods.
///
/// Cells are partitioned by date (in order of first appearance), each
/// partition is sorted by start minute and swept once: a span starting exactly
/// where the open period ends extends it. Cells whose label does not parse
/// are dropped.
pub fn merge_cells(cells: &[CellRecord]) -> Vec<MergedPeriod> {
    let spans = cells.iter().filter_map(|cell| {
        let Some(slot) = TimeSlot::parse(&cell.time_slot) else {
            log::debug!("Dropping cell with unparseable time slot '{}'", cell.time_slot);
            return None;
        };
        let (start, end) = slot.interval(cell.classification)?;
        Some(Span { start, end, date: cell.date.clone() })
    });

    merge_spans(spans)
}

/// Re-merge already merged periods; merging a merger's output is a no-op
pub fn merge_periods(periods: &[MergedPeriod]) -> Vec<MergedPeriod> {
    let spans = periods.iter().filter_map(|period| {
        let start = parse_clock(&period.start_time)?;
        let end = parse_clock(&period.end_time)?;
        (start < end).then(|| Span { start, end, date: period.date.clone() })
    });

    merge_spans(spans)
}

fn merge_spans(spans: impl Iterator<Item = Span>) -> Vec<MergedPeriod> {
    let mut by_date: IndexMap<Option<String>, Vec<(u16, u16)>> = IndexMap::new();
    for span in spans {
        by_date.entry(span.date).or_default().push((span.start, span.end));
    }

    let mut merged = Vec::new();
    for (date, mut intervals) in by_date {
        // stable: ties keep source order
        intervals.sort_by_key(|&(start, _)| start);

        let mut iter = intervals.into_iter();
        let Some((mut open_start, mut open_end)) = iter.next() else {
            continue;
        };

        for (start, end) in iter {
            if start == open_end {
                open_end = end;
            } else if start < open_end {
                // duplicate or overlapping cell; fold it into the open period
                open_end = open_end.max(end);
            } else {
                merged.push(period(open_start, open_end, &date));
                open_start = start;
                open_end = end;
            }
        }
        merged.push(period(open_start, open_end, &date));
    }

    merged
}

fn period(start: u16, end: u16, date: &Option<String>) -> MergedPeriod {
    MergedPeriod { start_time: format_minutes(start), end_time: format_minutes(end), date: date.clone() }
}
