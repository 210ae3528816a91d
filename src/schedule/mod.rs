//! Schedule extraction and normalisation
//!
//! This module turns a rendered schedule page into a comparable schedule:
//! - cell: half-hour cell classification and the time-slot rule
//! - extract: page / JSON payload → raw cell records
//! - merge: cell records → contiguous periods
//! - compare: change detection against the last notified snapshot
//! - model: address, record and schedule types

pub mod cell;
pub mod compare;
pub mod extract;
pub mod merge;
pub mod model;

pub use cell::{CellClassification, TimeSlot};
pub use compare::{schedules_equal, should_notify};
pub use extract::{DEFAULT_TIMEZONE, Extraction, ExtractionSource, extract, extract_in};
pub use merge::{merge_cells, merge_periods};
pub use model::{AddressQuery, CellRecord, MergedPeriod, PersistedSchedule, ProcessedSchedule, ScheduleAddress};
