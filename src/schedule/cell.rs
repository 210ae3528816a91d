use serde::{Deserialize, Serialize};

/// Class token marking a slot with no planned outage
pub const TOKEN_NON_SCHEDULED: &str = "cell-non-scheduled";
/// Class token for an outage in the first half of the hour
pub const TOKEN_FIRST_HALF: &str = "cell-first-half";
/// Class token for an outage in the second half of the hour
pub const TOKEN_SECOND_HALF: &str = "cell-second-half";
/// Class token for a full-hour outage
pub const TOKEN_SCHEDULED: &str = "cell-scheduled";
/// Class token for a full-hour outage that may not happen
pub const TOKEN_SCHEDULED_MAYBE: &str = "cell-scheduled-maybe";

/// Outage state of one half-hour-resolution table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CellClassification {
    None,
    FirstHalf,
    SecondHalf,
    Full,
}

impl CellClassification {
    /// Classify a cell from the full set of its class tokens.
    ///
    /// Total: unrecognised or conflicting token sets fall back to
    /// [`CellClassification::None`]. An explicit non-scheduled marker wins
    /// over everything else, then first half, then second half, then any
    /// member of the scheduled family.
    pub fn classify<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut first_half = false;
        let mut second_half = false;
        let mut scheduled = false;

        for token in tokens {
            match token.trim() {
                TOKEN_NON_SCHEDULED => return CellClassification::None,
                TOKEN_FIRST_HALF => first_half = true,
                TOKEN_SECOND_HALF => second_half = true,
                TOKEN_SCHEDULED | TOKEN_SCHEDULED_MAYBE => scheduled = true,
                _ => {}
            }
        }

        if first_half {
            CellClassification::FirstHalf
        } else if second_half {
            CellClassification::SecondHalf
        } else if scheduled {
            CellClassification::Full
        } else {
            CellClassification::None
        }
    }

    /// Classify a whitespace separated `class` attribute value
    pub fn from_class_attr(class_attr: &str) -> Self {
        Self::classify(class_attr.split_whitespace())
    }

    /// Canonical class token written to persisted records
    pub fn token(&self) -> &'static str {
        match self {
            CellClassification::None => TOKEN_NON_SCHEDULED,
            CellClassification::FirstHalf => TOKEN_FIRST_HALF,
            CellClassification::SecondHalf => TOKEN_SECOND_HALF,
            CellClassification::Full => TOKEN_SCHEDULED,
        }
    }

    pub fn is_outage(&self) -> bool {
        !matches!(self, CellClassification::None)
    }
}

impl From<String> for CellClassification {
    fn from(value: String) -> Self {
        Self::from_class_attr(&value)
    }
}

impl From<CellClassification> for String {
    fn from(value: CellClassification) -> Self {
        value.token().to_string()
    }
}

/// A parsed `"HH-HH"` column label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start_hour: u16,
    pub end_hour: u16,
}

impl TimeSlot {
    /// Parse a `"HH-HH"` label.
    ///
    /// The start hour must lie in `0..24`. The end hour may also be `24`,
    /// which the source uses for the last column (`"23-24"`).
    pub fn parse(label: &str) -> Option<Self> {
        let (start, end) = label.trim().split_once('-')?;
        let start_hour: u16 = start.trim().parse().ok()?;
        let end_hour: u16 = end.trim().parse().ok()?;

        if start_hour >= 24 || end_hour > 24 {
            return None;
        }

        Some(Self { start_hour, end_hour })
    }

    /// Minute-of-day interval `[start, end)` covered by a cell of this slot.
    ///
    /// Returns `None` for `CellClassification::None` and for labels that would
    /// produce an empty or inverted interval.
    pub fn interval(&self, classification: CellClassification) -> Option<(u16, u16)> {
        let (start, end) = match classification {
            CellClassification::None => return None,
            CellClassification::Full => (self.start_hour * 60, self.end_hour * 60),
            CellClassification::FirstHalf => (self.start_hour * 60, self.start_hour * 60 + 30),
            CellClassification::SecondHalf => {
                let end_hour = if self.end_hour == self.start_hour { self.start_hour + 1 } else { self.end_hour };
                (self.start_hour * 60 + 30, end_hour * 60)
            }
        };

        (start < end).then_some((start, end))
    }

    /// Canonical zero-padded label
    pub fn label(&self) -> String {
        format!("{:02}-{:02}", self.start_hour, self.end_hour)
    }
}

/// Format a minute-of-day value as `HH:MM`
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse an `HH:MM` value into minute-of-day; `24:00` is accepted as end of day
pub fn parse_clock(value: &str) -> Option<u16> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u16 = hours.trim().parse().ok()?;
    let minutes: u16 = minutes.trim().parse().ok()?;

    if minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
        return None;
    }

    Some(hours * 60 + minutes)
}
