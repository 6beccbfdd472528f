use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Calendar month used to select monthly corpus files and bound record timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8, // 1..=12
}

impl YearMonth {
    pub fn new(year: u16, month: u8) -> Self {
        assert!((1..=12).contains(&month), "Month must be 1..=12");
        Self { year, month }
    }

    /// Month containing a unix timestamp (UTC). Out-of-range timestamps map to 1970-01.
    pub fn from_epoch(ts: i64) -> Self {
        let date = OffsetDateTime::from_unix_timestamp(ts)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
            .date();
        Self {
            year: date.year().clamp(0, u16::MAX as i32) as u16,
            month: date.month() as u8,
        }
    }

    pub fn next(self) -> Option<Self> {
        match (self.month, self.year) {
            (12, u16::MAX) => None,
            (12, y) => Some(Self { year: y + 1, month: 1 }),
            (m, y) => Some(Self { year: y, month: m + 1 }),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s.split_once('-').ok_or("expected YYYY-MM")?;
        let year: u16 = y.parse().map_err(|_| "invalid year")?;
        let month: u8 = m.parse().map_err(|_| "invalid month")?;
        if !(1..=12).contains(&month) {
            return Err("month must be 01..12".into());
        }
        Ok(Self { year, month })
    }
}

/// Inclusive months from `start` to `end`; empty when `start > end`.
pub fn iter_year_months(start: YearMonth, end: YearMonth) -> impl Iterator<Item = YearMonth> {
    std::iter::successors((start <= end).then_some(start), move |cur| {
        cur.next().filter(|n| *n <= end)
    })
}
