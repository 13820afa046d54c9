//! Calendar-aware sampling frequencies and date-range generation.
//!
//! A [`Frequency`] is a unit (fixed duration or calendar anchor) times a
//! positive multiple. Anchored units (business days, month/quarter/year
//! starts and ends, anchored weeks) step to the next on-offset date instead of
//! adding a fixed duration, so forecast horizons skip weekends and land on
//! month ends the same way the observed data does.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on anchor steps explored when matching consecutive timestamps.
const MAX_STEPS_BETWEEN: u32 = 1_000;

/// Base unit of a sampling frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    Second,
    Minute,
    Hour,
    Day,
    /// Monday to Friday.
    BusinessDay,
    /// Weekly, anchored to a weekday.
    Week(Weekday),
    MonthStart,
    MonthEnd,
    QuarterStart,
    QuarterEnd,
    YearStart,
    YearEnd,
}

impl FrequencyUnit {
    /// Fixed duration of one step, `None` for calendar-anchored units.
    fn fixed_duration(self) -> Option<Duration> {
        match self {
            FrequencyUnit::Second => Some(Duration::seconds(1)),
            FrequencyUnit::Minute => Some(Duration::minutes(1)),
            FrequencyUnit::Hour => Some(Duration::hours(1)),
            FrequencyUnit::Day => Some(Duration::days(1)),
            _ => None,
        }
    }

    fn alias(self) -> String {
        match self {
            FrequencyUnit::Second => "S".to_string(),
            FrequencyUnit::Minute => "T".to_string(),
            FrequencyUnit::Hour => "H".to_string(),
            FrequencyUnit::Day => "D".to_string(),
            FrequencyUnit::BusinessDay => "B".to_string(),
            FrequencyUnit::Week(day) => format!("W-{}", weekday_code(day)),
            FrequencyUnit::MonthStart => "MS".to_string(),
            FrequencyUnit::MonthEnd => "M".to_string(),
            FrequencyUnit::QuarterStart => "QS".to_string(),
            FrequencyUnit::QuarterEnd => "Q".to_string(),
            FrequencyUnit::YearStart => "AS".to_string(),
            FrequencyUnit::YearEnd => "A".to_string(),
        }
    }

    /// Months on which a month-family anchor may fall, and whether it sits at
    /// the end (true) or start (false) of the month.
    fn month_anchor(self) -> Option<(&'static [u32], bool)> {
        const ALL: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        match self {
            FrequencyUnit::MonthStart => Some((&ALL, false)),
            FrequencyUnit::MonthEnd => Some((&ALL, true)),
            FrequencyUnit::QuarterStart => Some((&[1, 4, 7, 10], false)),
            FrequencyUnit::QuarterEnd => Some((&[3, 6, 9, 12], true)),
            FrequencyUnit::YearStart => Some((&[1], false)),
            FrequencyUnit::YearEnd => Some((&[12], true)),
            _ => None,
        }
    }

    /// Whether `t` lies on this unit's calendar anchor.
    fn is_on_offset(self, t: &DateTime<Utc>) -> bool {
        match self {
            FrequencyUnit::BusinessDay => is_business_day(t.weekday()),
            FrequencyUnit::Week(day) => t.weekday() == day,
            unit => match unit.month_anchor() {
                Some((months, at_end)) => {
                    let date = t.date_naive();
                    months.contains(&date.month())
                        && if at_end {
                            date.day() == days_in_month(date.year(), date.month())
                        } else {
                            date.day() == 1
                        }
                }
                None => true,
            },
        }
    }

    /// The first on-offset instant strictly after `t`, keeping time of day.
    fn next_after(self, t: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if let Some(step) = self.fixed_duration() {
            return t.checked_add_signed(step).ok_or_else(out_of_range);
        }

        let date = t.date_naive();
        let next = match self {
            FrequencyUnit::BusinessDay => {
                let ahead = match date.weekday() {
                    Weekday::Fri => 3,
                    Weekday::Sat => 2,
                    _ => 1,
                };
                date.checked_add_signed(Duration::days(ahead))
            }
            FrequencyUnit::Week(day) => {
                let from = date.weekday().num_days_from_monday() as i64;
                let to = day.num_days_from_monday() as i64;
                let ahead = match (to - from).rem_euclid(7) {
                    0 => 7,
                    n => n,
                };
                date.checked_add_signed(Duration::days(ahead))
            }
            unit => {
                let (months, at_end) = unit.month_anchor().ok_or_else(out_of_range)?;
                next_month_anchor(date, months, at_end)
            }
        }
        .ok_or_else(out_of_range)?;

        Ok(Utc.from_utc_datetime(&next.and_time(t.time())))
    }
}

/// A sampling frequency: a unit and a positive multiple (e.g. `2D`, `W-SUN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    unit: FrequencyUnit,
    multiple: u32,
}

impl Frequency {
    /// Create a frequency, rejecting a zero multiple.
    pub fn new(unit: FrequencyUnit, multiple: u32) -> Result<Self> {
        if multiple == 0 {
            return Err(ForecastError::InvalidParameter(
                "frequency multiple must be positive".to_string(),
            ));
        }
        Ok(Self { unit, multiple })
    }

    /// Single-step frequency of the given unit.
    pub fn of(unit: FrequencyUnit) -> Self {
        Self { unit, multiple: 1 }
    }

    pub fn secondly() -> Self {
        Self::of(FrequencyUnit::Second)
    }

    pub fn minutely() -> Self {
        Self::of(FrequencyUnit::Minute)
    }

    pub fn hourly() -> Self {
        Self::of(FrequencyUnit::Hour)
    }

    pub fn daily() -> Self {
        Self::of(FrequencyUnit::Day)
    }

    pub fn business_daily() -> Self {
        Self::of(FrequencyUnit::BusinessDay)
    }

    /// Weekly, anchored on Sunday.
    pub fn weekly() -> Self {
        Self::of(FrequencyUnit::Week(Weekday::Sun))
    }

    pub fn month_end() -> Self {
        Self::of(FrequencyUnit::MonthEnd)
    }

    pub fn month_start() -> Self {
        Self::of(FrequencyUnit::MonthStart)
    }

    pub fn quarter_end() -> Self {
        Self::of(FrequencyUnit::QuarterEnd)
    }

    pub fn year_end() -> Self {
        Self::of(FrequencyUnit::YearEnd)
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    pub fn multiple(&self) -> u32 {
        self.multiple
    }

    /// Whether `t` lies on this frequency's anchor.
    pub fn is_on_offset(&self, t: &DateTime<Utc>) -> bool {
        self.unit.is_on_offset(t)
    }

    /// `t` itself when on offset, otherwise the next on-offset instant.
    pub fn roll_forward(&self, t: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if self.is_on_offset(&t) {
            Ok(t)
        } else {
            self.unit.next_after(t)
        }
    }

    /// Move `t` forward by one period of this frequency.
    pub fn advance(&self, t: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if let Some(step) = self.unit.fixed_duration() {
            let stride = i32::try_from(self.multiple)
                .ok()
                .and_then(|m| step.checked_mul(m))
                .ok_or_else(|| too_large(self))?;
            return t.checked_add_signed(stride).ok_or_else(out_of_range);
        }
        let mut current = t;
        for _ in 0..self.multiple {
            current = self.unit.next_after(current)?;
        }
        Ok(current)
    }

    /// `periods` timestamps starting at `start` rolled onto the anchor.
    pub fn date_range(&self, start: DateTime<Utc>, periods: usize) -> Result<Vec<DateTime<Utc>>> {
        let mut dates = Vec::with_capacity(periods);
        if periods == 0 {
            return Ok(dates);
        }
        let mut current = self.roll_forward(start)?;
        dates.push(current);
        while dates.len() < periods {
            current = self.advance(current)?;
            dates.push(current);
        }
        Ok(dates)
    }

    /// The `steps` periods following `last`.
    ///
    /// Builds a range of `steps + 1` periods from `last` and drops `last`
    /// itself, so an off-anchor `last` still yields exactly `steps` dates.
    pub fn future_dates(&self, last: DateTime<Utc>, steps: usize) -> Result<Vec<DateTime<Utc>>> {
        Ok(self
            .date_range(last, steps + 1)?
            .into_iter()
            .filter(|t| *t != last)
            .take(steps)
            .collect())
    }

    /// Infer the frequency of strictly increasing timestamps.
    ///
    /// Month, quarter and year anchors are tried first, coarsest first, so
    /// equally spaced year starts read as `AS` rather than `365D`. Uniform
    /// spacing then maps to a fixed unit (or an anchored week when the
    /// spacing is a whole number of weeks). Business days come last.
    pub fn infer(timestamps: &[DateTime<Utc>]) -> Result<Self> {
        if timestamps.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: timestamps.len(),
            });
        }

        let diffs: Vec<i64> = timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds())
            .collect();

        if diffs.iter().any(|&d| d <= 0) {
            return Err(ForecastError::FrequencyInference(
                "timestamps must be strictly increasing".to_string(),
            ));
        }

        const CALENDAR: [FrequencyUnit; 6] = [
            FrequencyUnit::YearEnd,
            FrequencyUnit::YearStart,
            FrequencyUnit::QuarterEnd,
            FrequencyUnit::QuarterStart,
            FrequencyUnit::MonthEnd,
            FrequencyUnit::MonthStart,
        ];

        for unit in CALENDAR {
            if let Some(multiple) = anchored_multiple(unit, timestamps) {
                return Ok(Self { unit, multiple });
            }
        }

        if diffs.iter().all(|&d| d == diffs[0]) {
            return Self::from_uniform_spacing(diffs[0], &timestamps[0]);
        }

        if let Some(multiple) = anchored_multiple(FrequencyUnit::BusinessDay, timestamps) {
            return Ok(Self {
                unit: FrequencyUnit::BusinessDay,
                multiple,
            });
        }

        Err(ForecastError::FrequencyInference(
            "no consistent spacing found".to_string(),
        ))
    }

    fn from_uniform_spacing(seconds: i64, first: &DateTime<Utc>) -> Result<Self> {
        const DAY: i64 = 86_400;
        let (unit, multiple) = if seconds % (7 * DAY) == 0 {
            (FrequencyUnit::Week(first.weekday()), seconds / (7 * DAY))
        } else if seconds % DAY == 0 {
            (FrequencyUnit::Day, seconds / DAY)
        } else if seconds % 3_600 == 0 {
            (FrequencyUnit::Hour, seconds / 3_600)
        } else if seconds % 60 == 0 {
            (FrequencyUnit::Minute, seconds / 60)
        } else {
            (FrequencyUnit::Second, seconds)
        };
        let multiple = u32::try_from(multiple).map_err(|_| {
            ForecastError::InvalidParameter(format!(
                "spacing of {} seconds is too large for a frequency",
                seconds
            ))
        })?;
        Ok(Self { unit, multiple })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiple > 1 {
            write!(f, "{}{}", self.multiple, self.unit.alias())
        } else {
            write!(f, "{}", self.unit.alias())
        }
    }
}

impl FromStr for Frequency {
    type Err = ForecastError;

    /// Parse offset aliases such as `D`, `2H`, `B`, `W-MON`, `MS`, `Q`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, alias) = s.split_at(split);

        let multiple = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| invalid_alias(s))?
        };

        let unit = match alias {
            "S" | "s" => FrequencyUnit::Second,
            "T" | "min" => FrequencyUnit::Minute,
            "H" | "h" => FrequencyUnit::Hour,
            "D" => FrequencyUnit::Day,
            "B" => FrequencyUnit::BusinessDay,
            "W" => FrequencyUnit::Week(Weekday::Sun),
            "MS" => FrequencyUnit::MonthStart,
            "M" | "ME" => FrequencyUnit::MonthEnd,
            "QS" => FrequencyUnit::QuarterStart,
            "Q" | "QE" => FrequencyUnit::QuarterEnd,
            "AS" | "YS" => FrequencyUnit::YearStart,
            "A" | "Y" | "YE" => FrequencyUnit::YearEnd,
            other => match other.strip_prefix("W-") {
                Some(code) => {
                    FrequencyUnit::Week(parse_weekday_code(code).ok_or_else(|| invalid_alias(s))?)
                }
                None => return Err(invalid_alias(s)),
            },
        };

        Self::new(unit, multiple)
    }
}

impl TryFrom<String> for Frequency {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        freq.to_string()
    }
}

/// Number of `unit` steps separating every consecutive pair, if constant and
/// every timestamp is on the unit's anchor.
fn anchored_multiple(unit: FrequencyUnit, timestamps: &[DateTime<Utc>]) -> Option<u32> {
    if !timestamps.iter().all(|t| unit.is_on_offset(t)) {
        return None;
    }

    let steps_between = |from: DateTime<Utc>, to: DateTime<Utc>| -> Option<u32> {
        let mut current = from;
        for step in 1..=MAX_STEPS_BETWEEN {
            current = unit.next_after(current).ok()?;
            if current == to {
                return Some(step);
            }
            if current > to {
                return None;
            }
        }
        None
    };

    let multiple = steps_between(timestamps[0], timestamps[1])?;
    timestamps
        .windows(2)
        .skip(1)
        .all(|w| steps_between(w[0], w[1]) == Some(multiple))
        .then_some(multiple)
}

/// First month-family anchor date strictly after `date`.
fn next_month_anchor(date: NaiveDate, months: &[u32], at_end: bool) -> Option<NaiveDate> {
    let (mut year, mut month) = (date.year(), date.month());
    for _ in 0..=12 {
        if months.contains(&month) {
            let day = if at_end { days_in_month(year, month) } else { 1 };
            let candidate = NaiveDate::from_ymd_opt(year, month, day)?;
            if candidate > date {
                return Some(candidate);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    None
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn is_business_day(day: Weekday) -> bool {
    !matches!(day, Weekday::Sat | Weekday::Sun)
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

fn parse_weekday_code(code: &str) -> Option<Weekday> {
    match code {
        "MON" => Some(Weekday::Mon),
        "TUE" => Some(Weekday::Tue),
        "WED" => Some(Weekday::Wed),
        "THU" => Some(Weekday::Thu),
        "FRI" => Some(Weekday::Fri),
        "SAT" => Some(Weekday::Sat),
        "SUN" => Some(Weekday::Sun),
        _ => None,
    }
}

fn invalid_alias(s: &str) -> ForecastError {
    ForecastError::FrequencyInference(format!("unknown frequency alias {:?}", s))
}

fn too_large(freq: &Frequency) -> ForecastError {
    ForecastError::InvalidParameter(format!("frequency {} is too large to step by", freq))
}

fn out_of_range() -> ForecastError {
    ForecastError::TimestampError("date out of representable range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_and_displays_aliases() {
        for alias in ["S", "T", "H", "D", "B", "W-SUN", "W-MON", "MS", "M", "QS", "Q", "AS", "A"] {
            let freq: Frequency = alias.parse().unwrap();
            assert_eq!(freq.to_string(), alias);
        }

        let freq: Frequency = "2D".parse().unwrap();
        assert_eq!(freq.unit(), FrequencyUnit::Day);
        assert_eq!(freq.multiple(), 2);
        assert_eq!(freq.to_string(), "2D");

        assert_eq!("W".parse::<Frequency>().unwrap(), Frequency::weekly());
        assert_eq!("min".parse::<Frequency>().unwrap(), Frequency::minutely());
        assert_eq!("Y".parse::<Frequency>().unwrap(), Frequency::year_end());
    }

    #[test]
    fn rejects_unknown_aliases_and_zero_multiple() {
        assert!(matches!(
            "fortnightly".parse::<Frequency>(),
            Err(ForecastError::FrequencyInference(_))
        ));
        assert!("W-XYZ".parse::<Frequency>().is_err());
        assert!(matches!(
            "0D".parse::<Frequency>(),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn daily_future_dates_follow_last_observation() {
        let last = ymd(2024, 1, 31);
        let dates = Frequency::daily().future_dates(last, 3).unwrap();
        assert_eq!(dates, vec![ymd(2024, 2, 1), ymd(2024, 2, 2), ymd(2024, 2, 3)]);
    }

    #[test]
    fn business_days_skip_weekends() {
        // 2024-01-05 is a Friday.
        let dates = Frequency::business_daily()
            .future_dates(ymd(2024, 1, 5), 3)
            .unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 8), ymd(2024, 1, 9), ymd(2024, 1, 10)]);
    }

    #[test]
    fn month_end_handles_short_months() {
        let dates = Frequency::month_end()
            .future_dates(ymd(2024, 1, 31), 3)
            .unwrap();
        assert_eq!(dates, vec![ymd(2024, 2, 29), ymd(2024, 3, 31), ymd(2024, 4, 30)]);
    }

    #[test]
    fn off_anchor_start_still_yields_requested_count() {
        // Mid-month last observation rolls onto the month end.
        let dates = Frequency::month_end()
            .future_dates(ymd(2024, 1, 15), 2)
            .unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 31), ymd(2024, 2, 29)]);
    }

    #[test]
    fn quarter_and_year_anchors() {
        let q = Frequency::quarter_end().future_dates(ymd(2023, 12, 31), 2).unwrap();
        assert_eq!(q, vec![ymd(2024, 3, 31), ymd(2024, 6, 30)]);

        let a = Frequency::year_end().future_dates(ymd(2023, 12, 31), 2).unwrap();
        assert_eq!(a, vec![ymd(2024, 12, 31), ymd(2025, 12, 31)]);

        let qs: Frequency = "QS".parse().unwrap();
        assert_eq!(qs.future_dates(ymd(2024, 2, 10), 1).unwrap(), vec![ymd(2024, 4, 1)]);
    }

    #[test]
    fn weekly_anchor_lands_on_weekday() {
        let freq: Frequency = "W-MON".parse().unwrap();
        // 2024-01-03 is a Wednesday.
        let dates = freq.date_range(ymd(2024, 1, 3), 2).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 8), ymd(2024, 1, 15)]);
    }

    #[test]
    fn infers_fixed_frequencies() {
        let hourly: Vec<_> = (0..5)
            .map(|i| Utc.with_ymd_and_hms(2024, 1, 1, i, 0, 0).unwrap())
            .collect();
        assert_eq!(Frequency::infer(&hourly).unwrap(), Frequency::hourly());

        let every_two_days: Vec<_> = (0..5).map(|i| ymd(2024, 1, 1 + 2 * i)).collect();
        assert_eq!(Frequency::infer(&every_two_days).unwrap().to_string(), "2D");

        // 2024-01-07 is a Sunday.
        let weekly: Vec<_> = (0..4).map(|i| ymd(2024, 1, 7 + 7 * i)).collect();
        assert_eq!(Frequency::infer(&weekly).unwrap(), Frequency::weekly());
    }

    #[test]
    fn infers_calendar_frequencies() {
        let month_ends = vec![
            ymd(2024, 1, 31),
            ymd(2024, 2, 29),
            ymd(2024, 3, 31),
            ymd(2024, 4, 30),
        ];
        assert_eq!(Frequency::infer(&month_ends).unwrap(), Frequency::month_end());

        let quarter_ends = vec![
            ymd(2023, 3, 31),
            ymd(2023, 6, 30),
            ymd(2023, 9, 30),
            ymd(2023, 12, 31),
        ];
        assert_eq!(Frequency::infer(&quarter_ends).unwrap(), Frequency::quarter_end());

        // Thu, Fri, Mon, Tue
        let business = vec![ymd(2024, 1, 4), ymd(2024, 1, 5), ymd(2024, 1, 8), ymd(2024, 1, 9)];
        assert_eq!(Frequency::infer(&business).unwrap(), Frequency::business_daily());
    }

    #[test]
    fn calendar_anchors_win_over_equal_day_gaps() {
        // Equal 31-day gaps that also fall on month starts.
        let month_starts = vec![ymd(2024, 7, 1), ymd(2024, 8, 1), ymd(2024, 9, 1)];
        assert_eq!(Frequency::infer(&month_starts).unwrap(), Frequency::month_start());

        // Every gap here is 365 days.
        let year_starts: Vec<_> = (2021..=2024).map(|y| ymd(y, 1, 1)).collect();
        let freq = Frequency::infer(&year_starts).unwrap();
        assert_eq!(freq.to_string(), "AS");
        assert_eq!(
            freq.future_dates(ymd(2024, 1, 1), 2).unwrap(),
            vec![ymd(2025, 1, 1), ymd(2026, 1, 1)]
        );

        let year_ends = vec![ymd(2021, 12, 31), ymd(2022, 12, 31)];
        assert_eq!(Frequency::infer(&year_ends).unwrap(), Frequency::year_end());

        // Daily data on weekdays only still reads as calendar days.
        let weekdays: Vec<_> = (1..=3).map(|d| ymd(2024, 1, d)).collect();
        assert_eq!(Frequency::infer(&weekdays).unwrap(), Frequency::daily());
    }

    #[test]
    fn oversized_multiples_are_rejected() {
        let freq: Frequency = "3000000000S".parse().unwrap();
        assert!(matches!(
            freq.future_dates(ymd(2024, 1, 1), 2),
            Err(ForecastError::InvalidParameter(_))
        ));

        let huge = Frequency::from_uniform_spacing(i64::from(u32::MAX) + 1, &ymd(2024, 1, 1));
        assert!(matches!(huge, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn irregular_spacing_fails_inference() {
        let irregular = vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 5), ymd(2024, 1, 20)];
        assert!(matches!(
            Frequency::infer(&irregular),
            Err(ForecastError::FrequencyInference(_))
        ));
        assert!(matches!(
            Frequency::infer(&irregular[..1]),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn serializes_as_alias_string() {
        let freq: Frequency = "3H".parse().unwrap();
        let json = serde_json::to_string(&freq).unwrap();
        assert_eq!(json, "\"3H\"");
        let back: Frequency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, freq);
        assert!(serde_json::from_str::<Frequency>("\"nope\"").is_err());
    }
}
