//! Temporal extraction for command text.
//!
//! The primary path is a date/time grammar run over the raw text relative
//! to a reference instant, with forward-only resolution: ambiguous weekday
//! references resolve to the next occurrence, never the past. It recognizes:
//! - Absolute dates: "2024-01-15", "January 15", "Mar 3rd, 2024", "1/15/2024"
//! - Relative dates: "today", "tomorrow", "next Tuesday", "in 2 weeks"
//! - Clock times: "10am", "3:30 pm", "15:30", "noon"
//!
//! The fallback path handles the narrow "<Month> <day>-<day>" range shape
//! ("March 20-22") that the grammar deliberately declines.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;

use super::types::TemporalEntity;

/// Fixed confidence for any successful grammar match. The grammar is
/// trusted as a black box; this module does not score ambiguity.
pub const GRAMMAR_CONFIDENCE: f32 = 0.8;

/// Confidence for the fallback range matcher.
pub const RANGE_CONFIDENCE: f32 = 0.6;

// ============================================================================
// Temporal Grammar
// ============================================================================

/// Extracts a date/time (and optional end) from free-form text.
pub struct TemporalGrammar {
    /// Reference instant for relative resolution (defaults to now).
    reference: NaiveDateTime,
}

impl Default for TemporalGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalGrammar {
    /// Create a grammar referenced to the current local time.
    pub fn new() -> Self {
        Self {
            reference: Local::now().naive_local(),
        }
    }

    /// Create a grammar with a specific reference instant.
    pub fn with_reference(reference: NaiveDateTime) -> Self {
        Self { reference }
    }

    /// The reference instant in use.
    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    /// Run the grammar over the raw text and take the first match.
    ///
    /// A date with no clock time yields an all-day entity anchored at
    /// midnight; the caller decides the effective time of day. A clock time
    /// with no date resolves against the reference date, rolling forward a
    /// day if the instant has already passed. Nothing recognized yields
    /// [`TemporalEntity::none`], never an error.
    pub fn extract(&self, text: &str) -> TemporalEntity {
        let dates = self.find_dates(text);
        let times = self.find_times(text);

        match (dates.first(), times.first()) {
            (None, None) => TemporalEntity::none(),
            (Some(date), Some(time)) => TemporalEntity {
                date_start: Some(date.value.and_time(time.value)),
                date_end: None,
                time_specified: true,
                all_day: false,
                confidence: GRAMMAR_CONFIDENCE,
            },
            (Some(date), None) => TemporalEntity {
                date_start: Some(date.value.and_time(NaiveTime::MIN)),
                date_end: None,
                time_specified: false,
                all_day: true,
                confidence: GRAMMAR_CONFIDENCE,
            },
            (None, Some(time)) => {
                let mut start = self.reference.date().and_time(time.value);
                if start < self.reference {
                    start += Duration::days(1);
                }
                TemporalEntity {
                    date_start: Some(start),
                    date_end: None,
                    time_specified: true,
                    all_day: false,
                    confidence: GRAMMAR_CONFIDENCE,
                }
            }
        }
    }

    /// Fallback matcher for "<Month> <day>-<day>" ranges ("March 20-22").
    ///
    /// Parses the first date with an implied current year and replaces the
    /// day-of-month to get the end date. Returns a low-confidence all-day
    /// range from start-of-day to 23:59:59.999, or `None` when the pattern
    /// is absent or the dates are invalid.
    pub fn extract_range(&self, text: &str) -> Option<TemporalEntity> {
        let caps = RANGE_PATTERN.captures(text)?;
        let month = month_from_name(&caps[1])?;
        let start_day: u32 = caps[2].parse().ok()?;
        let end_day: u32 = caps[3].parse().ok()?;

        let start = NaiveDate::from_ymd_opt(self.reference.year(), month, start_day)?;
        let end = start.with_day(end_day)?;

        Some(TemporalEntity {
            date_start: Some(start.and_time(NaiveTime::MIN)),
            date_end: end.and_hms_milli_opt(23, 59, 59, 999),
            time_specified: false,
            all_day: true,
            confidence: RANGE_CONFIDENCE,
        })
    }

    // ========================================================================
    // Date expressions
    // ========================================================================

    fn find_dates(&self, text: &str) -> Vec<Span<NaiveDate>> {
        let mut spans = Vec::new();

        // ISO format: 2024-01-15
        for cap in ISO_DATE.captures_iter(text) {
            if let (Ok(year), Ok(month), Ok(day)) = (
                cap[1].parse::<i32>(),
                cap[2].parse::<u32>(),
                cap[3].parse::<u32>(),
            ) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    spans.push(Span::from_match(&cap.get(0).unwrap(), date));
                }
            }
        }

        // Month-name format: "January 15", "Mar 3rd, 2024"
        for cap in MONTH_DAY.captures_iter(text) {
            let m = cap.get(0).unwrap();
            // A day range like "March 20-22" belongs to the fallback matcher.
            if followed_by_day_range(text, m.end()) {
                continue;
            }
            let Some(month) = month_from_name(&cap[1]) else {
                continue;
            };
            let Ok(day) = cap[2].parse::<u32>() else {
                continue;
            };
            let year = cap
                .get(3)
                .and_then(|y| y.as_str().parse::<i32>().ok())
                .unwrap_or(self.reference.year());
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                spans.push(Span::from_match(&m, date));
            }
        }

        // Numeric format: 1/15/2024 (US month/day order)
        for cap in NUMERIC_DATE.captures_iter(text) {
            if let (Ok(month), Ok(day), Ok(year)) = (
                cap[1].parse::<u32>(),
                cap[2].parse::<u32>(),
                cap[3].parse::<i32>(),
            ) {
                let year = if year < 100 { 2000 + year } else { year };
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    spans.push(Span::from_match(&cap.get(0).unwrap(), date));
                }
            }
        }

        // Relative terms: today, tomorrow, day after tomorrow
        for cap in RELATIVE_DAY.captures_iter(text) {
            let days = match cap[1].to_lowercase().as_str() {
                "today" => 0,
                "tomorrow" => 1,
                "day after tomorrow" => 2,
                _ => continue,
            };
            let date = self.reference.date() + Duration::days(days);
            spans.push(Span::from_match(&cap.get(0).unwrap(), date));
        }

        // "next <weekday>" skips the current week
        for cap in NEXT_WEEKDAY.captures_iter(text) {
            if let Some(weekday) = weekday_from_name(&cap[1]) {
                let date = self.next_weekday(weekday, true);
                spans.push(Span::from_match(&cap.get(0).unwrap(), date));
            }
        }

        // "this <weekday>" and bare weekdays resolve to the next occurrence
        for cap in THIS_WEEKDAY.captures_iter(text) {
            if let Some(weekday) = weekday_from_name(&cap[1]) {
                let date = self.next_weekday(weekday, false);
                spans.push(Span::from_match(&cap.get(0).unwrap(), date));
            }
        }

        for cap in BARE_WEEKDAY.captures_iter(text) {
            let m = cap.get(0).unwrap();
            // Skip when part of "next/this/last/every <weekday>".
            let prefix_start = m.start().saturating_sub(10);
            let prefix = text
                .get(prefix_start..m.start())
                .unwrap_or("")
                .to_lowercase();
            if ["next", "this", "last", "every"]
                .iter()
                .any(|qualifier| prefix.contains(qualifier))
            {
                continue;
            }
            if let Some(weekday) = weekday_from_name(&cap[1]) {
                let date = self.next_weekday(weekday, false);
                spans.push(Span::from_match(&m, date));
            }
        }

        // "in N days/weeks/months"
        for cap in IN_INTERVAL.captures_iter(text) {
            let Ok(amount) = cap[1].parse::<i64>() else {
                continue;
            };
            let date = match cap[2].to_lowercase().as_str() {
                "day" | "days" => Some(self.reference.date() + Duration::days(amount)),
                "week" | "weeks" => Some(self.reference.date() + Duration::weeks(amount)),
                "month" | "months" => add_months(self.reference.date(), amount as i32),
                _ => None,
            };
            if let Some(date) = date {
                spans.push(Span::from_match(&cap.get(0).unwrap(), date));
            }
        }

        remove_overlaps(&mut spans);
        spans
    }

    // ========================================================================
    // Time expressions
    // ========================================================================

    fn find_times(&self, text: &str) -> Vec<Span<NaiveTime>> {
        let mut spans = Vec::new();

        // 12-hour format: 10am, 3:30 pm
        for cap in TIME_12H.captures_iter(text) {
            let Ok(mut hour) = cap[1].parse::<u32>() else {
                continue;
            };
            let minute = cap
                .get(2)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            let period = cap[3].to_lowercase();
            if period.starts_with('p') && hour != 12 {
                hour += 12;
            } else if period.starts_with('a') && hour == 12 {
                hour = 0;
            }
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                spans.push(Span::from_match(&cap.get(0).unwrap(), time));
            }
        }

        // 24-hour format: 15:30
        for cap in TIME_24H.captures_iter(text) {
            if let (Ok(hour), Ok(minute)) = (cap[1].parse::<u32>(), cap[2].parse::<u32>()) {
                if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                    spans.push(Span::from_match(&cap.get(0).unwrap(), time));
                }
            }
        }

        // Named times with an unambiguous clock value
        for cap in NAMED_TIME.captures_iter(text) {
            let time = match cap[1].to_lowercase().as_str() {
                "noon" | "midday" => NaiveTime::from_hms_opt(12, 0, 0),
                "midnight" => Some(NaiveTime::MIN),
                _ => None,
            };
            if let Some(time) = time {
                spans.push(Span::from_match(&cap.get(0).unwrap(), time));
            }
        }

        remove_overlaps(&mut spans);
        spans
    }

    /// Next occurrence of a weekday relative to the reference date.
    ///
    /// With `skip_this_week`, a hit within the coming seven days is pushed
    /// out one more week ("next Tuesday" from a Wednesday lands beyond the
    /// upcoming Tuesday).
    fn next_weekday(&self, target: Weekday, skip_this_week: bool) -> NaiveDate {
        let current = self.reference.date().weekday().num_days_from_monday();
        let target_num = target.num_days_from_monday();

        let mut days_ahead = if target_num > current {
            (target_num - current) as i64
        } else if target_num < current {
            (7 - current + target_num) as i64
        } else if skip_this_week {
            7
        } else {
            0
        };

        if skip_this_week && days_ahead < 7 {
            days_ahead += 7;
        }

        self.reference.date() + Duration::days(days_ahead)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// A recognized expression with its location in the text.
struct Span<T> {
    value: T,
    start: usize,
    end: usize,
}

impl<T> Span<T> {
    fn from_match(m: &regex::Match<'_>, value: T) -> Self {
        Self {
            value,
            start: m.start(),
            end: m.end(),
        }
    }
}

/// Sort spans by position and drop overlaps, keeping the earlier (and on
/// ties, the longer) span.
fn remove_overlaps<T>(spans: &mut Vec<Span<T>>) {
    spans.sort_by_key(|s| (s.start, usize::MAX - (s.end - s.start)));
    let mut i = 0;
    while i + 1 < spans.len() {
        if spans[i + 1].start < spans[i].end {
            spans.remove(i + 1);
        } else {
            i += 1;
        }
    }
}

/// Whether the text continues with "-<digit>" at `offset`, i.e. the match
/// is the head of a day range.
fn followed_by_day_range(text: &str, offset: usize) -> bool {
    let rest = text.get(offset..).unwrap_or("");
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name.to_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(year, month, date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
}

// ============================================================================
// Patterns
// ============================================================================

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("Invalid regex"));

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s*(\d{4}))?\b",
    )
    .expect("Invalid regex")
});

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{2,4})\b").expect("Invalid regex"));

static RELATIVE_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(day after tomorrow|tomorrow|today)\b").expect("Invalid regex")
});

static NEXT_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bnext\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("Invalid regex")
});

static THIS_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bthis\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("Invalid regex")
});

static BARE_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("Invalid regex")
});

static IN_INTERVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bin\s+(\d+)\s+(day|days|week|weeks|month|months)\b").expect("Invalid regex")
});

static TIME_12H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)\b").expect("Invalid regex")
});

static TIME_24H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("Invalid regex"));

static NAMED_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(noon|midday|midnight)\b").expect("Invalid regex"));

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})\s*-\s*(\d{1,2})\b",
    )
    .expect("Invalid regex")
});

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn grammar_at(year: i32, month: u32, day: u32) -> TemporalGrammar {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        TemporalGrammar::with_reference(date.and_hms_opt(8, 0, 0).unwrap())
    }

    #[test]
    fn test_no_date_yields_zero_confidence() {
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Email Mike about partnership");
        assert!(!entity.found());
        assert_eq!(entity.confidence, 0.0);
        assert!(entity.date_start.is_none());
    }

    #[test]
    fn test_tomorrow_with_time() {
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Meeting with Sarah tomorrow at 10am");
        assert!(entity.time_specified);
        assert!(!entity.all_day);
        assert_eq!(entity.confidence, GRAMMAR_CONFIDENCE);

        let start = entity.date_start.unwrap();
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
        assert_eq!(start.hour(), 10);
        assert_eq!(start.minute(), 0);
    }

    #[test]
    fn test_next_weekday_is_always_in_the_future() {
        // 2024-01-10 is a Wednesday.
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Follow up with Sarah next Tuesday");
        let start = entity.date_start.unwrap();
        assert_eq!(start.date().weekday(), Weekday::Tue);
        assert!(start.date() > grammar.reference().date());
        assert!(!entity.time_specified);
        assert!(entity.all_day);
    }

    #[test]
    fn test_bare_weekday_resolves_forward() {
        // From a Wednesday, "Friday" is two days out.
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Introduce Mac to Geoff Friday");
        assert_eq!(
            entity.date_start.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()
        );
    }

    #[test]
    fn test_bare_weekday_never_resolves_to_the_past() {
        // From a Wednesday, "Monday" is five days ahead, not two behind.
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Call Tim Monday");
        assert_eq!(
            entity.date_start.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_in_n_days() {
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Send deck to Mia in 3 days");
        assert_eq!(
            entity.date_start.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()
        );
        assert!(entity.all_day);
    }

    #[test]
    fn test_iso_date() {
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Review due 2024-02-01");
        assert_eq!(
            entity.date_start.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_month_day_with_implied_year() {
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Dinner on March 3rd");
        assert_eq!(
            entity.date_start.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
        );
    }

    #[test]
    fn test_time_only_rolls_forward_past_reference() {
        // Reference is 08:00; "at 2pm" is later today, "at 7am" is tomorrow.
        let grammar = grammar_at(2024, 1, 10);

        let later = grammar.extract("Standup at 2pm");
        assert_eq!(
            later.date_start.unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap()
        );

        let earlier = grammar.extract("Standup at 7am");
        assert_eq!(
            earlier.date_start.unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 11)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_twelve_hour_conversion() {
        let grammar = grammar_at(2024, 1, 10);
        let noon = grammar.extract("lunch tomorrow at 12pm");
        assert_eq!(noon.date_start.unwrap().hour(), 12);

        let midnight = grammar.extract("deploy tomorrow at 12am");
        assert_eq!(midnight.date_start.unwrap().hour(), 0);

        let half = grammar.extract("call tomorrow at 3:30 pm");
        let start = half.date_start.unwrap();
        assert_eq!((start.hour(), start.minute()), (15, 30));
    }

    #[test]
    fn test_grammar_declines_day_ranges() {
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract("Georgetown trip March 20-22");
        assert!(!entity.found());
    }

    #[test]
    fn test_range_fallback() {
        let grammar = grammar_at(2024, 1, 10);
        let entity = grammar.extract_range("Georgetown trip March 20-22").unwrap();

        assert_eq!(entity.confidence, RANGE_CONFIDENCE);
        assert!(entity.all_day);
        assert!(!entity.time_specified);
        assert_eq!(
            entity.date_start.unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 20)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(
            entity.date_end.unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 22)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap()
        );
    }

    #[test]
    fn test_range_fallback_requires_full_month_name() {
        let grammar = grammar_at(2024, 1, 10);
        assert!(grammar.extract_range("trip Mar 20-22").is_none());
    }

    #[test]
    fn test_range_fallback_rejects_invalid_days() {
        let grammar = grammar_at(2024, 1, 10);
        assert!(grammar.extract_range("trip February 20-32").is_none());
    }

    #[test]
    fn test_overlapping_expressions_keep_first() {
        // "next tuesday" must not also surface a bare "tuesday" hit.
        let grammar = grammar_at(2024, 1, 10);
        let dates = grammar.find_dates("see you next tuesday");
        assert_eq!(dates.len(), 1);
    }
}
