//! Resolution of natural-language date/time phrases into absolute timestamps.
//!
//! The grammar is an ordered rule list, most specific first. A rule never
//! matches text already claimed by an earlier rule, so "2 PM" is read as an
//! explicit time and not as the bare hour "2".

use std::fmt;
use std::ops::Range;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::ResolvedDateTime;

const MONTH: &str = r"(?P<month>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b";

const NUMBER_WORDS: [&str; 11] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

/// Clinic-hours rule for 12-hour times said without AM/PM.
///
/// Hours in `pm_from..=pm_to` are afternoon appointments, 12 is noon, other
/// hours up to 11 are morning. Hours 0 and 13-23 are already 24-hour values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeridiemPolicy {
    pub pm_from: u32,
    pub pm_to: u32,
}

impl Default for MeridiemPolicy {
    fn default() -> Self {
        Self { pm_from: 1, pm_to: 7 }
    }
}

impl MeridiemPolicy {
    pub fn hour_24(&self, hour: u32) -> u32 {
        match hour {
            0 | 12..=23 => hour,
            h if (self.pm_from..=self.pm_to).contains(&h) => h + 12,
            h => h,
        }
    }

    /// Parses `"1-7"` style ranges used in configuration.
    pub fn parse(s: &str) -> Option<Self> {
        let (from, to) = s.split_once('-')?;
        let pm_from: u32 = from.trim().parse().ok()?;
        let pm_to: u32 = to.trim().parse().ok()?;
        if pm_from == 0 || pm_from > pm_to || pm_to > 11 {
            return None;
        }
        Some(Self { pm_from, pm_to })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    NoMatch,
    InvalidDate(String),
    InvalidTime(String),
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionFailure::NoMatch => write!(f, "no date or time found"),
            ResolutionFailure::InvalidDate(s) => write!(f, "not a valid date: {s}"),
            ResolutionFailure::InvalidTime(s) => write!(f, "not a valid time: {s}"),
        }
    }
}

impl std::error::Error for ResolutionFailure {}

/// Which part of a timestamp a grammar rule supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Date,
    Time,
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalSpan {
    pub range: Range<usize>,
    pub component: Component,
}

enum Fragment {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

struct Context {
    today: NaiveDate,
    meridiem: MeridiemPolicy,
}

type ParseFn = fn(&Captures, &Context) -> Result<Fragment, ResolutionFailure>;

struct TemporalRule {
    name: &'static str,
    component: Component,
    regex: Regex,
    parse: ParseFn,
}

fn rule(name: &'static str, component: Component, pattern: &str, parse: ParseFn) -> TemporalRule {
    TemporalRule {
        name,
        component,
        regex: Regex::new(&format!("(?i){pattern}")).expect("temporal pattern must compile"),
        parse,
    }
}

static RULES: Lazy<Vec<TemporalRule>> = Lazy::new(|| {
    vec![
        rule(
            "iso_datetime",
            Component::DateTime,
            r"\b(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})[t\s]+(?P<h>\d{1,2}):(?P<min>\d{2})\b",
            parse_iso_datetime,
        ),
        rule(
            "iso_date",
            Component::Date,
            r"\b(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})\b",
            parse_ymd,
        ),
        rule(
            "month_day",
            Component::Date,
            &format!(r"\b{MONTH}\.?\s+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<y>\d{{4}})\b)?"),
            parse_month_day,
        ),
        rule(
            "day_month",
            Component::Date,
            &format!(r"\b(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}(?:,?\s+(?P<y>\d{{4}})\b)?"),
            parse_month_day,
        ),
        rule(
            "numeric_date",
            Component::Date,
            r"\b(?P<m>\d{1,2})/(?P<d>\d{1,2})(?:/(?P<y>\d{4}|\d{2}))?\b",
            parse_numeric_date,
        ),
        rule(
            "weekday",
            Component::Date,
            r"\b(?:(?:next|this|on|coming)\s+)?(?P<day>monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
            parse_weekday,
        ),
        rule(
            "day_after_tomorrow",
            Component::Date,
            r"\b(?:the\s+)?day\s+after\s+tomorrow\b",
            |_, ctx| Ok(Fragment::Date(ctx.today + Duration::days(2))),
        ),
        rule("tomorrow", Component::Date, r"\btomorrow\b", |_, ctx| {
            Ok(Fragment::Date(ctx.today + Duration::days(1)))
        }),
        rule("today", Component::Date, r"\btoday\b", |_, ctx| {
            Ok(Fragment::Date(ctx.today))
        }),
        rule(
            "in_n_units",
            Component::Date,
            r"\bin\s+(?P<n>\d{1,3}|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(?P<unit>days?|weeks?)\b",
            parse_in_n_units,
        ),
        rule("next_week", Component::Date, r"\bnext\s+week\b", |_, ctx| {
            Ok(Fragment::Date(ctx.today + Duration::days(7)))
        }),
        rule(
            "meridiem_time",
            Component::Time,
            r"\b(?P<h>\d{1,2})(?::(?P<min>\d{2}))?\s*(?P<ampm>[ap])\.?\s?m\b\.?",
            parse_meridiem_time,
        ),
        rule(
            "named_time",
            Component::Time,
            r"\b(?P<name>noon|midday|midnight)\b",
            parse_named_time,
        ),
        rule(
            "clock_time",
            Component::Time,
            r"\b(?P<h>\d{1,2}):(?P<min>\d{2})\b",
            parse_policy_time,
        ),
        rule(
            "oclock",
            Component::Time,
            r"\b(?P<h>\d{1,2})\s*o'?clock\b",
            parse_policy_time,
        ),
        rule(
            "at_hour",
            Component::Time,
            r"\bat\s+(?P<h>\d{1,2})\b",
            parse_policy_time,
        ),
    ]
});

/// Matches claimed by the grammar, in rule priority order.
fn claims(text: &str) -> Vec<(&'static TemporalRule, Captures<'_>)> {
    let mut claimed: Vec<Range<usize>> = Vec::new();
    let mut out = Vec::new();

    for rule in RULES.iter() {
        for caps in rule.regex.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            let range = m.range();
            if claimed.iter().any(|c| c.start < range.end && range.start < c.end) {
                continue;
            }
            claimed.push(range);
            out.push((rule, caps));
        }
    }

    out
}

/// Spans of `text` recognized as dates or times, ordered by position.
pub fn temporal_spans(text: &str) -> Vec<TemporalSpan> {
    let mut spans: Vec<TemporalSpan> = claims(text)
        .into_iter()
        .filter_map(|(rule, caps)| {
            caps.get(0).map(|m| TemporalSpan {
                range: m.range(),
                component: rule.component,
            })
        })
        .collect();
    spans.sort_by_key(|s| s.range.start);
    spans
}

#[derive(Debug, Clone)]
pub struct DateTimeResolver {
    meridiem: MeridiemPolicy,
    default_time: NaiveTime,
}

impl DateTimeResolver {
    pub fn new(meridiem: MeridiemPolicy, default_time: NaiveTime) -> Self {
        Self {
            meridiem,
            default_time,
        }
    }

    /// Resolves `phrase` relative to `now`.
    ///
    /// A date without a time gets the default time of day. A time without a
    /// date is placed today, or tomorrow if it is not after `now`.
    pub fn resolve(
        &self,
        phrase: &str,
        now: NaiveDateTime,
    ) -> Result<ResolvedDateTime, ResolutionFailure> {
        let ctx = Context {
            today: now.date(),
            meridiem: self.meridiem,
        };

        let mut date: Option<NaiveDate> = None;
        let mut time: Option<NaiveTime> = None;

        for (rule, caps) in claims(phrase) {
            let fragment = (rule.parse)(&caps, &ctx)?;
            tracing::trace!(rule = rule.name, "temporal rule matched");
            match fragment {
                Fragment::DateTime(dt) => {
                    date.get_or_insert(dt.date());
                    time.get_or_insert(dt.time());
                }
                Fragment::Date(d) => {
                    date.get_or_insert(d);
                }
                Fragment::Time(t) => {
                    time.get_or_insert(t);
                }
            }
        }

        match (date, time) {
            (Some(d), Some(t)) => Ok(ResolvedDateTime {
                at: d.and_time(t),
                inferred: false,
            }),
            (Some(d), None) => Ok(ResolvedDateTime {
                at: d.and_time(self.default_time),
                inferred: true,
            }),
            (None, Some(t)) => {
                let today = ctx.today.and_time(t);
                let at = if today <= now {
                    today + Duration::days(1)
                } else {
                    today
                };
                Ok(ResolvedDateTime { at, inferred: true })
            }
            (None, None) => Err(ResolutionFailure::NoMatch),
        }
    }
}

fn whole(caps: &Captures) -> String {
    caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default()
}

fn num(caps: &Captures, name: &str) -> Option<u32> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
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
    name.to_lowercase().parse().ok()
}

/// A date given without a year is this year's, or next year's once it has passed.
fn date_in_coming_year(
    month: u32,
    day: u32,
    year: Option<i32>,
    ctx: &Context,
    text: String,
) -> Result<Fragment, ResolutionFailure> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day)
            .map(Fragment::Date)
            .ok_or(ResolutionFailure::InvalidDate(text));
    }

    let this_year = NaiveDate::from_ymd_opt(ctx.today.year(), month, day);
    match this_year {
        Some(d) if d >= ctx.today => Ok(Fragment::Date(d)),
        _ => NaiveDate::from_ymd_opt(ctx.today.year() + 1, month, day)
            .map(Fragment::Date)
            .ok_or(ResolutionFailure::InvalidDate(text)),
    }
}

fn parse_iso_datetime(caps: &Captures, ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let Fragment::Date(date) = parse_ymd(caps, ctx)? else {
        return Err(ResolutionFailure::InvalidDate(whole(caps)));
    };
    let hour = num(caps, "h").unwrap_or(24);
    let minute = num(caps, "min").unwrap_or(60);
    NaiveTime::from_hms_opt(hour, minute, 0)
        .map(|t| Fragment::DateTime(date.and_time(t)))
        .ok_or_else(|| ResolutionFailure::InvalidTime(whole(caps)))
}

fn parse_ymd(caps: &Captures, _ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let year = caps.name("y").and_then(|m| m.as_str().parse::<i32>().ok());
    match (year, num(caps, "m"), num(caps, "d")) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d)
            .map(Fragment::Date)
            .ok_or_else(|| ResolutionFailure::InvalidDate(whole(caps))),
        _ => Err(ResolutionFailure::InvalidDate(whole(caps))),
    }
}

fn parse_month_day(caps: &Captures, ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let month = caps.name("month").and_then(|m| month_number(m.as_str()));
    let day = num(caps, "d");
    let year = caps.name("y").and_then(|m| m.as_str().parse::<i32>().ok());
    match (month, day) {
        (Some(m), Some(d)) => date_in_coming_year(m, d, year, ctx, whole(caps)),
        _ => Err(ResolutionFailure::InvalidDate(whole(caps))),
    }
}

fn parse_numeric_date(caps: &Captures, ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let year = caps.name("y").and_then(|m| {
        let y: i32 = m.as_str().parse().ok()?;
        Some(if m.as_str().len() == 2 { 2000 + y } else { y })
    });
    match (num(caps, "m"), num(caps, "d")) {
        (Some(m), Some(d)) => date_in_coming_year(m, d, year, ctx, whole(caps)),
        _ => Err(ResolutionFailure::InvalidDate(whole(caps))),
    }
}

/// Named weekdays always mean the next occurrence strictly after today.
fn parse_weekday(caps: &Captures, ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let target = caps
        .name("day")
        .and_then(|m| weekday_from_name(m.as_str()))
        .ok_or_else(|| ResolutionFailure::InvalidDate(whole(caps)))?;

    let current = ctx.today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    Ok(Fragment::Date(ctx.today + Duration::days(ahead)))
}

fn parse_in_n_units(caps: &Captures, ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let raw = caps.name("n").map(|m| m.as_str().to_lowercase()).unwrap_or_default();
    let n: i64 = match raw.as_str() {
        "a" | "an" => 1,
        word => match NUMBER_WORDS.iter().position(|w| *w == word) {
            Some(i) => i as i64,
            None => word
                .parse()
                .map_err(|_| ResolutionFailure::InvalidDate(whole(caps)))?,
        },
    };
    let unit = caps.name("unit").map(|m| m.as_str().to_lowercase()).unwrap_or_default();
    let days = if unit.starts_with("week") { n * 7 } else { n };
    Ok(Fragment::Date(ctx.today + Duration::days(days)))
}

fn parse_meridiem_time(caps: &Captures, _ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let invalid = || ResolutionFailure::InvalidTime(whole(caps));
    let hour = num(caps, "h").ok_or_else(invalid)?;
    let minute = num(caps, "min").unwrap_or(0);
    if !(1..=12).contains(&hour) {
        return Err(invalid());
    }
    let pm = caps
        .name("ampm")
        .map(|m| m.as_str().eq_ignore_ascii_case("p"))
        .unwrap_or(false);
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
        .map(Fragment::Time)
        .ok_or_else(invalid)
}

fn parse_named_time(caps: &Captures, _ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let name = caps.name("name").map(|m| m.as_str().to_lowercase()).unwrap_or_default();
    let hour = if name == "midnight" { 0 } else { 12 };
    NaiveTime::from_hms_opt(hour, 0, 0)
        .map(Fragment::Time)
        .ok_or_else(|| ResolutionFailure::InvalidTime(whole(caps)))
}

fn parse_policy_time(caps: &Captures, ctx: &Context) -> Result<Fragment, ResolutionFailure> {
    let invalid = || ResolutionFailure::InvalidTime(whole(caps));
    let hour = num(caps, "h").ok_or_else(invalid)?;
    let minute = num(caps, "min").unwrap_or(0);
    if hour > 23 {
        return Err(invalid());
    }
    NaiveTime::from_hms_opt(ctx.meridiem.hour_24(hour), minute, 0)
        .map(Fragment::Time)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn resolver() -> DateTimeResolver {
        DateTimeResolver::new(
            MeridiemPolicy::default(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
    }

    // 2024-01-01 is a Monday.
    const NOW: &str = "2024-01-01 09:00";

    fn resolve(phrase: &str) -> Result<ResolvedDateTime, ResolutionFailure> {
        resolver().resolve(phrase, dt(NOW))
    }

    #[test]
    fn test_tomorrow_is_next_calendar_day_at_default_time() {
        let r = resolve("tomorrow").unwrap();
        assert_eq!(r.at, dt("2024-01-02 09:00"));
        assert!(r.inferred);

        let late = resolver().resolve("tomorrow", dt("2024-12-31 23:30")).unwrap();
        assert_eq!(late.at.date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_time_and_relative_day() {
        let r = resolve("2 PM tomorrow").unwrap();
        assert_eq!(r.at, dt("2024-01-02 14:00"));
        assert!(!r.inferred);

        let r = resolve("tomorrow at 10:30 am").unwrap();
        assert_eq!(r.at, dt("2024-01-02 10:30"));
    }

    #[test]
    fn test_next_weekday_is_strictly_future() {
        assert_eq!(resolve("next Tuesday").unwrap().at, dt("2024-01-02 09:00"));

        // 2024-01-02 is itself a Tuesday
        let on_tuesday = dt("2024-01-02 08:00");
        let r = resolver().resolve("next Tuesday", on_tuesday).unwrap();
        assert_eq!(r.at, dt("2024-01-09 09:00"));
        let r = resolver().resolve("tuesday", on_tuesday).unwrap();
        assert_eq!(r.at, dt("2024-01-09 09:00"));
        let r = resolver().resolve("this Tuesday at 4pm", on_tuesday).unwrap();
        assert_eq!(r.at, dt("2024-01-09 16:00"));
    }

    #[test]
    fn test_weekday_earlier_in_week_wraps() {
        let friday = dt("2024-01-05 12:00");
        let r = resolver().resolve("on Monday", friday).unwrap();
        assert_eq!(r.at, dt("2024-01-08 09:00"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        for phrase in ["next Tuesday", "3 PM", "in 3 days", "March 5th at 11"] {
            assert_eq!(resolve(phrase), resolve(phrase));
        }
    }

    #[test]
    fn test_time_only_today_or_tomorrow() {
        let r = resolve("3 PM").unwrap();
        assert_eq!(r.at, dt("2024-01-01 15:00"));
        assert!(r.inferred);

        let r = resolve("8 am").unwrap();
        assert_eq!(r.at, dt("2024-01-02 08:00"));

        // exactly now counts as passed
        let r = resolve("9:00 am").unwrap();
        assert_eq!(r.at, dt("2024-01-02 09:00"));
    }

    #[test]
    fn test_meridiem_policy() {
        let policy = MeridiemPolicy::default();
        assert_eq!(policy.hour_24(1), 13);
        assert_eq!(policy.hour_24(7), 19);
        assert_eq!(policy.hour_24(8), 8);
        assert_eq!(policy.hour_24(11), 11);
        assert_eq!(policy.hour_24(12), 12);
        assert_eq!(policy.hour_24(0), 0);
        assert_eq!(policy.hour_24(15), 15);
    }

    #[test]
    fn test_ambiguous_hours_follow_policy() {
        assert_eq!(resolve("tomorrow at 3").unwrap().at, dt("2024-01-02 15:00"));
        assert_eq!(resolve("tomorrow at 9").unwrap().at, dt("2024-01-02 09:00"));
        assert_eq!(resolve("tomorrow at 12").unwrap().at, dt("2024-01-02 12:00"));
        assert_eq!(resolve("tomorrow at 14").unwrap().at, dt("2024-01-02 14:00"));
        assert_eq!(resolve("tomorrow 7:30").unwrap().at, dt("2024-01-02 19:30"));
        assert_eq!(resolve("tomorrow 5 o'clock").unwrap().at, dt("2024-01-02 17:00"));
    }

    #[test]
    fn test_explicit_twelve() {
        assert_eq!(resolve("tomorrow 12 am").unwrap().at, dt("2024-01-02 00:00"));
        assert_eq!(resolve("tomorrow 12 pm").unwrap().at, dt("2024-01-02 12:00"));
        assert_eq!(resolve("tomorrow at noon").unwrap().at, dt("2024-01-02 12:00"));
        assert_eq!(resolve("tomorrow 3 p.m.").unwrap().at, dt("2024-01-02 15:00"));
    }

    #[test]
    fn test_custom_meridiem_policy() {
        let r = DateTimeResolver::new(
            MeridiemPolicy { pm_from: 1, pm_to: 5 },
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        assert_eq!(r.resolve("tomorrow at 6", dt(NOW)).unwrap().at, dt("2024-01-02 06:00"));
    }

    #[test]
    fn test_parse_meridiem_policy() {
        assert_eq!(MeridiemPolicy::parse("1-7"), Some(MeridiemPolicy::default()));
        assert_eq!(
            MeridiemPolicy::parse(" 2 - 6 "),
            Some(MeridiemPolicy { pm_from: 2, pm_to: 6 })
        );
        assert_eq!(MeridiemPolicy::parse("7-1"), None);
        assert_eq!(MeridiemPolicy::parse("0-7"), None);
        assert_eq!(MeridiemPolicy::parse("afternoon"), None);
    }

    #[test]
    fn test_absolute_dates() {
        assert_eq!(resolve("March 5th").unwrap().at, dt("2024-03-05 09:00"));
        assert_eq!(resolve("5th of March at 10:15 am").unwrap().at, dt("2024-03-05 10:15"));
        assert_eq!(resolve("Jan 1").unwrap().at, dt("2024-01-01 09:00"));
        assert_eq!(resolve("3/15").unwrap().at, dt("2024-03-15 09:00"));
        assert_eq!(resolve("3/15/25 at 2pm").unwrap().at, dt("2025-03-15 14:00"));
        assert_eq!(resolve("Dec 25, 2023").unwrap().at, dt("2023-12-25 09:00"));
    }

    #[test]
    fn test_past_month_day_rolls_to_next_year() {
        let r = resolver().resolve("February 10", dt("2024-06-01 09:00")).unwrap();
        assert_eq!(r.at, dt("2025-02-10 09:00"));
    }

    #[test]
    fn test_iso_forms() {
        let r = resolve("2024-02-10 16:45").unwrap();
        assert_eq!(r.at, dt("2024-02-10 16:45"));
        assert!(!r.inferred);
        assert_eq!(resolve("2024-02-10T08:05").unwrap().at, dt("2024-02-10 08:05"));
        assert_eq!(resolve("2024-02-10").unwrap().at, dt("2024-02-10 09:00"));
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(resolve("in 3 days").unwrap().at, dt("2024-01-04 09:00"));
        assert_eq!(resolve("in two weeks").unwrap().at, dt("2024-01-15 09:00"));
        assert_eq!(resolve("in a week").unwrap().at, dt("2024-01-08 09:00"));
        assert_eq!(resolve("next week").unwrap().at, dt("2024-01-08 09:00"));
        assert_eq!(resolve("the day after tomorrow").unwrap().at, dt("2024-01-03 09:00"));
        assert_eq!(resolve("today at 4pm").unwrap().at, dt("2024-01-01 16:00"));
    }

    #[test]
    fn test_failures() {
        assert_eq!(resolve("sometime"), Err(ResolutionFailure::NoMatch));
        assert_eq!(resolve(""), Err(ResolutionFailure::NoMatch));
        assert!(matches!(resolve("February 30"), Err(ResolutionFailure::InvalidDate(_))));
        assert!(matches!(resolve("13 pm"), Err(ResolutionFailure::InvalidTime(_))));
        assert!(matches!(resolve("tomorrow 25:00"), Err(ResolutionFailure::InvalidTime(_))));
    }

    #[test]
    fn test_temporal_spans_ordered_by_position() {
        let text = "Book for Sarah at 2 PM tomorrow";
        let spans = temporal_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[0].range.clone()], "2 PM");
        assert_eq!(spans[0].component, Component::Time);
        assert_eq!(&text[spans[1].range.clone()], "tomorrow");
        assert_eq!(spans[1].component, Component::Date);
    }

    #[test]
    fn test_specific_rule_claims_text_first() {
        let spans = temporal_spans("the day after tomorrow at 3 pm");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].range, 0..22);
    }
}
