//! Scans normalized text for date/time expressions and resolves them into
//! timezone-aware timestamps.
//!
//! Recognized families: ISO dates, written month-day dates ("Nov 10 at
//! 3pm"), relative day words (today / tonight / tomorrow), weekday
//! references with an optional "next"/"this" qualifier, and bare clock
//! times ("at 3pm", "at 15:00"). Ambiguous relative dates resolve into the
//! future
//! relative to `now`; a missing time-of-day inherits the current time
//! truncated to the minute. All resolutions are localized into the target
//! timezone before they leave this module.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Weekday,
};
use chrono_tz::Tz;
use regex::{Captures, Regex};

use super::types::TemporalCandidate;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<y>\d{4})-(?P<mo>\d{2})-(?P<d>\d{2})(?:[T ](?P<h>\d{2}):(?P<min>\d{2})(?::\d{2})?)?",
    )
    .unwrap()
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<mon>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(?P<d>\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(?P<y>\d{4}))?(?:\s+at\s+(?P<h>\d{1,2})(?::(?P<min>\d{2}))?\s*(?P<ap>am|pm)?)?",
    )
    .unwrap()
});

static RELATIVE_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<word>today|tonight|tomorrow)\b(?:\s+at\s+(?P<h>\d{1,2})(?::(?P<min>\d{2}))?\s*(?P<ap>am|pm)?)?",
    )
    .unwrap()
});

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?P<qual>next|this)\s+)?(?P<wd>monday|mon|tuesday|tues|tue|wednesday|wed|thursday|thurs|thu|friday|fri|saturday|sat|sunday|sun)\b(?:\s+at\s+(?P<h>\d{1,2})(?::(?P<min>\d{2}))?\s*(?P<ap>am|pm)?)?",
    )
    .unwrap()
});

static BARE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bat\s+(?P<h>\d{1,2})(?::(?P<min>\d{2}))?\s*(?P<ap>am|pm)?\b").unwrap()
});

/// Mirrors the duration phrase grammar: "<n> (minutes|mins|hours|hr|hour)[s]".
static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(minutes|mins|hours|hr|hour)s?").unwrap());

/// Find date/time expressions in `text`, in order of appearance, resolved
/// against `now` in the target timezone. Overlapping matches keep the
/// earliest-starting one. An empty result is not an error.
pub fn extract_temporal_candidates(text: &str, tz: Tz, now: DateTime<Tz>) -> Vec<TemporalCandidate> {
    let default_time =
        NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(NaiveTime::MIN);

    let mut raw: Vec<(usize, usize, TemporalCandidate)> = Vec::new();
    let mut push = |caps: &Captures<'_>, when: Option<DateTime<Tz>>| {
        if let Some(when) = when {
            let m = caps.get(0).unwrap();
            raw.push((
                m.start(),
                m.end(),
                TemporalCandidate {
                    matched: m.as_str().to_string(),
                    when,
                },
            ));
        }
    };

    for caps in ISO_DATE.captures_iter(text) {
        push(&caps, resolve_iso(&caps, tz, default_time));
    }
    for caps in MONTH_DAY.captures_iter(text) {
        push(&caps, resolve_month_day(&caps, tz, now, default_time));
    }
    for caps in RELATIVE_DAY.captures_iter(text) {
        push(&caps, resolve_relative_day(&caps, tz, now, default_time));
    }
    for caps in WEEKDAY.captures_iter(text) {
        push(&caps, resolve_weekday(&caps, tz, now, default_time));
    }
    for caps in BARE_TIME.captures_iter(text) {
        push(&caps, resolve_bare_time(&caps, tz, now));
    }

    // Appearance order; on equal starts prefer the longer match, then drop
    // anything that overlaps an already-kept span.
    raw.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    let mut out = Vec::new();
    let mut last_end = 0usize;
    for (start, end, cand) in raw {
        if start >= last_end {
            last_end = end;
            out.push(cand);
        }
    }
    out
}

/// First duration phrase in the text, if any. "45 minutes" and "2 hours"
/// parse; a bare "45 min" does not.
pub fn scan_duration(text: &str) -> Option<Duration> {
    let caps = DURATION.captures(text)?;
    let value: i64 = caps[1].parse().ok()?;
    let unit = caps[2].to_ascii_lowercase();
    if unit.starts_with('h') {
        Some(Duration::hours(value))
    } else {
        Some(Duration::minutes(value))
    }
}

fn resolve_iso(caps: &Captures<'_>, tz: Tz, default_time: NaiveTime) -> Option<DateTime<Tz>> {
    let date = NaiveDate::from_ymd_opt(
        caps["y"].parse().ok()?,
        caps["mo"].parse().ok()?,
        caps["d"].parse().ok()?,
    )?;
    let time = match caps.name("h") {
        Some(h) => NaiveTime::from_hms_opt(
            h.as_str().parse().ok()?,
            caps["min"].parse().ok()?,
            0,
        )?,
        None => default_time,
    };
    Some(localize(tz, date.and_time(time)))
}

fn resolve_month_day(
    caps: &Captures<'_>,
    tz: Tz,
    now: DateTime<Tz>,
    default_time: NaiveTime,
) -> Option<DateTime<Tz>> {
    let month = month_number(&caps["mon"])?;
    let day: u32 = caps["d"].parse().ok()?;
    let time = captured_time(caps)?.unwrap_or(default_time);

    if let Some(y) = caps.name("y") {
        let date = NaiveDate::from_ymd_opt(y.as_str().parse().ok()?, month, day)?;
        return Some(localize(tz, date.and_time(time)));
    }

    // No year given: this year, pushed to next year if already past.
    let date = NaiveDate::from_ymd_opt(now.year(), month, day)?;
    let resolved = localize(tz, date.and_time(time));
    if resolved <= now {
        let date = NaiveDate::from_ymd_opt(now.year() + 1, month, day)?;
        return Some(localize(tz, date.and_time(time)));
    }
    Some(resolved)
}

fn resolve_relative_day(
    caps: &Captures<'_>,
    tz: Tz,
    now: DateTime<Tz>,
    default_time: NaiveTime,
) -> Option<DateTime<Tz>> {
    let word = caps["word"].to_ascii_lowercase();
    let date = match word.as_str() {
        "tomorrow" => now.date_naive().succ_opt()?,
        _ => now.date_naive(),
    };
    let time = match captured_time(caps)? {
        Some(t) => t,
        None if word == "tonight" => NaiveTime::from_hms_opt(20, 0, 0)?,
        None => default_time,
    };
    Some(localize(tz, date.and_time(time)))
}

fn resolve_weekday(
    caps: &Captures<'_>,
    tz: Tz,
    now: DateTime<Tz>,
    default_time: NaiveTime,
) -> Option<DateTime<Tz>> {
    let target = weekday_from_name(&caps["wd"])?;
    let qualifier = caps.name("qual").map(|q| q.as_str().to_ascii_lowercase());
    let time = captured_time(caps)?.unwrap_or(default_time);

    let today = now.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - today).rem_euclid(7);

    // Prefer the future: a plain weekday that already passed today rolls a
    // week forward; "next <weekday>" never resolves to the current moment.
    if ahead == 0 {
        let same_day = localize(tz, now.date_naive().and_time(time));
        if qualifier.as_deref() == Some("next") || same_day <= now {
            ahead = 7;
        }
    }

    let date = now.date_naive() + Duration::days(ahead);
    Some(localize(tz, date.and_time(time)))
}

fn resolve_bare_time(caps: &Captures<'_>, tz: Tz, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    // A bare hour ("at 5") is too ambiguous; require minutes or a meridiem.
    if caps.name("min").is_none() && caps.name("ap").is_none() {
        return None;
    }
    let time = captured_time(caps)??;
    let today = localize(tz, now.date_naive().and_time(time));
    if today <= now {
        return Some(localize(tz, (now.date_naive().succ_opt()?).and_time(time)));
    }
    Some(today)
}

/// Extract the optional "at H[:MM] [am|pm]" clause shared by the patterns.
/// Outer `None` means the captured digits were not a valid clock time;
/// inner `None` means no time clause was present.
fn captured_time(caps: &Captures<'_>) -> Option<Option<NaiveTime>> {
    let Some(h) = caps.name("h") else {
        return Some(None);
    };
    let mut hour: u32 = h.as_str().parse().ok()?;
    let minute: u32 = caps
        .name("min")
        .map_or(Ok(0), |m| m.as_str().parse())
        .ok()?;
    match caps.name("ap").map(|m| m.as_str().to_ascii_lowercase()) {
        Some(ref ap) if ap == "pm" && hour != 12 => hour += 12,
        Some(ref ap) if ap == "am" && hour == 12 => hour = 0,
        _ => {}
    }
    NaiveTime::from_hms_opt(hour, minute, 0).map(Some)
}

/// Localize a naive timestamp into `tz`. DST ambiguity resolves to the
/// earlier instant; a DST gap falls back to reading the naive value as UTC.
fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let prefix = lower.get(..3)?;
    Some(match prefix {
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
    })
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let lower = name.to_ascii_lowercase();
    let prefix = lower.get(..3)?;
    Some(match prefix {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    })
}
