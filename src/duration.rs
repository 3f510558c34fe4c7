//! Durées ISO-8601 (`PT8H`, `PT1H30M`, `P1D`) et arithmétique calendaire.
//!
//! Seules les unités jour/heure/minute/seconde sont acceptées : pas de mois
//! ni d'années, dont la longueur dépend du calendrier.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ISO-8601 duration: {0:?}")]
pub struct DurationParseError(pub String);

/// Parse une durée ISO-8601 de la forme `[-]P[nD][T[nH][nM][n[.f]S]]`.
pub fn parse_iso(raw: &str) -> Result<Duration, DurationParseError> {
    let err = || DurationParseError(raw.to_string());
    let s = raw.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let s = s
        .strip_prefix(|c: char| c == 'P' || c == 'p')
        .ok_or_else(err)?;

    let (date_part, time_part) = match s.find(|c: char| c == 'T' || c == 't') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };

    let mut total = Duration::zero();
    let mut seen = false;

    if !date_part.is_empty() {
        let days = date_part
            .strip_suffix(|c: char| c == 'D' || c == 'd')
            .ok_or_else(err)?;
        let days = Duration::try_days(parse_digits(days).ok_or_else(err)?).ok_or_else(err)?;
        total = total.checked_add(&days).ok_or_else(err)?;
        seen = true;
    }

    if let Some(mut rest) = time_part {
        if rest.is_empty() {
            return Err(err());
        }
        let mut last_rank = 0;
        while !rest.is_empty() {
            let idx = rest
                .find(|c: char| c.is_ascii_alphabetic())
                .ok_or_else(err)?;
            let (num, unit) = (&rest[..idx], rest.as_bytes()[idx].to_ascii_uppercase());
            rest = &rest[idx + 1..];
            let rank = match unit {
                b'H' => 1,
                b'M' => 2,
                b'S' => 3,
                _ => return Err(err()),
            };
            if rank <= last_rank || num.is_empty() {
                return Err(err());
            }
            last_rank = rank;
            let part = match unit {
                b'H' => Duration::try_hours(parse_digits(num).ok_or_else(err)?),
                b'M' => Duration::try_minutes(parse_digits(num).ok_or_else(err)?),
                _ => parse_seconds(num),
            }
            .ok_or_else(err)?;
            total = total.checked_add(&part).ok_or_else(err)?;
            seen = true;
        }
    }

    if !seen {
        return Err(err());
    }
    Ok(if negative { -total } else { total })
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_seconds(s: &str) -> Option<Duration> {
    let (whole, frac) = match s.split_once(|c: char| c == '.' || c == ',') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    let mut out = Duration::try_seconds(parse_digits(whole)?)?;
    if let Some(frac) = frac {
        if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let nanos: i64 = format!("{frac:0<9}").parse().ok()?;
        out = out.checked_add(&Duration::nanoseconds(nanos))?;
    }
    Some(out)
}

/// Formate une durée en heures/minutes/secondes (`PT32H`, jamais `P1DT8H`).
/// La durée nulle s'écrit `PT0H`.
pub fn format_iso(d: Duration) -> String {
    if d.is_zero() {
        return "PT0H".to_string();
    }
    let negative = d < Duration::zero();
    let d = if negative { -d } else { d };

    let secs = d.num_seconds();
    let nanos = d.subsec_nanos();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    let mut out = String::from(if negative { "-PT" } else { "PT" });
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if nanos > 0 {
        let frac = format!("{nanos:09}");
        out.push_str(&format!("{seconds}.{}S", frac.trim_end_matches('0')));
    } else if seconds > 0 {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

/// Nombre de jours (signé) de `from` à `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Adaptateur serde : `chrono::Duration` <-> chaîne ISO-8601.
pub mod iso {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso(*d))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_iso(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_minutes_seconds() {
        assert_eq!(parse_iso("PT8H").unwrap(), Duration::hours(8));
        assert_eq!(
            parse_iso("PT1H30M").unwrap(),
            Duration::minutes(90)
        );
        assert_eq!(parse_iso("PT45S").unwrap(), Duration::seconds(45));
        assert_eq!(
            parse_iso("PT0.5S").unwrap(),
            Duration::milliseconds(500)
        );
    }

    #[test]
    fn parses_days_as_24_hours() {
        assert_eq!(parse_iso("P1D").unwrap(), Duration::hours(24));
        assert_eq!(parse_iso("P1DT2H").unwrap(), Duration::hours(26));
    }

    #[test]
    fn parses_negative_durations() {
        assert_eq!(parse_iso("-PT2H").unwrap(), Duration::hours(-2));
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "P", "PT", "8H", "PT8", "PT30M1H", "P1M", "PT-1H", "PTH", "P1Y"] {
            assert!(parse_iso(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn formats_like_the_rest_api() {
        assert_eq!(format_iso(Duration::hours(8)), "PT8H");
        assert_eq!(format_iso(Duration::minutes(90)), "PT1H30M");
        assert_eq!(format_iso(Duration::hours(48)), "PT48H");
        assert_eq!(format_iso(Duration::seconds(3725)), "PT1H2M5S");
        assert_eq!(format_iso(Duration::milliseconds(1500)), "PT1.5S");
        assert_eq!(format_iso(Duration::zero()), "PT0H");
        assert_eq!(format_iso(Duration::minutes(-30)), "-PT30M");
    }

    #[test]
    fn days_between_is_signed() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(days_between(a, b), 7);
        assert_eq!(days_between(b, a), -7);
    }
}
