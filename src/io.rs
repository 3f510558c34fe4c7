use crate::duration::start_of_day;
use crate::model::{NonWorkingPeriod, Schedule, ShiftInstance};
use anyhow::{bail, Context};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Lit une définition de planning JSON (format de l'API, camelCase). La
/// validation reste à la charge de `WorkSchedule::new`.
pub fn load_schedule_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Schedule> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let schedule: Schedule = serde_json::from_slice(&data)
        .with_context(|| format!("parsing schedule {}", path.display()))?;
    Ok(schedule)
}

/// Export JSON d'une définition (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Import de périodes non travaillées: header `name,start,end[,description]`.
/// `start`/`end` en date-heure locale ISO ou en date seule ; une date de fin
/// seule est inclusive (fin au lendemain 00:00).
pub fn import_non_working_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NonWorkingPeriod>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid period row (empty name)");
        }
        let (start, _) = parse_point(rec.get(1).context("missing start")?.trim())
            .with_context(|| format!("invalid start for period {name}"))?;
        let (mut end, end_was_date) = parse_point(rec.get(2).context("missing end")?.trim())
            .with_context(|| format!("invalid end for period {name}"))?;
        if end_was_date {
            end += Duration::days(1);
        }
        if end <= start {
            bail!("period {name}: end must be after start");
        }
        let mut period = NonWorkingPeriod::new(name, start, end);
        if let Some(desc) = rec.get(3) {
            period.description = desc.trim().to_string();
        }
        out.push(period);
    }
    Ok(out)
}

fn parse_point(raw: &str) -> anyhow::Result<(NaiveDateTime, bool)> {
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Ok((dt, false));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Ok((dt, false));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date/datetime: {raw}"))?;
    Ok((start_of_day(date), true))
}

/// Export CSV des instances: header `team,shift,start,end`
pub fn export_instances_csv<P: AsRef<Path>>(
    path: P,
    instances: &[ShiftInstance],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    w.write_record(["team", "shift", "start", "end"])?;
    for i in instances {
        let start = i.start_time.format("%Y-%m-%dT%H:%M:%S").to_string();
        let end = i.end_time.format("%Y-%m-%dT%H:%M:%S").to_string();
        w.write_record([
            i.team_name.as_str(),
            i.shift_name.as_str(),
            start.as_str(),
            end.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
