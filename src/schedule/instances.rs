use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{ScheduleError, WorkSchedule};
use crate::interval::Interval;
use crate::model::ShiftInstance;

pub(super) fn on_date(ws: &WorkSchedule, date: NaiveDate) -> Result<Vec<ShiftInstance>, ScheduleError> {
    let mut out = Vec::with_capacity(ws.teams().len());
    for team_idx in 0..ws.teams().len() {
        if let Some(instance) = materialize(ws, team_idx, date)? {
            out.push(instance);
        }
    }
    sort(&mut out);
    Ok(out)
}

/// Parcourt les jours calendaires (et non les secondes) de la requête, plus
/// les quelques jours précédents dont un poste peut encore déborder.
pub(super) fn in_range(
    ws: &WorkSchedule,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<ShiftInstance>, ScheduleError> {
    if from >= to {
        return Err(ScheduleError::InvalidRange { from, to });
    }
    let last = to.date();
    let mut day = from
        .date()
        .checked_sub_signed(Duration::days(ws.lookback_days))
        .unwrap_or(NaiveDate::MIN);

    let mut out = Vec::new();
    while day <= last {
        for team_idx in 0..ws.teams().len() {
            if let Some(instance) = materialize(ws, team_idx, day)? {
                if instance.start_time < to && instance.end_time > from {
                    out.push(instance);
                }
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    sort(&mut out);
    Ok(out)
}

pub(super) fn at(ws: &WorkSchedule, at: NaiveDateTime) -> Result<Vec<ShiftInstance>, ScheduleError> {
    let next = at
        .checked_add_signed(Duration::seconds(1))
        .ok_or(ScheduleError::InvalidRange { from: at, to: at })?;
    let mut out = in_range(ws, at, next)?;
    out.retain(|i| {
        Interval::new(i.start_time, i.end_time).is_some_and(|iv| iv.contains(at))
    });
    Ok(out)
}

fn materialize(
    ws: &WorkSchedule,
    team_idx: usize,
    date: NaiveDate,
) -> Result<Option<ShiftInstance>, ScheduleError> {
    let Some(shift_idx) = ws.resolve_team(team_idx, date)? else {
        return Ok(None);
    };
    let shift = &ws.shifts()[shift_idx];
    let team = &ws.teams()[team_idx];
    let start_time = date.and_time(shift.start);
    let end_time = start_time.checked_add_signed(shift.duration).ok_or_else(|| {
        ScheduleError::InvalidRotation(format!(
            "shift {} starting {start_time} ends outside the supported calendar",
            shift.name
        ))
    })?;
    Ok(Some(ShiftInstance {
        team_name: team.name.clone(),
        shift_name: shift.name.clone(),
        start_time,
        end_time,
    }))
}

fn sort(instances: &mut [ShiftInstance]) {
    instances.sort_by(|a, b| {
        a.team_name
            .cmp(&b.team_name)
            .then(a.start_time.cmp(&b.start_time))
    });
}
