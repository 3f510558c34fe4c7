use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{ScheduleError, WorkSchedule, WorkingTimeOptions};
use crate::duration::{self, SECONDS_PER_DAY};
use crate::interval::{self, Interval};
use crate::model::ShiftInstance;

/// Répartition travaillé / non travaillé d'un intervalle.
/// Invariant : `working_time + non_working_time == to - from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTime {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    #[serde(with = "duration::iso")]
    pub working_time: Duration,
    #[serde(with = "duration::iso")]
    pub non_working_time: Duration,
}

/// Statistiques de rotation d'une équipe, sur un cycle complet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub team: String,
    pub rotation: String,
    pub rotation_days: i64,
    #[serde(with = "duration::iso")]
    pub rotation_working_time: Duration,
    /// en pourcentage du temps calendaire du cycle
    pub percentage_worked: f64,
    #[serde(with = "duration::iso")]
    pub hours_per_week: Duration,
}

pub(super) fn for_schedule(
    ws: &WorkSchedule,
    from: NaiveDateTime,
    to: NaiveDateTime,
    opts: WorkingTimeOptions,
) -> Result<WorkingTime, ScheduleError> {
    let instances = ws.instances_in_range(from, to)?;
    aggregate(ws, &instances, from, to, opts)
}

pub(super) fn for_team(
    ws: &WorkSchedule,
    team_name: &str,
    from: NaiveDateTime,
    to: NaiveDateTime,
    opts: WorkingTimeOptions,
) -> Result<WorkingTime, ScheduleError> {
    ws.team_index(team_name)?;
    let mut instances = ws.instances_in_range(from, to)?;
    instances.retain(|i| i.team_name == team_name);
    aggregate(ws, &instances, from, to, opts)
}

/// Découpe, union, retrait des périodes non travaillées, puis somme.
fn aggregate(
    ws: &WorkSchedule,
    instances: &[ShiftInstance],
    from: NaiveDateTime,
    to: NaiveDateTime,
    opts: WorkingTimeOptions,
) -> Result<WorkingTime, ScheduleError> {
    let bounds = Interval::new(from, to).ok_or(ScheduleError::InvalidRange { from, to })?;

    let mut spans = Vec::with_capacity(instances.len());
    for instance in instances {
        spans.extend(instance_spans(ws, instance, opts));
    }
    let worked = interval::union(interval::clip_all(spans, &bounds));

    let holidays = interval::clip_all(
        ws.non_working_periods()
            .iter()
            .filter_map(|p| Interval::new(p.start_date_time, p.end_date_time)),
        &bounds,
    );
    let remaining = interval::subtract(&worked, &holidays);

    let working_time = remaining
        .iter()
        .fold(Duration::zero(), |acc, iv| acc + (iv.end - iv.start));
    Ok(WorkingTime {
        from,
        to,
        working_time,
        non_working_time: (to - from) - working_time,
    })
}

/// Intervalles travaillés d'une instance : le poste entier, moins ses
/// pauses si `subtract_breaks`.
fn instance_spans(
    ws: &WorkSchedule,
    instance: &ShiftInstance,
    opts: WorkingTimeOptions,
) -> Vec<Interval<NaiveDateTime>> {
    let Some(whole) = Interval::new(instance.start_time, instance.end_time) else {
        return Vec::new();
    };
    if !opts.subtract_breaks {
        return vec![whole];
    }
    let Some(shift) = ws.definition().find_shift(&instance.shift_name) else {
        return vec![whole];
    };
    let breaks: Vec<_> = shift
        .breaks
        .iter()
        .filter_map(|b| {
            let start = instance.start_time + b.offset_from(shift.start);
            Interval::new(start, start + b.duration)
        })
        .collect();
    interval::subtract(&[whole], &breaks)
}

pub(super) fn team_stats(ws: &WorkSchedule, team_name: &str) -> Result<TeamStats, ScheduleError> {
    let idx = ws.team_index(team_name)?;
    let rotation = ws.team_rotation(idx)?;
    let days = rotation.day_count();
    if days <= 0 {
        return Err(ScheduleError::InvalidRotation(format!(
            "rotation {} has a zero-length cycle",
            rotation.name()
        )));
    }
    let worked = rotation.working_time(ws.shifts());
    let worked_secs = worked.num_seconds() as f64;

    Ok(TeamStats {
        team: team_name.to_string(),
        rotation: rotation.name().to_string(),
        rotation_days: days,
        rotation_working_time: worked,
        percentage_worked: 100.0 * worked_secs / (days * SECONDS_PER_DAY) as f64,
        hours_per_week: Duration::seconds(worked.num_seconds() * 7 / days),
    })
}
