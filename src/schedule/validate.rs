use std::collections::{HashMap, HashSet};

use chrono::Duration;

use super::rotation::{CycleSegment, RotationCycle};
use super::ScheduleError;
use crate::duration::SECONDS_PER_DAY;
use crate::model::{NonWorkingPeriod, Schedule, Shift};

/// Résultat de la validation : références par nom résolues en index.
#[derive(Debug, Clone)]
pub(super) struct Compiled {
    pub rotations: Vec<RotationCycle>,
    /// index de rotation, dans l'ordre de `Schedule::teams`
    pub team_rotations: Vec<usize>,
    /// jours à remonter pour trouver un poste commencé la veille (ou avant)
    pub lookback_days: i64,
}

pub(super) fn compile(def: &Schedule) -> Result<Compiled, ScheduleError> {
    if def.name.trim().is_empty() {
        return Err(ScheduleError::Validation("schedule name cannot be empty".into()));
    }

    ensure_unique("shift", def.shifts.iter().map(|s| s.name.as_str()))?;
    ensure_unique("rotation", def.rotations.iter().map(|r| r.name.as_str()))?;
    ensure_unique("team", def.teams.iter().map(|t| t.name.as_str()))?;

    for shift in &def.shifts {
        validate_shift(shift)?;
    }
    for period in &def.non_working_periods {
        validate_period(period)?;
    }

    let shift_index: HashMap<&str, usize> = def
        .shifts
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.as_str(), i))
        .collect();

    let mut rotations = Vec::with_capacity(def.rotations.len());
    for rot in &def.rotations {
        let mut segments = Vec::with_capacity(rot.segments.len());
        for seg in &rot.segments {
            if seg.days_on < 1 {
                return Err(ScheduleError::Validation(format!(
                    "rotation {}: daysOn must be at least 1 (got {})",
                    rot.name, seg.days_on
                )));
            }
            if seg.days_off < 0 {
                return Err(ScheduleError::Validation(format!(
                    "rotation {}: daysOff cannot be negative (got {})",
                    rot.name, seg.days_off
                )));
            }
            let shift = *shift_index.get(seg.shift_name.as_str()).ok_or_else(|| {
                ScheduleError::InvalidRotation(format!(
                    "rotation {} references unknown shift {}",
                    rot.name, seg.shift_name
                ))
            })?;
            segments.push(CycleSegment {
                shift,
                days_on: seg.days_on.unsigned_abs(),
                days_off: seg.days_off.unsigned_abs(),
            });
        }
        let cycle = RotationCycle::new(rot.name.clone(), segments);
        if cycle.day_count() == 0 {
            return Err(ScheduleError::InvalidRotation(format!(
                "rotation {} has no segments",
                rot.name
            )));
        }
        rotations.push(cycle);
    }

    let mut team_rotations = Vec::with_capacity(def.teams.len());
    for team in &def.teams {
        let idx = def
            .rotations
            .iter()
            .position(|r| r.name == team.rotation_name)
            .ok_or_else(|| {
                ScheduleError::NotFound(format!(
                    "rotation {} (team {})",
                    team.rotation_name, team.name
                ))
            })?;
        team_rotations.push(idx);
    }

    let lookback_days = def
        .shifts
        .iter()
        .map(|s| (s.end_offset_seconds() + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY - 1)
        .max()
        .unwrap_or(0)
        .max(0);

    Ok(Compiled {
        rotations,
        team_rotations,
        lookback_days,
    })
}

fn ensure_unique<'a, I>(kind: &str, names: I) -> Result<(), ScheduleError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ScheduleError::Validation(format!("{kind} name cannot be empty")));
        }
        if !seen.insert(name) {
            return Err(ScheduleError::Validation(format!("duplicate {kind} name: {name}")));
        }
    }
    Ok(())
}

fn validate_shift(shift: &Shift) -> Result<(), ScheduleError> {
    if shift.duration <= Duration::zero() {
        return Err(ScheduleError::Validation(format!(
            "shift {}: duration must be positive",
            shift.name
        )));
    }
    if shift.duration > Duration::days(1) {
        return Err(ScheduleError::Validation(format!(
            "shift {}: duration cannot exceed 24 hours",
            shift.name
        )));
    }
    for brk in &shift.breaks {
        if brk.duration <= Duration::zero() {
            return Err(ScheduleError::Validation(format!(
                "shift {}: break {} duration must be positive",
                shift.name, brk.name
            )));
        }
        // durée déjà bornée avant l'addition
        if brk.duration > shift.duration
            || brk.offset_from(shift.start) + brk.duration > shift.duration
        {
            return Err(ScheduleError::Validation(format!(
                "shift {}: break {} lies outside the shift",
                shift.name, brk.name
            )));
        }
    }
    Ok(())
}

pub(super) fn validate_period(period: &NonWorkingPeriod) -> Result<(), ScheduleError> {
    if period.name.trim().is_empty() {
        return Err(ScheduleError::Validation(
            "non-working period name cannot be empty".into(),
        ));
    }
    if period.end_date_time <= period.start_date_time {
        return Err(ScheduleError::Validation(format!(
            "non-working period {}: end must be after start",
            period.name
        )));
    }
    Ok(())
}
