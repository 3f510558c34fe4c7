use crate::duration::{days_between, start_of_day};
use crate::interval::Interval;
use crate::model::{NonWorkingPeriod, ShiftInstance};
use crate::schedule::{ScheduleError, WorkSchedule};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Permet de customiser le rendu d'une journée du tableau de service.
pub trait RosterRenderer {
    fn render_day(
        &self,
        date: NaiveDate,
        instances: &[ShiftInstance],
        closed: &[&NonWorkingPeriod],
    ) -> String;
}

/// Rendu texte brut, une ligne par poste.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRoster;

impl RosterRenderer for TextRoster {
    fn render_day(
        &self,
        date: NaiveDate,
        instances: &[ShiftInstance],
        closed: &[&NonWorkingPeriod],
    ) -> String {
        let mut out = format!("{}\n", date.format("%Y-%m-%d %a"));
        for period in closed {
            out.push_str(&format!("  closed: {} ({})\n", period.name, period.description));
        }
        if instances.is_empty() {
            out.push_str("  no shift\n");
        }
        for i in instances {
            let spill = days_between(date, i.end_time.date());
            let suffix = if spill > 0 { format!(" (+{spill})") } else { String::new() };
            out.push_str(&format!(
                "  {team}: {shift} {start}-{end}{suffix}\n",
                team = i.team_name,
                shift = i.shift_name,
                start = i.start_time.format("%H:%M"),
                end = i.end_time.format("%H:%M"),
            ));
        }
        out
    }
}

fn day_end(day: NaiveDate) -> Result<NaiveDateTime, ScheduleError> {
    start_of_day(day)
        .checked_add_signed(Duration::days(1))
        .ok_or(ScheduleError::InvalidRange {
            from: start_of_day(day),
            to: start_of_day(day),
        })
}

/// Tableau de service jour par jour, `start` et `end` inclus.
pub fn render_roster(
    schedule: &WorkSchedule,
    start: NaiveDate,
    end: NaiveDate,
    renderer: &dyn RosterRenderer,
) -> Result<String, ScheduleError> {
    if end < start {
        return Err(ScheduleError::InvalidRange {
            from: start_of_day(start),
            to: start_of_day(end),
        });
    }

    let mut out = String::new();
    let mut day = start;
    while day <= end {
        let bounds = Interval {
            start: start_of_day(day),
            end: day_end(day)?,
        };
        let closed: Vec<&NonWorkingPeriod> = schedule
            .non_working_periods()
            .iter()
            .filter(|p| {
                Interval::new(p.start_date_time, p.end_date_time)
                    .is_some_and(|iv| iv.overlaps(&bounds))
            })
            .collect();
        let instances = schedule.instances_on_date(day)?;
        out.push_str(&renderer.render_day(day, &instances, &closed));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::add_holidays;
    use crate::model::{Rotation, RotationSegment, Schedule, Shift, Team};
    use chrono::NaiveTime;

    fn two_team_schedule() -> WorkSchedule {
        let mut def = Schedule::new("Plant", "two teams");
        def.shifts = vec![
            Shift::new("Day", NaiveTime::from_hms_opt(6, 0, 0).unwrap(), Duration::hours(12)),
            Shift::new("Night", NaiveTime::from_hms_opt(18, 0, 0).unwrap(), Duration::hours(12)),
        ];
        def.rotations = vec![
            Rotation::new("DayOn", vec![RotationSegment::new("Day", 2, 2)]),
            Rotation::new("NightOn", vec![RotationSegment::new("Night", 2, 2)]),
        ];
        let anchor = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        def.teams = vec![
            Team::new("Blue", "DayOn", anchor),
            Team::new("Red", "NightOn", anchor + Duration::days(1)),
        ];
        WorkSchedule::new(def).unwrap()
    }

    #[test]
    fn text_roster_marks_holidays_and_overnight_shifts() {
        let mut ws = two_team_schedule();
        add_holidays(&mut ws, 2025).unwrap();
        let out = render_roster(
            &ws,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            &TextRoster,
        )
        .unwrap();

        insta::assert_snapshot!(out, @r"
        2024-12-31 Tue
          Blue: Day 06:00-18:00
          Red: Night 18:00-06:00 (+1)
        2025-01-01 Wed
          closed: Nyårsdagen (New Year's Day)
          Red: Night 18:00-06:00 (+1)
        2025-01-02 Thu
          no shift
        ");
    }

    #[test]
    fn reversed_dates_are_rejected() {
        let ws = two_team_schedule();
        let d = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let err = render_roster(&ws, d, d - Duration::days(1), &TextRoster).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidRange { .. }));
    }
}
