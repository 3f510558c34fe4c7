//! Façade applicative : un `ScheduleStore` injecté, une opération par
//! route de l'API `/api/schedules`.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::holiday::swedish_holidays;
use crate::model::{NonWorkingPeriod, Schedule, ShiftInstance};
use crate::report::{self, RosterRenderer};
use crate::schedule::{ScheduleError, TeamStats, WorkSchedule, WorkingTime, WorkingTimeOptions};
use crate::storage::ScheduleStore;

pub struct ScheduleService<S: ScheduleStore> {
    store: S,
    options: WorkingTimeOptions,
}

/// Remonte une `ScheduleError` levée dans une mutation, sinon erreur de stockage.
fn from_store(err: anyhow::Error) -> ScheduleError {
    match err.downcast::<ScheduleError>() {
        Ok(e) => e,
        Err(other) => ScheduleError::Storage(other),
    }
}

fn not_found(name: &str) -> ScheduleError {
    ScheduleError::NotFound(format!("schedule {name}"))
}

impl<S: ScheduleStore> ScheduleService<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, WorkingTimeOptions::default())
    }

    pub fn with_options(store: S, options: WorkingTimeOptions) -> Self {
        Self { store, options }
    }

    pub fn list_schedules(&self) -> Result<Vec<WorkSchedule>, ScheduleError> {
        Ok(self.store.list()?)
    }

    pub fn get_schedule(&self, name: &str) -> Result<WorkSchedule, ScheduleError> {
        self.store.get(name)?.ok_or_else(|| not_found(name))
    }

    /// Valide puis enregistre. Un nom déjà pris est refusé.
    pub fn create_schedule(&self, definition: Schedule) -> Result<WorkSchedule, ScheduleError> {
        let schedule = WorkSchedule::new(definition).inspect_err(|e| {
            warn!(error = %e, "schedule rejected");
        })?;
        if !self.store.create(schedule.clone())? {
            return Err(ScheduleError::AlreadyExists(schedule.name().to_string()));
        }
        info!(
            schedule = schedule.name(),
            teams = schedule.teams().len(),
            "schedule created"
        );
        Ok(schedule)
    }

    pub fn delete_schedule(&self, name: &str) -> Result<(), ScheduleError> {
        if !self.store.delete(name)? {
            return Err(not_found(name));
        }
        info!(schedule = name, "schedule deleted");
        Ok(())
    }

    pub fn shift_instances(
        &self,
        name: &str,
        date: NaiveDate,
    ) -> Result<Vec<ShiftInstance>, ScheduleError> {
        let instances = self.get_schedule(name)?.instances_on_date(date)?;
        debug!(schedule = name, %date, count = instances.len(), "shift instances");
        Ok(instances)
    }

    pub fn shift_instances_at(
        &self,
        name: &str,
        at: NaiveDateTime,
    ) -> Result<Vec<ShiftInstance>, ScheduleError> {
        self.get_schedule(name)?.instances_at(at)
    }

    pub fn working_time(
        &self,
        name: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<WorkingTime, ScheduleError> {
        let wt = self.get_schedule(name)?.working_time(from, to, self.options)?;
        debug!(schedule = name, %from, %to, worked = %wt.working_time, "working time");
        Ok(wt)
    }

    pub fn team_working_time(
        &self,
        name: &str,
        team: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<WorkingTime, ScheduleError> {
        self.get_schedule(name)?
            .team_working_time(team, from, to, self.options)
    }

    pub fn team_stats(&self, name: &str, team: &str) -> Result<TeamStats, ScheduleError> {
        self.get_schedule(name)?.team_stats(team)
    }

    /// Ajoute les fériés suédois de `year`. Un férié déjà présent (même
    /// nom, même début) n'est pas ajouté deux fois.
    pub fn add_swedish_holidays(&self, name: &str, year: i32) -> Result<WorkSchedule, ScheduleError> {
        let holidays = swedish_holidays(year)?;
        let updated = self.add_non_working_periods(name, holidays)?;
        info!(schedule = name, year, "swedish holidays added");
        Ok(updated)
    }

    /// Ajoute des périodes non travaillées en ignorant les doublons.
    pub fn add_non_working_periods(
        &self,
        name: &str,
        periods: Vec<NonWorkingPeriod>,
    ) -> Result<WorkSchedule, ScheduleError> {
        let mut added = 0usize;
        let updated = self
            .store
            .update(name, &mut |ws: &mut WorkSchedule| {
                let mut fresh: Vec<NonWorkingPeriod> = Vec::with_capacity(periods.len());
                for p in &periods {
                    let known = ws.non_working_periods().iter().any(|q| q.same_key(p))
                        || fresh.iter().any(|q| q.same_key(p));
                    if !known {
                        fresh.push(p.clone());
                    }
                }
                added = fresh.len();
                ws.add_non_working_periods(fresh)?;
                Ok(())
            })
            .map_err(from_store)?
            .ok_or_else(|| not_found(name))?;
        debug!(
            schedule = name,
            added,
            skipped = periods.len() - added,
            "non-working periods merged"
        );
        Ok(updated)
    }

    pub fn render_roster(
        &self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
        renderer: &dyn RosterRenderer,
    ) -> Result<String, ScheduleError> {
        let schedule = self.get_schedule(name)?;
        report::render_roster(&schedule, start, end, renderer)
    }
}
