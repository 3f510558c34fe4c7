mod instances;
mod rotation;
mod types;
mod validate;
mod working_time;

pub use rotation::{CycleSegment, RotationCycle};
pub use types::{ScheduleError, WorkingTimeOptions};
pub use working_time::{TeamStats, WorkingTime};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::{NonWorkingPeriod, Schedule, Shift, ShiftInstance, Team};

/// Planning validé. Les noms de postes et de rotations sont résolus une
/// fois pour toutes en index à la construction ; un `WorkSchedule` est
/// immuable pendant un calcul.
///
/// La (dé)sérialisation passe par [`Schedule`] et revalide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Schedule", into = "Schedule")]
pub struct WorkSchedule {
    definition: Schedule,
    rotations: Vec<RotationCycle>,
    team_rotations: Vec<usize>,
    lookback_days: i64,
}

impl WorkSchedule {
    /// Valide une définition. Échoue sur la première erreur rencontrée ;
    /// rien n'est construit partiellement.
    pub fn new(mut definition: Schedule) -> Result<Self, ScheduleError> {
        let compiled = validate::compile(&definition)?;
        definition
            .non_working_periods
            .sort_by_key(|p| p.start_date_time);
        Ok(Self {
            definition,
            rotations: compiled.rotations,
            team_rotations: compiled.team_rotations,
            lookback_days: compiled.lookback_days,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
    pub fn description(&self) -> &str {
        &self.definition.description
    }
    pub fn definition(&self) -> &Schedule {
        &self.definition
    }
    pub fn shifts(&self) -> &[Shift] {
        &self.definition.shifts
    }
    pub fn teams(&self) -> &[Team] {
        &self.definition.teams
    }
    pub fn rotations(&self) -> &[RotationCycle] {
        &self.rotations
    }
    pub fn non_working_periods(&self) -> &[NonWorkingPeriod] {
        &self.definition.non_working_periods
    }

    /// Ajoute des périodes non travaillées (sans dédoublonnage) et renvoie
    /// la liste à jour, triée par début.
    pub fn add_non_working_periods<I>(
        &mut self,
        periods: I,
    ) -> Result<&[NonWorkingPeriod], ScheduleError>
    where
        I: IntoIterator<Item = NonWorkingPeriod>,
    {
        let periods: Vec<NonWorkingPeriod> = periods.into_iter().collect();
        for p in &periods {
            validate::validate_period(p)?;
        }
        let list = &mut self.definition.non_working_periods;
        list.extend(periods);
        list.sort_by_key(|p| p.start_date_time);
        Ok(list)
    }

    /// Poste actif pour l'équipe `team_name` le jour `date`.
    pub fn shift_for(&self, team_name: &str, date: NaiveDate) -> Result<Option<&Shift>, ScheduleError> {
        let idx = self.team_index(team_name)?;
        Ok(self.resolve_team(idx, date)?.map(|s| &self.definition.shifts[s]))
    }

    /// Instances de postes commençant le jour `date`, triées par équipe puis début.
    pub fn instances_on_date(&self, date: NaiveDate) -> Result<Vec<ShiftInstance>, ScheduleError> {
        instances::on_date(self, date)
    }

    /// Instances chevauchant `[from, to)`, y compris les postes de nuit
    /// commencés avant `from`.
    pub fn instances_in_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<ShiftInstance>, ScheduleError> {
        instances::in_range(self, from, to)
    }

    /// Instances en cours à l'instant `at`.
    pub fn instances_at(&self, at: NaiveDateTime) -> Result<Vec<ShiftInstance>, ScheduleError> {
        instances::at(self, at)
    }

    pub fn working_time(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        opts: WorkingTimeOptions,
    ) -> Result<WorkingTime, ScheduleError> {
        working_time::for_schedule(self, from, to, opts)
    }

    pub fn team_working_time(
        &self,
        team_name: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
        opts: WorkingTimeOptions,
    ) -> Result<WorkingTime, ScheduleError> {
        working_time::for_team(self, team_name, from, to, opts)
    }

    pub fn team_stats(&self, team_name: &str) -> Result<TeamStats, ScheduleError> {
        working_time::team_stats(self, team_name)
    }

    fn team_index(&self, team_name: &str) -> Result<usize, ScheduleError> {
        self.definition
            .teams
            .iter()
            .position(|t| t.name == team_name)
            .ok_or_else(|| ScheduleError::NotFound(format!("team {team_name}")))
    }

    fn team_rotation(&self, team_idx: usize) -> Result<&RotationCycle, ScheduleError> {
        self.team_rotations
            .get(team_idx)
            .and_then(|r| self.rotations.get(*r))
            .ok_or_else(|| {
                ScheduleError::InvalidRotation(format!("team #{team_idx} has no resolved rotation"))
            })
    }

    fn resolve_team(&self, team_idx: usize, date: NaiveDate) -> Result<Option<usize>, ScheduleError> {
        let team = &self.definition.teams[team_idx];
        self.team_rotation(team_idx)?.resolve(team.rotation_start, date)
    }
}

impl TryFrom<Schedule> for WorkSchedule {
    type Error = ScheduleError;

    fn try_from(definition: Schedule) -> Result<Self, Self::Error> {
        Self::new(definition)
    }
}

impl From<WorkSchedule> for Schedule {
    fn from(ws: WorkSchedule) -> Self {
        ws.definition
    }
}
