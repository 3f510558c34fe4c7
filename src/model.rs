//! Définitions sérialisables d'un planning, telles qu'échangées avec
//! l'extérieur (JSON camelCase). Non validées : voir
//! [`WorkSchedule`](crate::schedule::WorkSchedule) pour la forme validée.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::duration::{self, SECONDS_PER_DAY};

/// Planning nommé : postes, rotations, équipes et périodes non travaillées.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub rotations: Vec<Rotation>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub non_working_periods: Vec<NonWorkingPeriod>,
}

impl Schedule {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, description: D) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            shifts: Vec::new(),
            rotations: Vec::new(),
            teams: Vec::new(),
            non_working_periods: Vec::new(),
        }
    }

    pub fn find_shift(&self, name: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.name == name)
    }
}

/// Poste répétable : heure de début et durée, pouvant dépasser minuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start: NaiveTime,
    #[serde(with = "duration::iso")]
    pub duration: Duration,
    #[serde(default)]
    pub breaks: Vec<Break>,
}

impl Shift {
    pub fn new<N: Into<String>>(name: N, start: NaiveTime, duration: Duration) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            start,
            duration,
            breaks: Vec::new(),
        }
    }

    pub fn with_break(mut self, brk: Break) -> Self {
        self.breaks.push(brk);
        self
    }

    /// Début + durée, en secondes depuis minuit du jour de début.
    pub(crate) fn end_offset_seconds(&self) -> i64 {
        i64::from(self.start.num_seconds_from_midnight()) + self.duration.num_seconds()
    }
}

/// Pause non payée à l'intérieur d'un poste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Break {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start: NaiveTime,
    #[serde(with = "duration::iso")]
    pub duration: Duration,
}

impl Break {
    pub fn new<N: Into<String>>(name: N, start: NaiveTime, duration: Duration) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            start,
            duration,
        }
    }

    /// Décalage depuis le début du poste, mesuré cycliquement sur 24h.
    pub fn offset_from(&self, shift_start: NaiveTime) -> Duration {
        let delta = i64::from(self.start.num_seconds_from_midnight())
            - i64::from(shift_start.num_seconds_from_midnight());
        Duration::seconds(delta.rem_euclid(SECONDS_PER_DAY))
    }
}

/// Rotation : suite ordonnée de segments jours travaillés / jours de repos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rotation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub segments: Vec<RotationSegment>,
}

impl Rotation {
    pub fn new<N: Into<String>>(name: N, segments: Vec<RotationSegment>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            segments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationSegment {
    pub shift_name: String,
    pub days_on: i32,
    #[serde(default)]
    pub days_off: i32,
}

impl RotationSegment {
    pub fn new<S: Into<String>>(shift_name: S, days_on: i32, days_off: i32) -> Self {
        Self {
            shift_name: shift_name.into(),
            days_on,
            days_off,
        }
    }
}

/// Équipe suivant une rotation à partir de sa date d'ancrage (jour zéro).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rotation_name: String,
    pub rotation_start: NaiveDate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn new<N: Into<String>, R: Into<String>>(
        name: N,
        rotation_name: R,
        rotation_start: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            rotation_name: rotation_name.into(),
            rotation_start,
            members: Vec::new(),
        }
    }
}

/// Membre d'équipe ; opaque pour le moteur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub member_id: String,
}

/// Période non travaillée (jour férié, arrêt planifié) `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonWorkingPeriod {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
}

impl NonWorkingPeriod {
    pub fn new<N: Into<String>>(name: N, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            start_date_time: start,
            end_date_time: end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_date_time - self.start_date_time
    }

    /// Même nom et même début : sert au dédoublonnage des jours fériés.
    pub fn same_key(&self, other: &Self) -> bool {
        self.name == other.name && self.start_date_time == other.start_date_time
    }
}

/// Occurrence datée d'un poste pour une équipe. Calculée, jamais stockée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftInstance {
    pub team_name: String,
    pub shift_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl ShiftInstance {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}
