#![forbid(unsafe_code)]
//! Skiftplan : moteur de planning par rotation d'équipes et de calcul du
//! temps travaillé, avec jours fériés suédois.
//!
//! - Postes, rotations (jours on/off), équipes ancrées sur une date.
//! - Instances de postes par date, par intervalle ou à un instant.
//! - Temps travaillé net des périodes non travaillées.
//! - Heures locales naïves (`NaiveDateTime`), pas de fuseau ni de DST.
//! - Stockage fichiers (JSON/CSV) ou mémoire.

pub mod duration;
pub mod holiday;
pub mod interval;
pub mod io;
pub mod model;
pub mod report;
pub mod schedule;
pub mod service;
pub mod storage;

pub use holiday::{add_holidays, easter_sunday, swedish_holidays};
pub use model::{
    Break, NonWorkingPeriod, Rotation, RotationSegment, Schedule, Shift, ShiftInstance, Team,
    TeamMember,
};
pub use report::{render_roster, RosterRenderer, TextRoster};
pub use schedule::{ScheduleError, TeamStats, WorkSchedule, WorkingTime, WorkingTimeOptions};
pub use service::ScheduleService;
pub use storage::{InMemoryStore, JsonStore, ScheduleStore};
