use chrono::{Duration, NaiveDate};

use super::ScheduleError;
use crate::duration::days_between;
use crate::model::Shift;

/// Segment résolu : l'index du poste remplace son nom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSegment {
    pub shift: usize,
    pub days_on: u32,
    pub days_off: u32,
}

impl CycleSegment {
    pub fn days(&self) -> i64 {
        i64::from(self.days_on) + i64::from(self.days_off)
    }
}

/// Cycle de rotation prêt à être interrogé jour par jour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationCycle {
    name: String,
    segments: Vec<CycleSegment>,
}

impl RotationCycle {
    pub fn new<N: Into<String>>(name: N, segments: Vec<CycleSegment>) -> Self {
        Self {
            name: name.into(),
            segments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[CycleSegment] {
        &self.segments
    }

    /// Longueur du cycle en jours.
    pub fn day_count(&self) -> i64 {
        self.segments.iter().map(CycleSegment::days).sum()
    }

    /// Poste actif le jour `date` pour une équipe ancrée sur `anchor`.
    ///
    /// Les dates antérieures à l'ancrage sont valides : la position dans le
    /// cycle utilise un modulo euclidien.
    pub fn resolve(&self, anchor: NaiveDate, date: NaiveDate) -> Result<Option<usize>, ScheduleError> {
        let cycle = self.day_count();
        if cycle <= 0 {
            return Err(ScheduleError::InvalidRotation(format!(
                "rotation {} has a zero-length cycle",
                self.name
            )));
        }
        let position = days_between(anchor, date).rem_euclid(cycle);

        let mut acc = 0i64;
        for seg in &self.segments {
            if position < acc + seg.days() {
                let on = position - acc < i64::from(seg.days_on);
                return Ok(on.then_some(seg.shift));
            }
            acc += seg.days();
        }
        // position < cycle garantit qu'un segment contient la position
        Err(ScheduleError::InvalidRotation(format!(
            "rotation {}: day {position} outside cycle",
            self.name
        )))
    }

    /// Temps posté sur un cycle complet.
    pub fn working_time(&self, shifts: &[Shift]) -> Duration {
        self.segments
            .iter()
            .filter_map(|seg| {
                shifts
                    .get(seg.shift)
                    .map(|s| s.duration * i32::try_from(seg.days_on).unwrap_or(i32::MAX))
            })
            .fold(Duration::zero(), |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seg(shift: usize, days_on: u32, days_off: u32) -> CycleSegment {
        CycleSegment {
            shift,
            days_on,
            days_off,
        }
    }

    #[test]
    fn five_on_two_off() {
        let rot = RotationCycle::new("5-2", vec![seg(0, 5, 2)]);
        let monday = date(2024, 1, 1);
        for i in 0..5 {
            assert_eq!(rot.resolve(monday, monday + Duration::days(i)).unwrap(), Some(0));
        }
        assert_eq!(rot.resolve(monday, date(2024, 1, 6)).unwrap(), None);
        assert_eq!(rot.resolve(monday, date(2024, 1, 7)).unwrap(), None);
        assert_eq!(rot.resolve(monday, date(2024, 1, 8)).unwrap(), Some(0));
    }

    #[test]
    fn dates_before_anchor_use_floored_modulo() {
        let rot = RotationCycle::new("5-2", vec![seg(0, 5, 2)]);
        let monday = date(2024, 1, 8);
        // la veille (dimanche) est le dernier jour de repos du cycle précédent
        assert_eq!(rot.resolve(monday, date(2024, 1, 7)).unwrap(), None);
        assert_eq!(rot.resolve(monday, date(2024, 1, 5)).unwrap(), Some(0));
        assert_eq!(rot.resolve(monday, date(2024, 1, 1)).unwrap(), Some(0));
        assert_eq!(rot.resolve(monday, date(2023, 12, 31)).unwrap(), None);
    }

    #[test]
    fn continuous_rotation_is_always_on() {
        let rot = RotationCycle::new("24/7", vec![seg(3, 1, 0)]);
        let anchor = date(2024, 3, 15);
        for i in -40..40 {
            assert_eq!(
                rot.resolve(anchor, anchor + Duration::days(i)).unwrap(),
                Some(3)
            );
        }
    }

    #[test]
    fn sequential_segments_switch_shifts() {
        // 5 jours Day, 2 repos, 5 jours Evening, 2 repos
        let rot = RotationCycle::new("day-evening", vec![seg(0, 5, 2), seg(1, 5, 2)]);
        let anchor = date(2024, 1, 1);
        assert_eq!(rot.day_count(), 14);
        assert_eq!(rot.resolve(anchor, date(2024, 1, 3)).unwrap(), Some(0));
        assert_eq!(rot.resolve(anchor, date(2024, 1, 7)).unwrap(), None);
        assert_eq!(rot.resolve(anchor, date(2024, 1, 8)).unwrap(), Some(1));
        assert_eq!(rot.resolve(anchor, date(2024, 1, 13)).unwrap(), None);
        assert_eq!(rot.resolve(anchor, date(2024, 1, 15)).unwrap(), Some(0));
    }

    #[test]
    fn resolve_is_periodic() {
        let rot = RotationCycle::new("mixed", vec![seg(0, 2, 1), seg(1, 3, 0), seg(2, 1, 4)]);
        let cycle = Duration::days(rot.day_count());
        let anchor = date(2024, 2, 27);
        for i in -30..30 {
            let d = anchor + Duration::days(i);
            assert_eq!(
                rot.resolve(anchor, d).unwrap(),
                rot.resolve(anchor, d + cycle).unwrap()
            );
        }
    }

    #[test]
    fn zero_length_cycle_is_invalid() {
        let rot = RotationCycle::new("empty", vec![]);
        let d = date(2024, 1, 1);
        assert!(matches!(
            rot.resolve(d, d),
            Err(ScheduleError::InvalidRotation(_))
        ));
    }
}
