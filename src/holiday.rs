//! Jours fériés suédois, fixes et mobiles, en périodes non travaillées
//! d'une journée pleine.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::duration::start_of_day;
use crate::model::NonWorkingPeriod;
use crate::schedule::{ScheduleError, WorkSchedule};

/// Dimanche de Pâques grégorien (algorithme anonyme / Meeus), en
/// arithmétique euclidienne pour rester exact sur les années négatives.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let y = i64::from(year);
    let a = y.rem_euclid(19);
    let b = y.div_euclid(100);
    let c = y.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Premier `weekday` à partir de `date` incluse.
fn next_or_same(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(i64::from(ahead))
}

/// Fériés suédois de `year`, triés par date. Nom suédois, description
/// anglaise. Pure : deux appels donnent le même résultat.
pub fn swedish_holidays(year: i32) -> Result<Vec<NonWorkingPeriod>, ScheduleError> {
    let out_of_range = || ScheduleError::Validation(format!("year {year} is out of range"));
    let ymd = |m: u32, d: u32| NaiveDate::from_ymd_opt(year, m, d).ok_or_else(out_of_range);

    let easter = easter_sunday(year).ok_or_else(out_of_range)?;
    let midsummer_eve = next_or_same(ymd(6, 19)?, Weekday::Fri);
    let all_saints = next_or_same(ymd(10, 31)?, Weekday::Sat);

    let days = [
        ("Nyårsdagen", "New Year's Day", ymd(1, 1)?),
        ("Trettondedag jul", "Epiphany", ymd(1, 6)?),
        ("Långfredagen", "Good Friday", easter - Duration::days(2)),
        ("Påskafton", "Easter Saturday", easter - Duration::days(1)),
        ("Påskdagen", "Easter Sunday", easter),
        ("Annandag påsk", "Easter Monday", easter + Duration::days(1)),
        ("Första maj", "May Day", ymd(5, 1)?),
        ("Kristi himmelsfärdsdag", "Ascension Day", easter + Duration::days(39)),
        ("Pingstdagen", "Whit Sunday", easter + Duration::days(49)),
        ("Sveriges nationaldag", "National Day of Sweden", ymd(6, 6)?),
        ("Midsommarafton", "Midsummer Eve", midsummer_eve),
        ("Midsommardagen", "Midsummer Day", midsummer_eve + Duration::days(1)),
        ("Alla helgons dag", "All Saints' Day", all_saints),
        ("Julafton", "Christmas Eve", ymd(12, 24)?),
        ("Juldagen", "Christmas Day", ymd(12, 25)?),
        ("Annandag jul", "Boxing Day", ymd(12, 26)?),
        ("Nyårsafton", "New Year's Eve", ymd(12, 31)?),
    ];

    let mut out = Vec::with_capacity(days.len());
    for (name, description, date) in days {
        let start = start_of_day(date);
        let end = start
            .checked_add_signed(Duration::days(1))
            .ok_or_else(out_of_range)?;
        out.push(NonWorkingPeriod {
            name: name.to_string(),
            description: description.to_string(),
            start_date_time: start,
            end_date_time: end,
        });
    }
    out.sort_by_key(|p| p.start_date_time);
    Ok(out)
}

/// Ajoute les fériés de `year` au planning, sans dédoublonnage.
pub fn add_holidays(
    schedule: &mut WorkSchedule,
    year: i32,
) -> Result<&[NonWorkingPeriod], ScheduleError> {
    let holidays = swedish_holidays(year)?;
    schedule.add_non_working_periods(holidays)
}
