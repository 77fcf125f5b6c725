//! Gregorian → solar Hijri (Shamsi) conversion.
//!
//! Day-exact arithmetic conversion: days since 1600-03-21 (1 Farvardin 979)
//! are split into 33-year cycles of 12053 days, then 4-year groups of 1461
//! days, then years and months. Months 1–6 have 31 days, 7–11 have 30 and
//! Esfand has 29 (30 in leap years).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const GREGORIAN_MONTH_DAYS: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const SHAMSI_MONTH_DAYS: [i64; 12] = [31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];

/// Days in one 33-year cycle.
const CYCLE_DAYS: i64 = 12053;
/// Days from 1600-01-01 to 1 Farvardin 979.
const EPOCH_OFFSET: i64 = 79;

/// A date in the solar Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShamsiDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ShamsiDate {
    /// Convert a Gregorian calendar date.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let gy = i64::from(date.year()) - 1600;
        let gm = date.month0() as usize;
        let gd = i64::from(date.day0());

        let mut g_day_no =
            365 * gy + (gy + 3).div_euclid(4) - (gy + 99).div_euclid(100) + (gy + 399).div_euclid(400);
        g_day_no += GREGORIAN_MONTH_DAYS[..gm].iter().sum::<i64>();
        if gm > 1 && is_gregorian_leap(date.year()) {
            g_day_no += 1;
        }
        g_day_no += gd;

        let mut j_day_no = g_day_no - EPOCH_OFFSET;
        let cycles = j_day_no.div_euclid(CYCLE_DAYS);
        j_day_no = j_day_no.rem_euclid(CYCLE_DAYS);

        let mut jy = 979 + 33 * cycles + 4 * (j_day_no / 1461);
        j_day_no %= 1461;
        if j_day_no >= 366 {
            jy += (j_day_no - 1) / 365;
            j_day_no = (j_day_no - 1) % 365;
        }

        let mut month = 0;
        while month < 11 && j_day_no >= SHAMSI_MONTH_DAYS[month] {
            j_day_no -= SHAMSI_MONTH_DAYS[month];
            month += 1;
        }

        Self {
            year: jy as i32,
            month: month as u32 + 1,
            day: j_day_no as u32 + 1,
        }
    }
}

impl From<NaiveDate> for ShamsiDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_gregorian(date)
    }
}

impl fmt::Display for ShamsiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// Solar Hijri month number (1 = Farvardin … 12 = Esfand) of a Gregorian date.
pub fn shamsi_month(date: NaiveDate) -> u32 {
    ShamsiDate::from_gregorian(date).month
}

fn is_gregorian_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
