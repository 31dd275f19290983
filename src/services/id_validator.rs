//! National ID validation.
//!
//! Validation never fails: a malformed or fake ID is a normal outcome
//! reported through [`NationalIdRecord::is_valid`] and its reasons.
//!
//! # Checks
//!
//! All checks run, in this order, regardless of earlier failures:
//!
//! 1. Structure: exactly 14 ASCII digits
//! 2. Century: leading digit is 2 or 3
//! 3. Year: resolved four-digit year is not after the current year
//! 4. Month: 1 through 12
//! 5. Day: exists in the proleptic Gregorian calendar for that year and month
//! 6. Governorate: one of the known codes
//!
//! Gender is derived from the sequence number and never affects validity.

use std::ops::Range;

use chrono::{Datelike, Month, NaiveDate, Utc};

use crate::models::national_id::{
    Gender, Governorate, InvalidReason, NationalIdRecord, ValidationChecks,
};

pub const NATIONAL_ID_LENGTH: usize = 14;

const CENTURY: Range<usize> = 0..1;
const YEAR: Range<usize> = 1..3;
const MONTH: Range<usize> = 3..5;
const DAY: Range<usize> = 5..7;
const GOVERNORATE: Range<usize> = 7..9;
const SEQUENCE: Range<usize> = 9..13;
const CHECK_DIGIT: Range<usize> = 13..14;

/// Year used for the day check when the century cannot be resolved.
/// A leap year, so February 29 is not rejected on a guess.
const UNRESOLVED_YEAR: i32 = 2000;

/// Validate `national_id` against the current UTC year.
pub fn validate(national_id: &str) -> NationalIdRecord {
    validate_as_of(national_id, Utc::now().year())
}

/// Validate `national_id`, treating any birth year after `current_year` as fake.
pub fn validate_as_of(national_id: &str, current_year: i32) -> NationalIdRecord {
    let chars: Vec<char> = national_id.chars().collect();
    let mut checks = ValidationChecks::default();
    let mut reasons = Vec::new();

    // 1. Structure
    checks.structure =
        chars.len() == NATIONAL_ID_LENGTH && chars.iter().all(|c| c.is_ascii_digit());
    if !checks.structure {
        reasons.push(InvalidReason::Structure);
    }

    // 2. Century
    let century = digits(&chars, CENTURY)
        .and_then(|c| u8::try_from(c).ok())
        .filter(|c| matches!(c, 2 | 3));
    checks.century = century.is_some();
    if !checks.century {
        reasons.push(InvalidReason::Century);
    }

    // 3. Year
    let year_of_birth = century
        .zip(digits(&chars, YEAR))
        .map(|(century, yy)| century_base(century) + yy as i32);
    checks.year = matches!(year_of_birth, Some(year) if year <= current_year);
    if matches!(year_of_birth, Some(year) if year > current_year) {
        reasons.push(InvalidReason::FutureYear);
    }

    // 4. Month
    let month_of_birth = digits(&chars, MONTH);
    let month = month_of_birth
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok());
    checks.month = month.is_some();
    if !checks.month {
        reasons.push(InvalidReason::Month);
    }

    // 5. Day
    let day_of_birth = digits(&chars, DAY);
    checks.day = match (month_of_birth, day_of_birth) {
        (Some(m), Some(d)) if checks.month => {
            NaiveDate::from_ymd_opt(year_of_birth.unwrap_or(UNRESOLVED_YEAR), m, d).is_some()
        }
        _ => false,
    };
    if !checks.day {
        reasons.push(InvalidReason::Day);
    }

    // 6. Governorate
    let governorate_id = digits(&chars, GOVERNORATE).and_then(|g| u8::try_from(g).ok());
    let governorate = governorate_id.and_then(Governorate::from_code);
    checks.governorate = governorate.is_some();
    if !checks.governorate {
        reasons.push(InvalidReason::Governorate);
    }

    // Gender
    let sequence_number = digits(&chars, SEQUENCE);
    let gender = sequence_number.map(|n| if n % 2 == 1 { Gender::Male } else { Gender::Female });

    let fake_id_reason = reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    NationalIdRecord {
        national_id: national_id.to_owned(),
        is_valid: checks.all_passed(),
        invalid_reasons: reasons,
        fake_id_reason,
        checks,
        century,
        year_of_birth,
        month_of_birth,
        month_of_birth_name: month.map(|m| m.name()),
        day_of_birth,
        governorate_id,
        governorate_name: governorate.map(Governorate::display_name),
        sequence_number,
        gender,
        check_digit: digits(&chars, CHECK_DIGIT).and_then(|d| u8::try_from(d).ok()),
    }
}

fn century_base(century: u8) -> i32 {
    1900 + (i32::from(century) - 2) * 100
}

/// Parse the digits at `range`, truncated to the input length.
///
/// Returns `None` when nothing is left after truncation or when the slice
/// holds anything but ASCII digits.
fn digits(chars: &[char], range: Range<usize>) -> Option<u32> {
    let end = range.end.min(chars.len());
    let slice = chars.get(range.start..end)?;
    if slice.is_empty() || !slice.iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    slice.iter().collect::<String>().parse().ok()
}
