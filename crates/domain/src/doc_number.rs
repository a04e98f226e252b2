// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable request identifiers.
//!
//! Document numbers follow the printed-form convention
//! `REQ/{SEQ4}/{DEPT}/{MONTH_ROMAN}/{YEAR}`, e.g. `REQ/0007/MLD/III/2026`.
//! The sequence is scoped per department and per year, so numbering
//! restarts every January and departments never collide.

use crate::error::DomainError;
use crate::types::DeptCode;
use serde::{Deserialize, Serialize};
use time::Month;

const PREFIX: &str = "REQ";

const ROMAN_MONTHS: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// Smallest and largest year that prints as exactly four digits.
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

/// A structured document number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocNumber {
    sequence: u32,
    dept_code: DeptCode,
    month: Month,
    year: u16,
}

impl DocNumber {
    /// Creates a document number from validated parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is zero or the year does not
    /// have four digits.
    pub fn new(
        sequence: u32,
        dept_code: DeptCode,
        month: Month,
        year: i32,
    ) -> Result<Self, DomainError> {
        if sequence == 0 {
            return Err(DomainError::InvalidSequence { sequence });
        }
        let year: u16 = validate_year(year)?;
        Ok(Self {
            sequence,
            dept_code,
            month,
            year,
        })
    }

    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    #[must_use]
    pub const fn dept_code(&self) -> &DeptCode {
        &self.dept_code
    }

    #[must_use]
    pub const fn month(&self) -> Month {
        self.month
    }

    /// The calendar month as a number in `1..=12`.
    #[must_use]
    pub const fn month_number(&self) -> u8 {
        self.month as u8
    }

    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }
}

impl std::fmt::Display for DocNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{PREFIX}/{:04}/{}/{}/{}",
            self.sequence,
            self.dept_code,
            roman_month(self.month),
            self.year
        )
    }
}

impl std::str::FromStr for DocNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_doc_number(s).ok_or_else(|| DomainError::InvalidDocNumber(s.to_string()))
    }
}

impl TryFrom<String> for DocNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocNumber> for String {
    fn from(doc: DocNumber) -> Self {
        doc.to_string()
    }
}

/// Formats a document number.
///
/// `month` is the calendar month of the request creation date (1-12) and
/// `year` its Gregorian year.
///
/// # Errors
///
/// Returns `DomainError::InvalidMonth` if `month` is outside `1..=12`,
/// `DomainError::InvalidSequence` for a zero sequence, and
/// `DomainError::InvalidYear` for a year without four digits.
pub fn format_doc_number(
    sequence: u32,
    dept_code: &DeptCode,
    month: u8,
    year: i32,
) -> Result<String, DomainError> {
    let month: Month = Month::try_from(month).map_err(|_| DomainError::InvalidMonth { month })?;
    Ok(DocNumber::new(sequence, dept_code.clone(), month, year)?.to_string())
}

/// Parses a document number.
///
/// Only canonical text (exactly what [`format_doc_number`] produces) is
/// accepted. Malformed input yields `None`; this is display tooling, not an
/// authorization boundary.
#[must_use]
pub fn parse_doc_number(input: &str) -> Option<DocNumber> {
    let mut parts = input.split('/');
    let prefix: &str = parts.next()?;
    let sequence: &str = parts.next()?;
    let dept: &str = parts.next()?;
    let month: &str = parts.next()?;
    let year: &str = parts.next()?;
    if parts.next().is_some() || prefix != PREFIX {
        return None;
    }

    let sequence: u32 = parse_sequence(sequence)?;
    let dept_code: DeptCode = DeptCode::new(dept).ok()?;
    let month: Month = month_from_roman(month)?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;

    DocNumber::new(sequence, dept_code, month, year).ok()
}

/// Returns the Roman numeral for a month.
#[must_use]
pub const fn roman_month(month: Month) -> &'static str {
    ROMAN_MONTHS[month as usize - 1]
}

fn month_from_roman(roman: &str) -> Option<Month> {
    let index: usize = ROMAN_MONTHS.iter().position(|m| *m == roman)?;
    let number: u8 = u8::try_from(index + 1).ok()?;
    Month::try_from(number).ok()
}

fn parse_sequence(text: &str) -> Option<u32> {
    if text.len() < 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = text.parse().ok()?;
    // Reject non-canonical padding such as `00012`.
    (value > 0 && format!("{value:04}") == text).then_some(value)
}

fn validate_year(year: i32) -> Result<u16, DomainError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DomainError::InvalidYear { year });
    }
    u16::try_from(year).map_err(|_| DomainError::InvalidYear { year })
}
