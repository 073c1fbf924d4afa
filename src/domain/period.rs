//! Fixed report periods: calendar months and calendar quarters.
//!
//! A [`MonthYear`] is written `M/YYYY` (`3/2024`); `MM/YYYY` is accepted on
//! input. A [`QuarterPeriod`] is a [`Quarter`] of a given year and is written
//! `Q1/2024`. Both reject malformed input with
//! [`DomainError::InvalidPeriod`].

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::timestamp::TimeWindow;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9998;

fn invalid(value: &str, reason: impl Into<String>) -> DomainError {
    DomainError::InvalidPeriod {
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn first_of_month(value: &str, year: i32, month: u32) -> Result<NaiveDate, DomainError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(invalid(
            value,
            format!("year must be between {MIN_YEAR} and {MAX_YEAR}"),
        ));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| invalid(value, "month must be between 1 and 12"))
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// A calendar month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthYear {
    first_day: NaiveDate,
}

impl MonthYear {
    /// Build a month period.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPeriod`] for months outside 1–12 or
    /// unsupported years.
    pub fn new(month: u32, year: i32) -> Result<Self, DomainError> {
        let label = format!("{month}/{year}");
        Ok(Self {
            first_day: first_of_month(&label, year, month)?,
        })
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Day 1 of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Every instant of the month.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::days(self.first_day, add_months(self.first_day, 1))
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month(), self.year())
    }
}

impl FromStr for MonthYear {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (month, year) = trimmed
            .split_once('/')
            .ok_or_else(|| invalid(s, "expected M/YYYY"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| invalid(s, "month is not a number"))?;
        if year.len() != 4 {
            return Err(invalid(s, "year must have four digits"));
        }
        let year: i32 = year.parse().map_err(|_| invalid(s, "year is not a number"))?;
        Ok(Self {
            first_day: first_of_month(s, year, month)?,
        })
    }
}

impl TryFrom<String> for MonthYear {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthYear> for String {
    fn from(value: MonthYear) -> Self {
        value.to_string()
    }
}

/// One of the four calendar quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// The three calendar months of the quarter.
    #[must_use]
    pub fn months(self) -> [u32; 3] {
        let first = self.first_month();
        [first, first + 1, first + 2]
    }

    #[must_use]
    pub fn first_month(self) -> u32 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 4,
            Self::Q3 => 7,
            Self::Q4 => 10,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quarter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" => Ok(Self::Q1),
            "Q2" => Ok(Self::Q2),
            "Q3" => Ok(Self::Q3),
            "Q4" => Ok(Self::Q4),
            _ => Err(invalid(s, "quarter must be one of Q1, Q2, Q3, Q4")),
        }
    }
}

/// A quarter of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuarterPeriod {
    quarter: Quarter,
    first_day: NaiveDate,
}

impl QuarterPeriod {
    /// Build a quarter period.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPeriod`] for unsupported years.
    pub fn new(quarter: Quarter, year: i32) -> Result<Self, DomainError> {
        let label = format!("{quarter}/{year}");
        Ok(Self {
            quarter,
            first_day: first_of_month(&label, year, quarter.first_month())?,
        })
    }

    /// Parse a quarter name and a year supplied separately.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPeriod`] when either part is malformed.
    pub fn parse(quarter: &str, year: i32) -> Result<Self, DomainError> {
        Self::new(quarter.parse()?, year)
    }

    #[must_use]
    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Day 1 of the quarter's first month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Every instant of the quarter's three months.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::days(self.first_day, add_months(self.first_day, 3))
    }
}

impl fmt::Display for QuarterPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.quarter, self.year())
    }
}

impl FromStr for QuarterPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (quarter, year) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid(s, "expected Qn/YYYY"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| invalid(s, "year is not a number"))?;
        Self::parse(quarter, year)
    }
}

impl TryFrom<String> for QuarterPeriod {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuarterPeriod> for String {
    fn from(value: QuarterPeriod) -> Self {
        value.to_string()
    }
}
