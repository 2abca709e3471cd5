//! Simulation clock — owns the calendar position of a run.

use crate::types::Year;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub first_year:   Year,
    pub years:        u32,
    /// Next year to simulate; `None` once the run is exhausted.
    pub current_year: Option<Year>,
}

impl SimClock {
    pub fn new(first_year: Year, years: u32) -> Self {
        Self {
            first_year,
            years,
            current_year: (years > 0).then_some(first_year),
        }
    }

    /// Last simulated year, if any.
    pub fn last_year(&self) -> Option<Year> {
        (self.years > 0).then(|| self.first_year + self.years as Year - 1)
    }

    /// Return the current year and step to the next one.
    pub fn advance(&mut self) -> Option<Year> {
        let year = self.current_year?;
        self.current_year = match self.last_year() {
            Some(last) if year < last => Some(year + 1),
            _ => None,
        };
        Some(year)
    }

    pub fn is_finished(&self) -> bool {
        self.current_year.is_none()
    }
}

impl Iterator for SimClock {
    type Item = Year;

    fn next(&mut self) -> Option<Year> {
        self.advance()
    }
}
