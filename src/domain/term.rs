//! Academic term calendar.
//!
//! A calendar year holds three four-month terms: Winter (Jan-Apr), Summer
//! (May-Aug) and Fall (Sep-Dec). Winter and Fall are academic terms; Summer
//! is the break between them.

use chrono::{Datelike, NaiveDate};
use std::fmt;

pub const MONTHS_PER_TERM: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Winter,
    Summer,
    Fall,
}

impl Term {
    /// Term containing a calendar month (1-12).
    pub fn for_month(month: u32) -> Term {
        match month {
            1..=4 => Term::Winter,
            5..=8 => Term::Summer,
            _ => Term::Fall,
        }
    }

    pub fn is_academic(self) -> bool {
        !matches!(self, Term::Summer)
    }

    pub fn name(self) -> &'static str {
        match self {
            Term::Winter => "Winter",
            Term::Summer => "Summer",
            Term::Fall => "Fall",
        }
    }

    pub fn parse(name: &str) -> Option<Term> {
        match name.trim().to_ascii_lowercase().as_str() {
            "winter" => Some(Term::Winter),
            "summer" => Some(Term::Summer),
            "fall" => Some(Term::Fall),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A term in a specific calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermOfYear {
    pub term: Term,
    pub year: i32,
}

impl TermOfYear {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            term: Term::for_month(date.month()),
            year: date.year(),
        }
    }

    pub fn next(self) -> Self {
        match self.term {
            Term::Winter => Self {
                term: Term::Summer,
                year: self.year,
            },
            Term::Summer => Self {
                term: Term::Fall,
                year: self.year,
            },
            Term::Fall => Self {
                term: Term::Winter,
                year: self.year + 1,
            },
        }
    }

    pub fn label(self) -> String {
        format!("{} {}", self.term, self.year)
    }
}

impl fmt::Display for TermOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.term, self.year)
    }
}

/// Endless chronological walk of terms starting at the term containing `start`.
pub fn terms_from(start: NaiveDate) -> impl Iterator<Item = TermOfYear> {
    std::iter::successors(Some(TermOfYear::containing(start)), |t| Some(t.next()))
}
