//! Financial input set as entered, and its coerced numeric form.

use super::coerce::{parse_amount, parse_flag, parse_whole};

/// Raw calculator inputs, kept as text exactly as the user entered them.
///
/// Field units: tuition is per academic year; books and supplies are charged
/// as entered on every academic term; living costs are monthly; hours are per
/// week; aid is per academic term.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Deserialize))]
#[cfg_attr(feature = "web", serde(default))]
pub struct FinancialInputs {
    pub remaining_semesters: String,
    pub tuition: String,
    pub books: String,
    pub supplies: String,
    pub rent: String,
    pub utilities: String,
    pub groceries: String,
    pub cell_phone: String,
    pub transportation: String,
    pub memberships: String,
    pub has_job: String,
    pub hours_per_week_school: String,
    pub hours_per_week_summer: String,
    pub hourly_rate: String,
    pub scholarship: String,
    pub bursary: String,
    pub grant: String,
    pub savings: String,
}

/// Names of every input field, in form order. Used by the config loader,
/// the store schema and validation messages.
pub const INPUT_FIELDS: [&str; 18] = [
    "remaining_semesters",
    "tuition",
    "books",
    "supplies",
    "rent",
    "utilities",
    "groceries",
    "cell_phone",
    "transportation",
    "memberships",
    "has_job",
    "hours_per_week_school",
    "hours_per_week_summer",
    "hourly_rate",
    "scholarship",
    "bursary",
    "grant",
    "savings",
];

impl FinancialInputs {
    /// Look up a field's raw text by its snake_case name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "remaining_semesters" => &self.remaining_semesters,
            "tuition" => &self.tuition,
            "books" => &self.books,
            "supplies" => &self.supplies,
            "rent" => &self.rent,
            "utilities" => &self.utilities,
            "groceries" => &self.groceries,
            "cell_phone" => &self.cell_phone,
            "transportation" => &self.transportation,
            "memberships" => &self.memberships,
            "has_job" => &self.has_job,
            "hours_per_week_school" => &self.hours_per_week_school,
            "hours_per_week_summer" => &self.hours_per_week_summer,
            "hourly_rate" => &self.hourly_rate,
            "scholarship" => &self.scholarship,
            "bursary" => &self.bursary,
            "grant" => &self.grant,
            "savings" => &self.savings,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Mutable access to a field by name; `None` for unknown names.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match name {
            "remaining_semesters" => &mut self.remaining_semesters,
            "tuition" => &mut self.tuition,
            "books" => &mut self.books,
            "supplies" => &mut self.supplies,
            "rent" => &mut self.rent,
            "utilities" => &mut self.utilities,
            "groceries" => &mut self.groceries,
            "cell_phone" => &mut self.cell_phone,
            "transportation" => &mut self.transportation,
            "memberships" => &mut self.memberships,
            "has_job" => &mut self.has_job,
            "hours_per_week_school" => &mut self.hours_per_week_school,
            "hours_per_week_summer" => &mut self.hours_per_week_summer,
            "hourly_rate" => &mut self.hourly_rate,
            "scholarship" => &mut self.scholarship,
            "bursary" => &mut self.bursary,
            "grant" => &mut self.grant,
            "savings" => &mut self.savings,
            _ => return None,
        };
        Some(value)
    }

    pub fn parse(&self) -> ParsedInputs {
        ParsedInputs {
            remaining_semesters: parse_whole(&self.remaining_semesters),
            tuition_per_year: parse_amount(&self.tuition),
            books_per_term: parse_amount(&self.books),
            supplies_per_term: parse_amount(&self.supplies),
            rent: parse_amount(&self.rent),
            utilities: parse_amount(&self.utilities),
            groceries: parse_amount(&self.groceries),
            cell_phone: parse_amount(&self.cell_phone),
            transportation: parse_amount(&self.transportation),
            memberships: parse_amount(&self.memberships),
            has_job: parse_flag(&self.has_job),
            hours_school: parse_whole(&self.hours_per_week_school),
            hours_summer: parse_whole(&self.hours_per_week_summer),
            hourly_rate: parse_amount(&self.hourly_rate),
            scholarship: parse_amount(&self.scholarship),
            bursary: parse_amount(&self.bursary),
            grant: parse_amount(&self.grant),
            savings: parse_amount(&self.savings),
        }
    }
}

/// Coerced inputs. Every amount is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedInputs {
    pub remaining_semesters: u32,
    pub tuition_per_year: f64,
    pub books_per_term: f64,
    pub supplies_per_term: f64,
    pub rent: f64,
    pub utilities: f64,
    pub groceries: f64,
    pub cell_phone: f64,
    pub transportation: f64,
    pub memberships: f64,
    pub has_job: bool,
    pub hours_school: u32,
    pub hours_summer: u32,
    pub hourly_rate: f64,
    pub scholarship: f64,
    pub bursary: f64,
    pub grant: f64,
    pub savings: f64,
}

impl ParsedInputs {
    pub fn monthly_living_costs(&self) -> f64 {
        self.rent
            + self.utilities
            + self.groceries
            + self.cell_phone
            + self.transportation
            + self.memberships
    }

    pub fn aid_per_term(&self) -> f64 {
        self.scholarship + self.bursary + self.grant
    }

    /// Whether work hours translate into pay at all.
    pub fn earns_wages(&self) -> bool {
        self.has_job && self.hourly_rate > 0.0
    }
}
