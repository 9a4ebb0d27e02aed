use chrono::{NaiveDate, ParseError};

/// Visit dates travel as plain `YYYY-MM-DD` strings. Stored that way too,
/// so lexicographic order in the database matches chronological order.
pub fn parse_visit_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
}
