//! CSV line splitting and header resolution.
//!
//! The source dataset is a comma-delimited file where individual fields may
//! be wrapped in double quotes to protect embedded commas. There is no
//! escaped-quote convention and quoted fields never span lines, so a simple
//! quote-toggle state machine is sufficient.

use crate::import::error::ImportError;

pub const COL_MAKE: &str = "Make";
pub const COL_MODEL: &str = "Model";
pub const COL_YEAR: &str = "Year";
pub const COL_COMBINED_MPG: &str = "Combined Mpg For Fuel Type1";
pub const COL_ANNUAL_FUEL_COST: &str = "Annual Fuel Cost For Fuel Type1";
pub const COL_MFR_CODE: &str = "MFR Code";

/// Split one CSV line into fields, honoring double-quoted regions.
///
/// Quote characters toggle the in-quotes state and are consumed; commas
/// inside a quoted region are literal content. The field after the last
/// delimiter is always emitted, even when empty. An unbalanced quote leaves
/// the rest of the line inside quotes, so trailing commas become literal.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }

    fields.push(field);
    fields
}

/// Positions of the columns the import pipeline reads, resolved once from
/// the header row by case-insensitive name match.
///
/// `make` and `model` are mandatory; the remaining columns are optional and
/// simply disable their output field for every row when absent.
#[derive(Debug, Clone)]
pub struct HeaderIndexes {
    pub make: usize,
    pub model: usize,
    pub year: Option<usize>,
    pub combined_mpg: Option<usize>,
    pub annual_fuel_cost: Option<usize>,
    pub mfr_code: Option<usize>,
}

impl HeaderIndexes {
    pub fn resolve(headers: &[String]) -> Result<Self, ImportError> {
        let make = find_column(headers, COL_MAKE);
        let model = find_column(headers, COL_MODEL);

        let missing: Vec<String> = [(COL_MAKE, make), (COL_MODEL, model)]
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        Ok(Self {
            make: make.unwrap(),
            model: model.unwrap(),
            year: find_column(headers, COL_YEAR),
            combined_mpg: find_column(headers, COL_COMBINED_MPG),
            annual_fuel_cost: find_column(headers, COL_ANNUAL_FUEL_COST),
            mfr_code: find_column(headers, COL_MFR_CODE),
        })
    }
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}
