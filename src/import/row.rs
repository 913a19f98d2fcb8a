//! Conversion of raw CSV fields into a typed vehicle row.

use rust_decimal::Decimal;

use crate::import::csv::HeaderIndexes;

/// Year used when the source column is missing, out of range, or unparsable.
pub const FALLBACK_YEAR: i32 = 2023;

/// One normalized data row, ready for manufacturer resolution and insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRow {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub combined_mpg: Option<Decimal>,
    pub annual_fuel_cost: Option<Decimal>,
    pub mfr_code: Option<String>,
}

/// Normalize one split data line, or return `None` when the row must be
/// skipped: too few fields to reach the required columns, or an empty
/// make/model after trimming. Skipped rows contribute to no counters.
pub fn normalize_row(fields: &[String], indexes: &HeaderIndexes) -> Option<VehicleRow> {
    if fields.len() <= indexes.make.max(indexes.model) {
        return None;
    }

    let make = fields[indexes.make].trim();
    let model = fields[indexes.model].trim();
    if make.is_empty() || model.is_empty() {
        return None;
    }

    let year = indexes
        .year
        .and_then(|i| fields.get(i))
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(FALLBACK_YEAR);

    let combined_mpg = indexes
        .combined_mpg
        .and_then(|i| fields.get(i))
        .and_then(|v| v.trim().parse::<Decimal>().ok());

    let annual_fuel_cost = indexes
        .annual_fuel_cost
        .and_then(|i| fields.get(i))
        .and_then(|v| v.trim().parse::<Decimal>().ok());

    let mfr_code = indexes
        .mfr_code
        .and_then(|i| fields.get(i))
        .map(|v| v.trim().to_string());

    Some(VehicleRow {
        make: make.to_string(),
        model: model.to_string(),
        year,
        combined_mpg,
        annual_fuel_cost,
        mfr_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::csv::{HeaderIndexes, split_csv_line};

    fn full_indexes() -> HeaderIndexes {
        let headers = split_csv_line(
            "Make,Model,Year,Combined Mpg For Fuel Type1,Annual Fuel Cost For Fuel Type1,MFR Code",
        );
        HeaderIndexes::resolve(&headers).expect("headers resolve")
    }

    fn normalize(line: &str) -> Option<VehicleRow> {
        normalize_row(&split_csv_line(line), &full_indexes())
    }

    #[test]
    fn normalizes_a_complete_row() {
        let row = normalize("Toyota,Corolla,2021,33.5,1650,TYT").expect("row accepted");
        assert_eq!(row.make, "Toyota");
        assert_eq!(row.model, "Corolla");
        assert_eq!(row.year, 2021);
        assert_eq!(row.combined_mpg, Some("33.5".parse().unwrap()));
        assert_eq!(row.annual_fuel_cost, Some("1650".parse().unwrap()));
        assert_eq!(row.mfr_code.as_deref(), Some("TYT"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let row = normalize("  Toyota , Corolla ,2021,,,").expect("row accepted");
        assert_eq!(row.make, "Toyota");
        assert_eq!(row.model, "Corolla");
    }

    #[test]
    fn skips_rows_with_too_few_fields() {
        assert_eq!(normalize("Toyota"), None);
    }

    #[test]
    fn skips_rows_with_empty_make_or_model() {
        assert_eq!(normalize(",Corolla,2021,,,"), None);
        assert_eq!(normalize("Toyota,   ,2021,,,"), None);
    }

    #[test]
    fn unparsable_year_falls_back_to_default() {
        let row = normalize("Toyota,Corolla,twenty21,,,").expect("row accepted");
        assert_eq!(row.year, FALLBACK_YEAR);
    }

    #[test]
    fn missing_year_column_uses_fallback() {
        let headers = split_csv_line("Make,Model");
        let indexes = HeaderIndexes::resolve(&headers).expect("headers resolve");
        let row = normalize_row(&split_csv_line("Toyota,Corolla"), &indexes).expect("row accepted");
        assert_eq!(row.year, FALLBACK_YEAR);
    }

    #[test]
    fn unparsable_decimal_is_absent_not_zero() {
        let row = normalize("Toyota,Corolla,2021,n/a,not-a-cost,").expect("row accepted");
        assert_eq!(row.combined_mpg, None);
        assert_eq!(row.annual_fuel_cost, None);
    }

    #[test]
    fn mfr_code_keeps_empty_string_when_column_present() {
        let row = normalize("Toyota,Corolla,2021,33.5,1650,").expect("row accepted");
        assert_eq!(row.mfr_code.as_deref(), Some(""));
    }
}
