//! Date-dimension builder.
//!
//! Generates one row per calendar day with calendar and fiscal attributes
//! pre-computed, so no view derives them at query time. Used when no date
//! export file is supplied; the result replaces dim_date with the same
//! swap semantics as a file load.

use crate::{
    error::{MartError, MartResult},
    schema,
    store::WarehouseStore,
    types::DateKey,
};
use chrono::{Datelike, NaiveDate, Weekday};

#[derive(Debug, Clone)]
pub struct DateRow {
    pub date_key: DateKey,
    pub full_date: NaiveDate,
    pub calendar_year: i32,
    pub calendar_month: u32,
    pub calendar_day: u32,
    pub calendar_quarter: u32,
    pub day_of_week: u32,
    pub day_name: String,
    pub month_name: String,
    pub is_weekend: bool,
    pub fiscal_year: i32,
    pub fiscal_quarter: u32,
}

impl DateRow {
    /// Values in dim_date load-column order.
    fn values(&self) -> Vec<Option<String>> {
        vec![
            Some(self.date_key.to_string()),
            Some(self.full_date.format("%Y-%m-%d").to_string()),
            Some(self.calendar_year.to_string()),
            Some(self.calendar_month.to_string()),
            Some(self.calendar_day.to_string()),
            Some(self.calendar_quarter.to_string()),
            Some(self.day_of_week.to_string()),
            Some(self.day_name.clone()),
            Some(self.month_name.clone()),
            Some(if self.is_weekend { "1" } else { "0" }.to_string()),
            Some(self.fiscal_year.to_string()),
            Some(self.fiscal_quarter.to_string()),
        ]
    }
}

pub struct DateDimensionBuilder {
    start: NaiveDate,
    end: NaiveDate,
    fiscal_year_start_month: u32,
}

impl DateDimensionBuilder {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            fiscal_year_start_month: 1,
        }
    }

    /// Month the fiscal year starts in. 1 means fiscal equals calendar.
    /// The fiscal year is labeled by the calendar year it ends in.
    pub fn fiscal_start(mut self, month: u32) -> Self {
        self.fiscal_year_start_month = month.clamp(1, 12);
        self
    }

    /// One row per day over the inclusive range.
    pub fn build(&self) -> Vec<DateRow> {
        let mut rows = Vec::new();
        let mut date = self.start;
        while date <= self.end {
            rows.push(self.build_row(date));
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        rows
    }

    /// Generate and swap the rows into dim_date.
    /// Returns the number of rows written.
    pub fn populate(&self, store: &WarehouseStore) -> MartResult<u64> {
        let def = schema::table_def("dim_date").ok_or_else(|| MartError::UnknownTable {
            name: "dim_date".to_string(),
        })?;
        let values: Vec<Vec<Option<String>>> =
            self.build().iter().map(DateRow::values).collect();
        let (loaded, _) = store.replace_table(def, &values)?;
        log::info!(
            "dim_date: generated {loaded} rows for {}..={}",
            self.start,
            self.end
        );
        Ok(loaded)
    }

    fn build_row(&self, date: NaiveDate) -> DateRow {
        let year = date.year();
        let month = date.month();
        let day = date.day();
        let weekday = date.weekday();
        let fiscal_start = self.fiscal_year_start_month;

        let months_into_fiscal = (month as i32 - fiscal_start as i32).rem_euclid(12) as u32;
        let fiscal_year = if fiscal_start == 1 || month < fiscal_start {
            year
        } else {
            year + 1
        };

        DateRow {
            date_key: year as i64 * 10_000 + month as i64 * 100 + day as i64,
            full_date: date,
            calendar_year: year,
            calendar_month: month,
            calendar_day: day,
            calendar_quarter: (month - 1) / 3 + 1,
            day_of_week: weekday.number_from_monday(),
            day_name: date.format("%A").to_string(),
            month_name: date.format("%B").to_string(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            fiscal_year,
            fiscal_quarter: months_into_fiscal / 3 + 1,
        }
    }
}
