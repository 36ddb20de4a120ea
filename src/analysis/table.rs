//! Observed values and model predictions on a shared daily index.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::TimeSeries;
use crate::error::{CurveError, Result};
use crate::models::CurveModel;

/// Predictions of one model over the whole table index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionColumn {
    /// Family name of the model.
    pub name: String,
    pub values: Vec<f64>,
}

/// One day of an [`ExtendedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub offset: f64,
    pub observed: Option<f64>,
    /// One value per prediction column, in column order.
    pub predictions: Vec<f64>,
}

/// Daily table running from the first observation to `future_periods`
/// days past the last one.
///
/// `observed` is `None` on days without an observation; every prediction
/// column is defined on every row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedTable {
    pub dates: Vec<NaiveDate>,
    /// Day offsets from the first date, the `x` the models were fitted on.
    pub offsets: Vec<f64>,
    pub observed_name: String,
    pub observed: Vec<Option<f64>>,
    pub predictions: Vec<PredictionColumn>,
}

impl ExtendedTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Prediction column for a family name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.predictions
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Row at `date`, if it is inside the index.
    pub fn row(&self, date: NaiveDate) -> Option<TableRow> {
        let i = self.dates.binary_search(&date).ok()?;
        Some(self.row_at(i))
    }

    /// Rows in date order.
    pub fn rows(&self) -> impl Iterator<Item = TableRow> + '_ {
        (0..self.len()).map(|i| self.row_at(i))
    }

    fn row_at(&self, i: usize) -> TableRow {
        TableRow {
            date: self.dates[i],
            offset: self.offsets[i],
            observed: self.observed[i],
            predictions: self.predictions.iter().map(|c| c.values[i]).collect(),
        }
    }
}

/// Reindex `series` daily, extend it `future_periods` days, and add one
/// prediction column per model.
///
/// Models sharing a family name overwrite each other; the last one wins but
/// keeps the position of the first.
pub fn build_extended_table(
    models: &[CurveModel],
    series: &TimeSeries,
    future_periods: u32,
) -> Result<ExtendedTable> {
    let first = series.first_date();
    let last = series
        .last_date()
        .checked_add_days(chrono::Days::new(u64::from(future_periods)))
        .ok_or_else(|| {
            CurveError::InvalidParameter(format!(
                "{future_periods} future periods run past the calendar"
            ))
        })?;

    let dates: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();
    let offsets: Vec<f64> = dates.iter().map(|&d| series.offset_of(d) as f64).collect();
    let observed = dates.iter().map(|&d| series.get(d)).collect();

    let mut predictions: Vec<PredictionColumn> = Vec::with_capacity(models.len());
    for model in models {
        let column = PredictionColumn {
            name: model.name().to_string(),
            values: model.compute_many(&offsets),
        };
        match predictions.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => predictions.push(column),
        }
    }

    log::debug!(
        "extended table: {} rows from {first} to {last}, {} prediction columns",
        dates.len(),
        predictions.len()
    );

    Ok(ExtendedTable {
        dates,
        offsets,
        observed_name: series.name().to_string(),
        observed,
        predictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gompertz, Logistic};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 2, 24).unwrap()
    }

    fn models() -> Vec<CurveModel> {
        vec![
            Logistic::new(5.0, 0.8, 100.0).into(),
            Gompertz::new(2.0, 0.3, 100.0).into(),
        ]
    }

    #[test]
    fn extends_past_last_observation() {
        let values: Vec<f64> = (0..10).map(|i| f64::from(i) * 10.0).collect();
        let series = TimeSeries::daily("totale_casi", start(), values).unwrap();
        let table = build_extended_table(&models(), &series, 5).unwrap();

        assert_eq!(table.len(), 15);
        assert_eq!(table.observed_name, "totale_casi");
        assert_eq!(table.dates[14], NaiveDate::from_ymd_opt(2020, 3, 9).unwrap());
        assert_eq!(table.offsets[14], 14.0);
        assert_eq!(table.observed[9], Some(90.0));
        assert!(table.observed[10..].iter().all(Option::is_none));

        let logistic = table.column("Logistic").unwrap();
        assert_eq!(logistic.len(), 15);
        assert!(logistic.iter().all(|v| v.is_finite()));
        assert_eq!(logistic[5], 50.0);
        assert!(table.column("Gompertz").unwrap().iter().all(|v| v.is_finite()));
        assert!(table.column("GeneralizedLogistic").is_none());
    }

    #[test]
    fn gaps_in_the_series_become_missing_rows() {
        let d = |day| NaiveDate::from_ymd_opt(2020, 3, day).unwrap();
        let series =
            TimeSeries::new("deceduti", vec![(d(1), 1.0), (d(2), 2.0), (d(5), 5.0)]).unwrap();
        let table = build_extended_table(&models(), &series, 0).unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(
            table.observed,
            vec![Some(1.0), Some(2.0), None, None, Some(5.0)]
        );
        let row = table.row(d(3)).unwrap();
        assert_eq!(row.observed, None);
        assert_eq!(row.offset, 2.0);
        assert_eq!(row.predictions.len(), 2);
        assert!(table.row(d(6)).is_none());

        let dates: Vec<NaiveDate> = table.rows().map(|r| r.date).collect();
        assert_eq!(dates, table.dates);
    }

    #[test]
    fn same_family_replaces_earlier_column() {
        let series = TimeSeries::daily("totale_casi", start(), vec![1.0, 2.0, 3.0]).unwrap();
        let models: Vec<CurveModel> = vec![
            Logistic::new(1.0, 1.0, 10.0).into(),
            Gompertz::new(1.0, 1.0, 10.0).into(),
            Logistic::new(1.0, 1.0, 20.0).into(),
        ];
        let table = build_extended_table(&models, &series, 0).unwrap();

        assert_eq!(table.predictions.len(), 2);
        assert_eq!(table.predictions[0].name, "Logistic");
        assert_eq!(table.column("Logistic").unwrap()[1], 10.0);
    }

    #[test]
    fn serializes_missing_observations_as_null() {
        let series = TimeSeries::daily("totale_casi", start(), vec![1.0, 2.0]).unwrap();
        let table = build_extended_table(&[], &series, 1).unwrap();
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["observed"], serde_json::json!([1.0, 2.0, null]));
        assert_eq!(json["dates"][2], "2020-02-26");
        assert_eq!(json["predictions"], serde_json::json!([]));
    }
}
