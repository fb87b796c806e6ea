//! Aggregate statistics over the `records` table.

use serde::Serialize;

/// Raw aggregate results. `None` means SQL NULL, which every aggregate but
/// `COUNT` returns on an empty table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregates {
    pub count: i64,
    pub average: Option<f64>,
    pub maximum: Option<i32>,
    pub minimum: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_records: i64,
    pub average_value: f64,
    pub maximum_value: i32,
    pub minimum_value: i32,
}

impl From<Aggregates> for Statistics {
    fn from(agg: Aggregates) -> Self {
        Self {
            total_records: agg.count,
            average_value: agg.average.filter(|avg| avg.is_finite()).unwrap_or(0.0),
            maximum_value: agg.maximum.unwrap_or(0),
            minimum_value: agg.minimum.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_normalizes_to_zero() {
        let stats = Statistics::from(Aggregates::default());
        assert_eq!(
            stats,
            Statistics {
                total_records: 0,
                average_value: 0.0,
                maximum_value: 0,
                minimum_value: 0,
            }
        );
    }

    #[test]
    fn test_rows_without_values_normalize_to_zero() {
        let stats = Statistics::from(Aggregates {
            count: 3,
            ..Aggregates::default()
        });
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.average_value, 0.0);
    }

    #[test]
    fn test_aggregates_pass_through() {
        let stats = Statistics::from(Aggregates {
            count: 4,
            average: Some(12.5),
            maximum: Some(40),
            minimum: Some(-3),
        });
        assert_eq!(stats.average_value, 12.5);
        assert_eq!(stats.maximum_value, 40);
        assert_eq!(stats.minimum_value, -3);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Statistics::from(Aggregates::default())).unwrap();
        assert_eq!(json["totalRecords"], 0);
        assert_eq!(json["averageValue"], 0.0);
        assert_eq!(json["maximumValue"], 0);
        assert_eq!(json["minimumValue"], 0);
    }
}
