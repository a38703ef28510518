//! Denomination tally.
//!
//! The cashier counts bills and coins at close. The tally total is advisory: when it
//! disagrees with the counted closing amount the difference is reported so the
//! cashier can recount, but the close still goes through.

use crate::{
    config::settings::DenominationConfig,
    core::money::round_cents,
    errors::{Error, Result},
};
use sea_orm::prelude::Json;
use serde::Serialize;
use std::collections::BTreeMap;

const VALUE_TOLERANCE: f64 = 1e-9;

/// A validated tally keyed by the configured denomination label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DenominationBreakdown {
    counts: BTreeMap<String, u32>,
}

/// Outcome of comparing a tally with a counted amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenominationCheck {
    /// `Σ value × count`
    pub total_counted: f64,
    /// The amount the tally was compared with
    pub closing_amount: Option<f64>,
    /// `total_counted - closing_amount`, `None` when they agree or nothing was compared
    pub mismatch: Option<f64>,
}

fn label_value(label: &str) -> Option<f64> {
    label
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

impl DenominationBreakdown {
    /// Validates raw counts against the supported denominations.
    ///
    /// Labels are matched by value, so `"0.1"` and `"0.10"` name the same coin and
    /// their counts are added together.
    ///
    /// # Errors
    /// [`Error::Validation`] for a label that is not a supported denomination.
    pub fn from_counts(
        counts: &BTreeMap<String, u32>,
        supported: &[DenominationConfig],
    ) -> Result<Self> {
        let mut normalized = BTreeMap::new();
        for (label, count) in counts {
            let denomination = label_value(label)
                .and_then(|value| {
                    supported
                        .iter()
                        .find(|d| (d.value - value).abs() < VALUE_TOLERANCE)
                })
                .ok_or_else(|| {
                    Error::validation(format!("Unsupported denomination '{label}'"))
                })?;
            let total: &mut u32 = normalized.entry(denomination.label.clone()).or_insert(0);
            *total = total
                .checked_add(*count)
                .ok_or_else(|| Error::validation("Denomination count too large"))?;
        }
        Ok(Self { counts: normalized })
    }

    /// Reads a stored breakdown. Labels are numeric so no configuration is needed.
    pub fn from_json(json: &Json) -> Result<Self> {
        let counts: BTreeMap<String, u32> = serde_json::from_value(json.clone())?;
        if let Some(bad) = counts.keys().find(|label| label_value(label).is_none()) {
            return Err(Error::validation(format!(
                "Stored denomination '{bad}' is not numeric"
            )));
        }
        Ok(Self { counts })
    }

    /// Serialized form stored on the drawer.
    #[must_use]
    pub fn to_json(&self) -> Json {
        serde_json::json!(self.counts)
    }

    /// Counts per label.
    #[must_use]
    pub const fn counts(&self) -> &BTreeMap<String, u32> {
        &self.counts
    }

    /// `Σ value × count`, rounded to cents.
    #[must_use]
    pub fn total(&self) -> f64 {
        round_cents(
            self.counts
                .iter()
                .filter_map(|(label, count)| label_value(label).map(|v| v * f64::from(*count)))
                .sum(),
        )
    }

    /// Compares the tally with a counted closing amount.
    #[must_use]
    pub fn check_against(&self, closing_amount: f64) -> DenominationCheck {
        let total_counted = self.total();
        let diff = round_cents(total_counted - closing_amount);
        DenominationCheck {
            total_counted,
            closing_amount: Some(closing_amount),
            mismatch: (diff != 0.0).then_some(diff),
        }
    }
}

/// Validates raw counts and totals them, optionally comparing with a closing amount.
pub fn tally(
    counts: &BTreeMap<String, u32>,
    supported: &[DenominationConfig],
    closing_amount: Option<f64>,
) -> Result<DenominationCheck> {
    let breakdown = DenominationBreakdown::from_counts(counts, supported)?;
    Ok(closing_amount.map_or_else(
        || DenominationCheck {
            total_counted: breakdown.total(),
            closing_amount: None,
            mismatch: None,
        },
        |amount| breakdown.check_against(amount),
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::settings::default_denominations;

    fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(l, c)| ((*l).to_string(), *c)).collect()
    }

    #[test]
    fn test_representative_total() {
        let breakdown = DenominationBreakdown::from_counts(
            &counts(&[("1000", 2), ("500", 1), ("0.25", 4)]),
            &default_denominations(),
        )
        .unwrap();
        assert_eq!(breakdown.total(), 2501.0);
    }

    #[test]
    fn test_small_coins_round_to_cents() {
        let breakdown = DenominationBreakdown::from_counts(
            &counts(&[("0.10", 3), ("0.05", 7)]),
            &default_denominations(),
        )
        .unwrap();
        assert_eq!(breakdown.total(), 0.65);
    }

    #[test]
    fn test_labels_matched_by_value() {
        let breakdown = DenominationBreakdown::from_counts(
            &counts(&[("0.1", 2), ("0.10", 3), ("1000.00", 1)]),
            &default_denominations(),
        )
        .unwrap();
        assert_eq!(breakdown.counts().get("0.10"), Some(&5));
        assert_eq!(breakdown.counts().get("1000"), Some(&1));
        assert_eq!(breakdown.total(), 1000.5);
    }

    #[test]
    fn test_merged_count_overflow_rejected() {
        let result = DenominationBreakdown::from_counts(
            &counts(&[("0.1", u32::MAX), ("0.10", 1)]),
            &default_denominations(),
        );
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_unknown_denomination_rejected() {
        let result =
            DenominationBreakdown::from_counts(&counts(&[("3", 1)]), &default_denominations());
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result =
            DenominationBreakdown::from_counts(&counts(&[("peso", 1)]), &default_denominations());
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_mismatch_reported_not_rejected() {
        let check = tally(
            &counts(&[("100", 10)]),
            &default_denominations(),
            Some(990.0),
        )
        .unwrap();
        assert_eq!(check.total_counted, 1000.0);
        assert_eq!(check.mismatch, Some(10.0));

        let matching = tally(&counts(&[("100", 10)]), &default_denominations(), Some(1000.0)).unwrap();
        assert_eq!(matching.mismatch, None);

        let uncompared = tally(&counts(&[("20", 1)]), &default_denominations(), None).unwrap();
        assert_eq!(uncompared.total_counted, 20.0);
        assert_eq!(uncompared.closing_amount, None);
    }

    #[test]
    fn test_json_round_trip_keeps_total() {
        let breakdown = DenominationBreakdown::from_counts(
            &counts(&[("500", 3), ("5", 2)]),
            &default_denominations(),
        )
        .unwrap();
        let restored = DenominationBreakdown::from_json(&breakdown.to_json()).unwrap();
        assert_eq!(restored, breakdown);
        assert_eq!(restored.total(), 1510.0);
    }
}
