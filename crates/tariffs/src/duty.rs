//! Import duty estimation.
//!
//! Total over all numeric inputs: blank or unparseable form fields coerce to
//! zero, nothing is rejected, and a zero product value yields a NaN effective
//! rate rather than a panic. No rounding happens here — presentation rounds
//! to two decimals via [`round2`].

use serde::{Deserialize, Serialize};

/// Calculator inputs after form coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyInput {
    pub product_value: f64,
    /// Tariff rate, percent.
    pub tariff_rate: f64,
    /// Additional duties, percent.
    pub additional_rate: f64,
    /// Echoed through unchanged; no conversion is performed.
    pub currency: String,
}

impl DutyInput {
    /// Coerce raw form fields. Blank or unparseable numbers become zero.
    pub fn from_form(
        product_value: &str,
        tariff_rate: &str,
        additional_rate: &str,
        currency: &str,
    ) -> Self {
        Self {
            product_value: parse_or_zero(product_value),
            tariff_rate: parse_or_zero(tariff_rate),
            additional_rate: parse_or_zero(additional_rate),
            currency: currency.to_string(),
        }
    }

    /// Compute the cost breakdown.
    pub fn calculate(&self) -> DutyBreakdown {
        let tariff_amount = self.product_value * self.tariff_rate / 100.0;
        let additional_amount = self.product_value * self.additional_rate / 100.0;
        let total_duties = tariff_amount + additional_amount;
        let total_cost = self.product_value + total_duties;
        let effective_rate = total_duties / self.product_value * 100.0;

        DutyBreakdown {
            product_value: self.product_value,
            tariff_amount,
            additional_amount,
            total_duties,
            total_cost,
            effective_rate,
            currency: self.currency.clone(),
        }
    }
}

/// Derived cost breakdown.
///
/// `total_cost = product_value + total_duties` always holds;
/// `effective_rate` is NaN when the product value is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyBreakdown {
    pub product_value: f64,
    pub tariff_amount: f64,
    pub additional_amount: f64,
    pub total_duties: f64,
    pub total_cost: f64,
    pub effective_rate: f64,
    pub currency: String,
}

/// Two-decimal presentation rounding for currency amounts and rates.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_or_zero(raw: &str) -> f64 {
    let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
    if parsed.is_finite() { parsed } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_from_the_calculator_page() {
        let input = DutyInput::from_form("10000", "7.5", "0", "USD");
        let breakdown = input.calculate();

        assert_eq!(round2(breakdown.tariff_amount), 750.00);
        assert_eq!(round2(breakdown.additional_amount), 0.00);
        assert_eq!(round2(breakdown.total_duties), 750.00);
        assert_eq!(round2(breakdown.total_cost), 10750.00);
        assert_eq!(round2(breakdown.effective_rate), 7.50);
        assert_eq!(breakdown.currency, "USD");
    }

    #[test]
    fn zero_value_yields_nan_effective_rate_without_panicking() {
        let breakdown = DutyInput::from_form("0", "5", "2", "EUR").calculate();

        assert_eq!(breakdown.total_duties, 0.0);
        assert_eq!(breakdown.total_cost, 0.0);
        assert!(breakdown.effective_rate.is_nan());
    }

    #[test]
    fn blank_and_garbage_fields_coerce_to_zero() {
        let input = DutyInput::from_form("", "abc", "  ", "USD");
        assert_eq!(input.product_value, 0.0);
        assert_eq!(input.tariff_rate, 0.0);
        assert_eq!(input.additional_rate, 0.0);
    }

    #[test]
    fn negative_inputs_are_not_rejected() {
        let breakdown = DutyInput::from_form("-100", "10", "0", "USD").calculate();
        assert_eq!(round2(breakdown.tariff_amount), -10.0);
        assert_eq!(round2(breakdown.total_cost), -110.0);
    }

    #[test]
    fn non_finite_input_strings_coerce_to_zero() {
        let input = DutyInput::from_form("inf", "NaN", "-inf", "USD");
        assert_eq!(input.product_value, 0.0);
        assert_eq!(input.tariff_rate, 0.0);
        assert_eq!(input.additional_rate, 0.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The headline invariant: cost minus duties recovers the value.
            #[test]
            fn total_cost_minus_duties_recovers_value(
                value in 0.0f64..1e9,
                tariff in 0.0f64..500.0,
                additional in 0.0f64..500.0,
            ) {
                let input = DutyInput {
                    product_value: value,
                    tariff_rate: tariff,
                    additional_rate: additional,
                    currency: "USD".to_string(),
                };
                let b = input.calculate();
                let tolerance = 1e-6 * value.max(1.0);
                prop_assert!((b.total_cost - b.total_duties - value).abs() <= tolerance);
            }

            /// Same inputs, same breakdown: the calculator is deterministic.
            #[test]
            fn calculation_is_deterministic(
                value in -1e9f64..1e9,
                tariff in -500.0f64..500.0,
                additional in -500.0f64..500.0,
            ) {
                let input = DutyInput {
                    product_value: value,
                    tariff_rate: tariff,
                    additional_rate: additional,
                    currency: "USD".to_string(),
                };
                let (a, b) = (input.calculate(), input.calculate());
                prop_assert_eq!(a.tariff_amount.to_bits(), b.tariff_amount.to_bits());
                prop_assert_eq!(a.additional_amount.to_bits(), b.additional_amount.to_bits());
                prop_assert_eq!(a.total_duties.to_bits(), b.total_duties.to_bits());
                prop_assert_eq!(a.total_cost.to_bits(), b.total_cost.to_bits());
                // Bit equality also covers the NaN effective rate at value == 0.
                prop_assert_eq!(a.effective_rate.to_bits(), b.effective_rate.to_bits());
            }

            /// Positive values always produce a finite effective rate.
            #[test]
            fn positive_value_has_finite_effective_rate(
                value in 0.01f64..1e9,
                tariff in 0.0f64..500.0,
            ) {
                let input = DutyInput {
                    product_value: value,
                    tariff_rate: tariff,
                    additional_rate: 0.0,
                    currency: "USD".to_string(),
                };
                prop_assert!(input.calculate().effective_rate.is_finite());
            }
        }
    }
}
