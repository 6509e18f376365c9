//! Invoice breakdown calculation.
//!
//! Turns a summed package count and a worker's rates into the six-stage
//! breakdown: base, super, subtotal, GST, total with GST, and the final total
//! after the van rent deduction.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Breakdown, InvoiceInput};

/// Number of decimal places monetary outputs are rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to cents, half away from zero (16.725 becomes 16.73).
///
/// The result always carries exactly two decimal places, so `150` serializes
/// as `"150.00"`.
///
/// # Example
///
/// ```
/// use courier_ledger::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("16.725").unwrap()), Decimal::from_str("16.73").unwrap());
/// assert_eq!(round_money(Decimal::from_str("-0.005").unwrap()), Decimal::from_str("-0.01").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}

/// Computes the invoice breakdown for one worker and period.
///
/// Every stage is derived from the exact (unrounded) value of the stage
/// before it; monetary fields are rounded to cents only when the
/// [`Breakdown`] is assembled. Rates are echoed back unchanged.
///
/// A zero package sum yields zero pay and a negative final total equal to
/// the van rent. No input is rejected here; rates, GST and van rent are
/// bounded where they enter the system (forms, JSON and config), and within
/// those bounds no stage can overflow.
///
/// # Arguments
///
/// * `input` - The package sum, worker rates, GST rate and van rent
///
/// # Examples
///
/// ```
/// use courier_ledger::calculation::compute_invoice;
/// use courier_ledger::models::InvoiceInput;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let input = InvoiceInput::new(
///     100,
///     Decimal::from_str("1.5").unwrap(),
///     Decimal::from_str("0.115").unwrap(),
/// );
/// let breakdown = compute_invoice(&input);
///
/// assert_eq!(breakdown.base, Decimal::from_str("150.00").unwrap());
/// assert_eq!(breakdown.super_amount, Decimal::from_str("17.25").unwrap());
/// assert_eq!(breakdown.gst, Decimal::from_str("16.73").unwrap());
/// assert_eq!(breakdown.total, Decimal::from_str("83.98").unwrap());
/// ```
pub fn compute_invoice(input: &InvoiceInput) -> Breakdown {
    let base = Decimal::from(input.packages_sum) * input.price_per_pkg;
    let super_amount = base * input.super_rate;
    let subtotal = base + super_amount;
    let gst = subtotal * input.gst_rate;
    let total_with_gst = subtotal + gst;
    let final_total = total_with_gst - input.van_rent;

    Breakdown {
        packages: input.packages_sum,
        price_per_pkg: input.price_per_pkg,
        super_rate: input.super_rate,
        base: round_money(base),
        super_amount: round_money(super_amount),
        subtotal: round_money(subtotal),
        gst_rate: input.gst_rate,
        gst: round_money(gst),
        total_with_gst: round_money(total_with_gst),
        van_rent: round_money(input.van_rent),
        total: round_money(final_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn monetary_fields(b: &Breakdown) -> [Decimal; 7] {
        [
            b.base,
            b.super_amount,
            b.subtotal,
            b.gst,
            b.total_with_gst,
            b.van_rent,
            b.total,
        ]
    }

    #[test]
    fn test_reference_scenario_100_packages() {
        let input = InvoiceInput::new(100, dec("1.5"), dec("0.115"));
        let b = compute_invoice(&input);

        assert_eq!(b.packages, 100);
        assert_eq!(b.base, dec("150.00"));
        assert_eq!(b.super_amount, dec("17.25"));
        assert_eq!(b.subtotal, dec("167.25"));
        // 16.725 sits exactly on the midpoint
        assert_eq!(b.gst, dec("16.73"));
        assert_eq!(b.total_with_gst, dec("183.98"));
        assert_eq!(b.van_rent, dec("100.00"));
        assert_eq!(b.total, dec("83.98"));
    }

    #[test]
    fn test_zero_packages_total_is_negative_van_rent() {
        let b = compute_invoice(&InvoiceInput::new(0, dec("1.5"), dec("0.115")));

        assert_eq!(b.base, Decimal::ZERO);
        assert_eq!(b.super_amount, Decimal::ZERO);
        assert_eq!(b.subtotal, Decimal::ZERO);
        assert_eq!(b.gst, Decimal::ZERO);
        assert_eq!(b.total, dec("-100.00"));
    }

    #[test]
    fn test_rates_are_echoed_unrounded() {
        let input = InvoiceInput::new(10, dec("1.2345"), dec("0.1175")).with_gst_rate(dec("0.125"));
        let b = compute_invoice(&input);

        assert_eq!(b.price_per_pkg, dec("1.2345"));
        assert_eq!(b.super_rate, dec("0.1175"));
        assert_eq!(b.gst_rate, dec("0.125"));
    }

    #[test]
    fn test_stages_use_unrounded_predecessors() {
        // exact: base 0.125, super 0.0625, subtotal 0.1875, gst 0.01875, total 0.20625
        // rounding per stage would give super 0.07 and subtotal 0.20 instead
        let input = InvoiceInput::new(1, dec("0.125"), dec("0.5")).with_van_rent(Decimal::ZERO);
        let b = compute_invoice(&input);

        assert_eq!(b.base, dec("0.13"));
        assert_eq!(b.super_amount, dec("0.06"));
        assert_eq!(b.subtotal, dec("0.19"));
        assert_eq!(b.gst, dec("0.02"));
        assert_eq!(b.total_with_gst, dec("0.21"));
        assert_eq!(b.total, dec("0.21"));
    }

    #[test]
    fn test_custom_van_rent_and_zero_gst() {
        let input = InvoiceInput::new(200, dec("2"), Decimal::ZERO)
            .with_gst_rate(Decimal::ZERO)
            .with_van_rent(dec("75.5"));
        let b = compute_invoice(&input);

        assert_eq!(b.subtotal, dec("400"));
        assert_eq!(b.gst, Decimal::ZERO);
        assert_eq!(b.van_rent, dec("75.50"));
        assert_eq!(b.total, dec("324.50"));
    }

    #[test]
    fn test_negative_van_rent_is_added_back() {
        let input = InvoiceInput::new(0, dec("1"), Decimal::ZERO).with_van_rent(dec("-20"));
        assert_eq!(compute_invoice(&input).total, dec("20.00"));
    }

    #[test]
    fn test_largest_accepted_inputs_do_not_overflow() {
        // a year of maximal daily entries at the highest accepted rates
        let packages = u64::from(u32::MAX) * 366;
        let input = InvoiceInput::new(packages, dec("1000000"), dec("10"))
            .with_gst_rate(Decimal::ONE)
            .with_van_rent(dec("1000000"));
        let b = compute_invoice(&input);

        assert_eq!(b.base, Decimal::from(packages) * dec("1000000"));
        assert_eq!(b.subtotal, b.base * dec("11"));
        assert_eq!(b.total_with_gst, b.subtotal * dec("2"));
        assert_eq!(b.total, b.total_with_gst - dec("1000000"));
    }

    #[test]
    fn test_round_money_midpoints() {
        assert_eq!(round_money(dec("0.005")), dec("0.01"));
        assert_eq!(round_money(dec("0.004999")), dec("0.00"));
        assert_eq!(round_money(dec("183.975")), dec("183.98"));
        assert_eq!(round_money(dec("-83.975")), dec("-83.98"));
    }

    fn rate() -> impl Strategy<Value = Decimal> {
        // 0.0000 ..= 0.5000
        (0i64..=5000).prop_map(|n| Decimal::new(n, 4))
    }

    fn price() -> impl Strategy<Value = Decimal> {
        // 0.01 ..= 20.00
        (1i64..=2000).prop_map(|n| Decimal::new(n, 2))
    }

    fn van_rent() -> impl Strategy<Value = Decimal> {
        (0i64..=50000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #[test]
        fn prop_zero_packages_total_is_minus_van_rent(
            price in price(),
            super_rate in rate(),
            van_rent in van_rent(),
        ) {
            let b = compute_invoice(&InvoiceInput::new(0, price, super_rate).with_van_rent(van_rent));
            prop_assert_eq!(b.base, Decimal::ZERO);
            prop_assert_eq!(b.super_amount, Decimal::ZERO);
            prop_assert_eq!(b.subtotal, Decimal::ZERO);
            prop_assert_eq!(b.gst, Decimal::ZERO);
            prop_assert_eq!(b.total, -round_money(van_rent));
        }

        #[test]
        fn prop_monetary_fields_have_at_most_two_places(
            packages in 0u64..1_000_000,
            price in price(),
            super_rate in rate(),
            gst_rate in rate(),
            van_rent in van_rent(),
        ) {
            let input = InvoiceInput::new(packages, price, super_rate)
                .with_gst_rate(gst_rate)
                .with_van_rent(van_rent);
            let b = compute_invoice(&input);
            for amount in monetary_fields(&b) {
                prop_assert!(amount.normalize().scale() <= 2, "{} has more than 2 places", amount);
            }
        }

        #[test]
        fn prop_total_is_monotonic_in_packages(
            packages in 0u64..100_000,
            extra in 1u64..1_000,
            price in price(),
            super_rate in rate(),
            gst_rate in rate(),
        ) {
            let lower = compute_invoice(
                &InvoiceInput::new(packages, price, super_rate).with_gst_rate(gst_rate),
            );
            let higher = compute_invoice(
                &InvoiceInput::new(packages + extra, price, super_rate).with_gst_rate(gst_rate),
            );
            // price >= 0.01 so each extra package adds at least a cent
            prop_assert!(higher.total > lower.total);
        }
    }
}
