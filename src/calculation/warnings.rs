//! Data-quality warnings attached to invoices.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::InvoiceWarning;

/// Warning code for a work date recorded more than once by the same worker.
pub const DUPLICATE_DAY_WARNING: &str = "DUPLICATE_DAY";

/// Flags work dates that appear more than once.
///
/// Multiple entries per worker per day are allowed and all of them count
/// towards the package sum; this only surfaces them so an administrator can
/// check for double counting. Warnings come out in date order.
///
/// # Example
///
/// ```
/// use courier_ledger::calculation::duplicate_day_warnings;
/// use chrono::NaiveDate;
///
/// let d = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let warnings = duplicate_day_warnings(&[d, d, d.succ_opt().unwrap()]);
/// assert_eq!(warnings.len(), 1);
/// assert_eq!(warnings[0].code, "DUPLICATE_DAY");
/// ```
pub fn duplicate_day_warnings(work_dates: &[NaiveDate]) -> Vec<InvoiceWarning> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in work_dates {
        *counts.entry(*date).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(date, count)| InvoiceWarning {
            code: DUPLICATE_DAY_WARNING.to_string(),
            message: format!("{} has {} entries; all are included in the total", date, count),
        })
        .collect()
}
