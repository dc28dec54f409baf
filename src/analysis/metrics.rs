//! Headline metric calculation.

use crate::analysis::aggregator::totals;
use crate::models::{MetricSnapshot, SalesRecord};
use rust_decimal::Decimal;

/// Profit as a percentage of sales. Zero when there are no positive sales.
///
/// Ratios beyond the decimal range saturate to `Decimal::MAX` / `Decimal::MIN`.
pub fn profit_margin(total_sales: Decimal, total_profit: Decimal) -> Decimal {
    if total_sales <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match total_profit.checked_div(total_sales) {
        Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
        None if total_profit.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Computes the metric snapshot for `selected` against the full dataset.
///
/// Nothing is cached; every call recomputes from its inputs.
pub fn compute_metrics<'a, I>(selected: I, all: &[SalesRecord]) -> MetricSnapshot
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let (total_sales, total_profit) = totals(selected);
    let (overall_sales, overall_profit) = totals(all);

    let margin = profit_margin(total_sales, total_profit);
    let overall_margin = profit_margin(overall_sales, overall_profit);

    MetricSnapshot {
        total_sales,
        total_profit,
        profit_margin: margin,
        overall_margin,
        margin_delta: margin.saturating_sub(overall_margin),
    }
}
