// src/services/valuation.rs
use log::warn;

use crate::models::{
    CompanyProfile, DcfAssumptions, ExitMultipleBasis, TerminalMethod, TerminalValueSpec,
    ValuationResult, YearlyProjection,
};

/// Explicit forecast horizon. The projection always has exactly this many
/// entries, years numbered 1..=FORECAST_YEARS.
pub const FORECAST_YEARS: u32 = 5;

fn as_fraction(percentage: f64) -> f64 {
    percentage / 100.0
}

/// Run a full DCF valuation: a 5-year free-cash-flow projection, a terminal
/// value, and the resulting fair value per share.
///
/// Pure and deterministic: identical inputs always produce an identical
/// result, and nothing is shared between calls. The caller must keep the
/// discount rate above the terminal growth rate on the Gordon path; the
/// engine does not validate this, and a degenerate denominator propagates
/// into the result as a non-finite or negative number.
pub fn run_valuation(
    profile: &CompanyProfile,
    assumptions: &DcfAssumptions,
    terminal: &TerminalValueSpec,
) -> ValuationResult {
    let mut projections = Vec::with_capacity(FORECAST_YEARS as usize);
    let mut previous_working_capital = 0.0;
    let mut total_present_value = 0.0;

    for year in 1..=FORECAST_YEARS {
        // Revenue and depreciation both compound from the base year using
        // the same CAGR multiplier, not from the prior year's figures.
        let growth_multiplier =
            (1.0 + as_fraction(assumptions.revenue_growth_cagr)).powi(year as i32);
        let revenue = profile.base_revenue * growth_multiplier;
        let depreciation = profile.base_depreciation * growth_multiplier;

        let operating_profit = revenue * as_fraction(assumptions.operating_profit_margin);
        let taxes = operating_profit * as_fraction(assumptions.tax_rate);
        let nopat = operating_profit - taxes;

        let capex = revenue * as_fraction(assumptions.capex_intensity);

        // Working capital is carried as a level; the cash-flow impact each
        // year is the delta against the prior level, which starts at zero.
        let working_capital = revenue * as_fraction(assumptions.working_capital_intensity);
        let working_capital_change = working_capital - previous_working_capital;
        previous_working_capital = working_capital;

        let free_cash_flow = nopat + depreciation - capex - working_capital_change;

        let discount_factor = (1.0 + as_fraction(assumptions.discount_rate)).powi(year as i32);
        let present_value = free_cash_flow / discount_factor;
        total_present_value += present_value;

        projections.push(YearlyProjection {
            year,
            revenue,
            operating_profit,
            taxes,
            nopat,
            depreciation,
            capex,
            working_capital_change,
            free_cash_flow,
            present_value,
        });
    }

    let final_year = projections[(FORECAST_YEARS - 1) as usize];
    let terminal_value = compute_terminal_value(&final_year, assumptions, terminal);

    let terminal_discount_factor =
        (1.0 + as_fraction(assumptions.discount_rate)).powi(FORECAST_YEARS as i32);
    let present_value_terminal_value = terminal_value / terminal_discount_factor;

    let enterprise_value = total_present_value + present_value_terminal_value;
    let fair_value_per_share = enterprise_value / profile.shares_outstanding;

    ValuationResult {
        assumptions: *assumptions,
        projections,
        terminal_value,
        present_value_terminal_value,
        total_present_value,
        enterprise_value,
        shares_outstanding: profile.shares_outstanding,
        fair_value_per_share,
    }
}

/// Terminal value at the end of the forecast horizon, by exactly one of the
/// two methods. Requesting the exit-multiple method without both the
/// multiple and its basis falls back to Gordon Growth; callers relying on
/// the multiple must supply both.
fn compute_terminal_value(
    final_year: &YearlyProjection,
    assumptions: &DcfAssumptions,
    terminal: &TerminalValueSpec,
) -> f64 {
    if terminal.method == TerminalMethod::Multiple {
        match (terminal.exit_multiple, terminal.exit_multiple_type) {
            (Some(multiple), Some(ExitMultipleBasis::PriceToEarnings)) => {
                // NOPAT stands in for earnings
                return final_year.nopat * multiple;
            }
            (Some(multiple), Some(ExitMultipleBasis::EnterpriseValueToEbitda)) => {
                // Operating profit plus depreciation stands in for EBITDA
                return (final_year.operating_profit + final_year.depreciation) * multiple;
            }
            _ => {
                warn!("Exit-multiple terminal value requested without both a multiple and a basis; falling back to Gordon Growth");
            }
        }
    }

    // Gordon Growth perpetuity on the final forecast year's free cash flow.
    // Degenerate when the discount rate is not above the terminal growth
    // rate; the quotient is returned as-is.
    let growth = as_fraction(assumptions.terminal_growth_rate);
    let discount = as_fraction(assumptions.discount_rate);
    final_year.free_cash_flow * (1.0 + growth) / (discount - growth)
}
