// src/models.rs
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use uuid::Uuid;

/// The seven adjustable DCF assumptions. All rates are whole-number
/// percentages (8.0 means 8%); they are converted to fractions only inside
/// the valuation engine. Wire names match the dashboard frontend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfAssumptions {
    #[serde(rename = "revenueGrowthCAGR")]
    pub revenue_growth_cagr: f64,
    pub operating_profit_margin: f64,
    pub discount_rate: f64,
    pub capex_intensity: f64,
    pub working_capital_intensity: f64,
    pub tax_rate: f64,
    pub terminal_growth_rate: f64,
}

impl Default for DcfAssumptions {
    fn default() -> Self {
        DcfAssumptions {
            revenue_growth_cagr: 8.0,
            operating_profit_margin: 15.0,
            discount_rate: 10.0,
            capex_intensity: 8.0,
            working_capital_intensity: 12.0,
            tax_rate: 25.0,
            terminal_growth_rate: 2.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalMethod {
    #[default]
    Gordon,
    Multiple,
}

/// Basis for the exit-multiple terminal value. The short wire names are the
/// frontend's; the long aliases are accepted for API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitMultipleBasis {
    #[serde(rename = "pe", alias = "priceToEarnings")]
    PriceToEarnings,
    #[serde(rename = "ebitda", alias = "enterpriseValueToEbitda")]
    EnterpriseValueToEbitda,
}

/// Terminal-value settings that ride alongside the assumptions on each
/// request. Defaults to Gordon Growth with no multiple configured.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerminalValueSpec {
    #[serde(rename = "terminalMethod")]
    pub method: TerminalMethod,
    pub exit_multiple: Option<f64>,
    pub exit_multiple_type: Option<ExitMultipleBasis>,
}

impl TerminalValueSpec {
    pub fn multiple(exit_multiple: f64, basis: ExitMultipleBasis) -> Self {
        TerminalValueSpec {
            method: TerminalMethod::Multiple,
            exit_multiple: Some(exit_multiple),
            exit_multiple_type: Some(basis),
        }
    }
}

/// Fixed anchor data for the entity being valued. Only ratios and growth
/// rates are adjustable per request; these absolute magnitudes are process
/// configuration, set once at startup and never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub ticker: String,
    pub name: String,
    pub base_revenue: f64,
    pub base_depreciation: f64,
    pub shares_outstanding: f64,
    pub current_share_price: f64,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        // Illustrative entity used by the dashboard
        CompanyProfile {
            ticker: "AAPL".to_string(),
            name: "Apple".to_string(),
            base_revenue: 1_000_000_000.0,
            base_depreciation: 50_000_000.0,
            shares_outstanding: 100_000_000.0,
            current_share_price: 45.0,
        }
    }
}

impl CompanyProfile {
    /// Build the profile from COMPANY_* environment variables, falling back
    /// to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = CompanyProfile::default();
        CompanyProfile {
            ticker: env::var("COMPANY_TICKER").unwrap_or(defaults.ticker),
            name: env::var("COMPANY_NAME").unwrap_or(defaults.name),
            base_revenue: env_f64("COMPANY_BASE_REVENUE", defaults.base_revenue),
            base_depreciation: env_f64("COMPANY_BASE_DEPRECIATION", defaults.base_depreciation),
            shares_outstanding: env_f64("COMPANY_SHARES_OUTSTANDING", defaults.shares_outstanding),
            current_share_price: env_f64("COMPANY_SHARE_PRICE", defaults.current_share_price),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("${} is not a number, defaulting to {}", key, default);
            default
        }),
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub year: u32,
    pub revenue: f64,
    pub operating_profit: f64,
    pub taxes: f64,
    pub nopat: f64,
    pub depreciation: f64,
    pub capex: f64,
    pub working_capital_change: f64,
    pub free_cash_flow: f64,
    pub present_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub assumptions: DcfAssumptions,
    pub projections: Vec<YearlyProjection>,
    pub terminal_value: f64,
    pub present_value_terminal_value: f64,
    pub total_present_value: f64,
    pub enterprise_value: f64,
    pub shares_outstanding: f64,
    pub fair_value_per_share: f64,
}

/// A named, independently editable assumption set with its last-computed
/// fair value. Scenarios live in the in-memory store only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: Uuid,
    pub name: String,
    pub assumptions: DcfAssumptions,
    pub fair_value_per_share: f64,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /api/v1/valuation: the assumptions and terminal-value
/// settings in one flat object, as the frontend sends them.
#[derive(Debug, Clone, Deserialize)]
pub struct ValuationRequest {
    #[serde(flatten)]
    pub assumptions: DcfAssumptions,
    #[serde(flatten)]
    pub terminal: TerminalValueSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateScenarioRequest {
    pub name: Option<String>,
    pub assumptions: Option<DcfAssumptions>,
    #[serde(flatten)]
    pub terminal: TerminalValueSpec,
}

/// Partial update of a scenario: any subset of the name and the seven
/// assumption fields, plus the terminal settings to revalue under.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScenarioPatch {
    pub name: Option<String>,
    #[serde(rename = "revenueGrowthCAGR")]
    pub revenue_growth_cagr: Option<f64>,
    pub operating_profit_margin: Option<f64>,
    pub discount_rate: Option<f64>,
    pub capex_intensity: Option<f64>,
    pub working_capital_intensity: Option<f64>,
    pub tax_rate: Option<f64>,
    pub terminal_growth_rate: Option<f64>,
    #[serde(flatten)]
    pub terminal: TerminalValueSpec,
}
