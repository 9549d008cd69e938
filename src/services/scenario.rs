// src/services/scenario.rs
use std::fmt;

use chrono::Utc;
use log::info;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{CompanyProfile, DcfAssumptions, Scenario, ScenarioPatch, TerminalValueSpec};
use crate::services::valuation::run_valuation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteError {
    NotFound,
    LastScenario,
}

impl fmt::Display for DeleteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeleteError::NotFound => write!(f, "scenario not found"),
            DeleteError::LastScenario => write!(f, "cannot delete the last remaining scenario"),
        }
    }
}

impl std::error::Error for DeleteError {}

/// In-memory scenario store. Scenarios do not survive a restart; the store
/// is seeded with a single "Base Case" built from the default assumptions.
/// Every mutation revalues the touched scenarios through the engine so the
/// cached fair value can never go stale.
pub struct ScenarioStore {
    profile: CompanyProfile,
    scenarios: RwLock<Vec<Scenario>>,
}

impl ScenarioStore {
    pub fn new(profile: CompanyProfile) -> Self {
        let assumptions = DcfAssumptions::default();
        let fair_value_per_share =
            run_valuation(&profile, &assumptions, &TerminalValueSpec::default())
                .fair_value_per_share;
        let base_case = Scenario {
            id: Uuid::new_v4(),
            name: "Base Case".to_string(),
            assumptions,
            fair_value_per_share,
            updated_at: Utc::now(),
        };
        ScenarioStore {
            profile,
            scenarios: RwLock::new(vec![base_case]),
        }
    }

    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    /// All scenarios in insertion order.
    pub async fn list(&self) -> Vec<Scenario> {
        self.scenarios.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<Scenario> {
        self.scenarios
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Create a scenario. An omitted name becomes "Scenario N"; omitted
    /// assumptions take the defaults.
    pub async fn create(
        &self,
        name: Option<String>,
        assumptions: Option<DcfAssumptions>,
        terminal: &TerminalValueSpec,
    ) -> Scenario {
        let mut scenarios = self.scenarios.write().await;
        let assumptions = assumptions.unwrap_or_default();
        let name = name.unwrap_or_else(|| format!("Scenario {}", scenarios.len() + 1));
        let fair_value_per_share =
            run_valuation(&self.profile, &assumptions, terminal).fair_value_per_share;
        let scenario = Scenario {
            id: Uuid::new_v4(),
            name,
            assumptions,
            fair_value_per_share,
            updated_at: Utc::now(),
        };
        info!("Created scenario '{}' ({})", scenario.name, scenario.id);
        scenarios.push(scenario.clone());
        scenario
    }

    /// Apply a partial update and revalue. Returns None for an unknown id.
    pub async fn update(&self, id: Uuid, patch: &ScenarioPatch) -> Option<Scenario> {
        let mut scenarios = self.scenarios.write().await;
        let scenario = scenarios.iter_mut().find(|s| s.id == id)?;

        if let Some(name) = &patch.name {
            scenario.name = name.clone();
        }
        let assumptions = &mut scenario.assumptions;
        if let Some(value) = patch.revenue_growth_cagr {
            assumptions.revenue_growth_cagr = value;
        }
        if let Some(value) = patch.operating_profit_margin {
            assumptions.operating_profit_margin = value;
        }
        if let Some(value) = patch.discount_rate {
            assumptions.discount_rate = value;
        }
        if let Some(value) = patch.capex_intensity {
            assumptions.capex_intensity = value;
        }
        if let Some(value) = patch.working_capital_intensity {
            assumptions.working_capital_intensity = value;
        }
        if let Some(value) = patch.tax_rate {
            assumptions.tax_rate = value;
        }
        if let Some(value) = patch.terminal_growth_rate {
            assumptions.terminal_growth_rate = value;
        }

        scenario.fair_value_per_share =
            run_valuation(&self.profile, &scenario.assumptions, &patch.terminal)
                .fair_value_per_share;
        scenario.updated_at = Utc::now();
        info!("Updated scenario '{}' ({})", scenario.name, scenario.id);
        Some(scenario.clone())
    }

    /// Delete a scenario. The last remaining scenario cannot be deleted.
    pub async fn delete(&self, id: Uuid) -> Result<(), DeleteError> {
        let mut scenarios = self.scenarios.write().await;
        if !scenarios.iter().any(|s| s.id == id) {
            return Err(DeleteError::NotFound);
        }
        if scenarios.len() <= 1 {
            return Err(DeleteError::LastScenario);
        }
        scenarios.retain(|s| s.id != id);
        info!("Deleted scenario {}", id);
        Ok(())
    }

    /// Recompute every scenario's fair value under the given terminal-value
    /// settings. Called whenever the terminal method or multiple changes;
    /// a full re-evaluation is cheap at the engine's fixed cost.
    pub async fn revalue_all(&self, terminal: &TerminalValueSpec) -> Vec<Scenario> {
        let mut scenarios = self.scenarios.write().await;
        for scenario in scenarios.iter_mut() {
            scenario.fair_value_per_share =
                run_valuation(&self.profile, &scenario.assumptions, terminal)
                    .fair_value_per_share;
            scenario.updated_at = Utc::now();
        }
        info!("Revalued {} scenarios", scenarios.len());
        scenarios.clone()
    }
}
