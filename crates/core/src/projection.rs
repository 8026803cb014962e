use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::format_usd;
use crate::kind::ResourceKind;
use crate::summary::UsageReport;

/// Monthly growth percentage used until the user overrides it.
pub const DEFAULT_GROWTH_RATE: f64 = 0.5;
pub const HORIZONS: [u32; 4] = [30, 60, 90, 120];
const DAYS_PER_PERIOD: f64 = 30.0;

/// Per-kind cost snapshot captured when a prediction is generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub costs: BTreeMap<ResourceKind, f64>,
}

impl PredictionInput {
    pub fn from_report(report: &UsageReport) -> Self {
        let costs = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, report.kind_cost(kind)))
            .collect();
        Self { costs }
    }

    pub fn cost(&self, kind: ResourceKind) -> f64 {
        self.costs.get(&kind).copied().unwrap_or(0.0)
    }

    /// Kinds with something to project; only these get a growth-rate control.
    pub fn projectable_kinds(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| self.cost(*kind) > 0.0)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    rates: BTreeMap<ResourceKind, f64>,
}

impl Default for GrowthRates {
    fn default() -> Self {
        Self {
            rates: ResourceKind::ALL
                .into_iter()
                .map(|kind| (kind, DEFAULT_GROWTH_RATE))
                .collect(),
        }
    }
}

impl GrowthRates {
    pub fn rate(&self, kind: ResourceKind) -> f64 {
        self.rates
            .get(&kind)
            .copied()
            .unwrap_or(DEFAULT_GROWTH_RATE)
    }

    pub fn set(&mut self, kind: ResourceKind, percent: f64) {
        self.rates.insert(kind, percent);
    }
}

/// `current × (1 + rate/100) ^ (days / 30)`, with fractional periods allowed.
pub fn projected_cost(current_cost: f64, growth_rate: f64, horizon_days: u32) -> f64 {
    let periods = f64::from(horizon_days) / DAYS_PER_PERIOD;
    current_cost * (1.0 + growth_rate / 100.0).powf(periods)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonCost {
    pub days: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub kind: ResourceKind,
    pub growth_rate: f64,
    pub current_cost: f64,
    pub projected: Vec<HorizonCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTotals {
    pub current_cost: f64,
    pub projected: Vec<HorizonCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub rows: Vec<ProjectionRow>,
    pub totals: ProjectionTotals,
}

pub fn project(inputs: &PredictionInput, rates: &GrowthRates, horizons: &[u32]) -> Projection {
    let mut totals = ProjectionTotals {
        current_cost: 0.0,
        projected: horizons
            .iter()
            .map(|days| HorizonCost {
                days: *days,
                cost: 0.0,
            })
            .collect(),
    };
    let mut rows = Vec::new();
    for kind in inputs.projectable_kinds() {
        let current_cost = inputs.cost(kind);
        let growth_rate = rates.rate(kind);
        let projected: Vec<HorizonCost> = horizons
            .iter()
            .map(|days| HorizonCost {
                days: *days,
                cost: projected_cost(current_cost, growth_rate, *days),
            })
            .collect();
        totals.current_cost += current_cost;
        for (total, horizon) in totals.projected.iter_mut().zip(&projected) {
            total.cost += horizon.cost;
        }
        rows.push(ProjectionRow {
            kind,
            growth_rate,
            current_cost,
            projected,
        });
    }
    Projection { rows, totals }
}

/// One formatted line of the cost projection receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub section: String,
    pub current_cost: String,
    pub horizons: BTreeMap<u32, String>,
}

impl Projection {
    pub fn receipt(&self) -> Vec<ReceiptLine> {
        let line = |section: &str, current: f64, projected: &[HorizonCost]| ReceiptLine {
            section: section.to_string(),
            current_cost: format_usd(current),
            horizons: projected
                .iter()
                .map(|horizon| (horizon.days, format_usd(horizon.cost)))
                .collect(),
        };
        let mut lines: Vec<ReceiptLine> = self
            .rows
            .iter()
            .map(|row| line(row.kind.display_name(), row.current_cost, &row.projected))
            .collect();
        lines.push(line(
            "Total",
            self.totals.current_cost,
            &self.totals.projected,
        ));
        lines
    }
}
