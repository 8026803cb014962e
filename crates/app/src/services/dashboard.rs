use std::collections::BTreeMap;

use serde::Serialize;

use frost_core::{
    FilterSpec, GrowthRates, HORIZONS, PredictionInput, Projection, ResourceKind, Table,
    TimeRange, UsageReport, project, summarize,
};

use crate::error::Result;
use crate::services::UsageService;
use crate::session::SessionState;

/// Summary payload for the consumption view of one session.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionReport {
    pub tag_message: String,
    pub range: TimeRange,
    pub report: UsageReport,
}

/// Report plus projection for a one-shot, sessionless run.
#[derive(Debug, Clone, Serialize)]
pub struct UsageOverview {
    pub report: UsageReport,
    pub projection: Projection,
}

#[derive(Clone)]
pub struct DashboardService {
    usage: UsageService,
}

impl DashboardService {
    pub(super) fn new(usage: UsageService) -> Self {
        Self { usage }
    }

    pub fn report(
        &self,
        filter: Option<&FilterSpec>,
        range: &TimeRange,
        price_per_credit: f64,
    ) -> Result<UsageReport> {
        let tables: BTreeMap<ResourceKind, Table> = self.usage.fetch_all(filter, range)?;
        Ok(summarize(&tables, price_per_credit))
    }

    pub fn consumption(&self, state: &SessionState) -> Result<ConsumptionReport> {
        let filter = state.active_filter()?;
        let range = state.range();
        let report = self.report(filter, &range, state.price_per_credit)?;
        Ok(ConsumptionReport {
            tag_message: state.tag_message(),
            range,
            report,
        })
    }

    pub fn usage_table(&self, state: &SessionState, kind: ResourceKind) -> Result<Table> {
        let filter = state.active_filter()?;
        self.usage.fetch(kind, filter, &state.range())
    }

    /// Snapshots the session's current per-kind costs and projects them.
    pub fn generate_prediction(&self, state: &mut SessionState) -> Result<Projection> {
        let consumption = self.consumption(state)?;
        state.record_prediction(PredictionInput::from_report(&consumption.report))?;
        state.projection()
    }

    pub fn overview(
        &self,
        filter: Option<&FilterSpec>,
        range: &TimeRange,
        price_per_credit: f64,
        rates: &GrowthRates,
    ) -> Result<UsageOverview> {
        let report = self.report(filter, range, price_per_credit)?;
        let projection = project(&PredictionInput::from_report(&report), rates, &HORIZONS);
        Ok(UsageOverview { report, projection })
    }
}
