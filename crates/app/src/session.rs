use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use frost_core::{
    FilterInputs, FilterSpec, GrowthRates, HORIZONS, PredictionInput, Projection, ResourceKind,
    TimeRange, project,
};

use crate::error::{AppError, Result};

const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Where a session is in the submit → predict flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NoFilter,
    FilterSubmitted,
    PredictionGenerated,
}

/// One user's dashboard state. Every mutation goes through a method here so
/// the phase stays consistent with the data it guards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_per_credit: f64,
    /// Form fields, as typed or as loaded from a preset.
    pub inputs: FilterInputs,
    /// Filter in effect once submitted; `None` means all data.
    pub filter: Option<FilterSpec>,
    pub selected_tag: Option<String>,
    pub selected_preset: Option<String>,
    pub prediction: Option<PredictionInput>,
    pub growth_rates: GrowthRates,
}

impl SessionState {
    pub fn new(today: NaiveDate, price_per_credit: f64) -> Self {
        Self {
            phase: SessionPhase::NoFilter,
            start_date: today - Duration::days(DEFAULT_LOOKBACK_DAYS),
            end_date: today,
            price_per_credit,
            inputs: FilterInputs::default(),
            filter: None,
            selected_tag: None,
            selected_preset: None,
            prediction: None,
            growth_rates: GrowthRates::default(),
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::from_dates(self.start_date, self.end_date)
    }

    pub fn is_submitted(&self) -> bool {
        self.phase != SessionPhase::NoFilter
    }

    /// The filter to query with, or an error before anything was submitted.
    pub fn active_filter(&self) -> Result<Option<&FilterSpec>> {
        if !self.is_submitted() {
            return Err(AppError::InvalidInput(
                "submit resources or a tag, or query all data, first".to_string(),
            ));
        }
        Ok(self.filter.as_ref())
    }

    pub fn tag_message(&self) -> String {
        match self.selected_tag.as_deref() {
            Some(tag) => format!("Data filtered by tag: {}", tag),
            None => "No tag filter applied.".to_string(),
        }
    }

    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        if start > end {
            return Err(AppError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        self.start_date = start;
        self.end_date = end;
        Ok(())
    }

    pub fn set_price(&mut self, price_per_credit: f64) -> Result<()> {
        if !price_per_credit.is_finite() || price_per_credit < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "price per credit must be a non-negative number, got {}",
                price_per_credit
            )));
        }
        self.price_per_credit = price_per_credit;
        Ok(())
    }

    /// Drops every name and tag predicate.
    pub fn query_all(&mut self) {
        self.filter = None;
        self.selected_tag = None;
        self.selected_preset = None;
        self.enter_submitted();
    }

    /// Records the chosen tag; the current filter stays as it is.
    pub fn submit_tag(&mut self, tag: Option<&str>) {
        self.selected_tag = tag
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string);
        self.enter_submitted();
    }

    /// Copies a saved preset into the form without submitting it.
    pub fn load_preset(&mut self, name: &str, inputs: FilterInputs) {
        self.selected_tag = inputs.selected_tag.clone();
        self.inputs = inputs;
        self.selected_preset = Some(name.to_string());
    }

    /// Applies form inputs saved under `name` as the active filter.
    pub fn submit_filter(&mut self, name: &str, inputs: FilterInputs) {
        self.filter = Some(FilterSpec::from_inputs(&inputs));
        self.inputs = inputs;
        self.selected_preset = Some(name.to_string());
        self.enter_submitted();
    }

    pub fn record_prediction(&mut self, prediction: PredictionInput) -> Result<()> {
        self.active_filter()?;
        self.prediction = Some(prediction);
        self.phase = SessionPhase::PredictionGenerated;
        Ok(())
    }

    pub fn set_growth_rate(&mut self, kind: ResourceKind, percent: f64) -> Result<()> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "growth rate for {} must be a non-negative number, got {}",
                kind, percent
            )));
        }
        self.growth_rates.set(kind, percent);
        Ok(())
    }

    pub fn projection(&self) -> Result<Projection> {
        let prediction = self.prediction.as_ref().ok_or_else(|| {
            AppError::InvalidInput("generate a prediction first".to_string())
        })?;
        Ok(project(prediction, &self.growth_rates, &HORIZONS))
    }

    // A new filter invalidates the cost snapshot taken under the old one.
    fn enter_submitted(&mut self) {
        self.prediction = None;
        self.phase = SessionPhase::FilterSubmitted;
    }
}

struct SessionSlot {
    state: SessionState,
    last_seen: Instant,
}

type SharedSlot = Arc<Mutex<SessionSlot>>;

fn lock_slot(slot: &SharedSlot) -> MutexGuard<'_, SessionSlot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory sessions keyed by an opaque id.
///
/// Each session has its own lock: updates to one session run one at a time,
/// while different sessions never wait on each other.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, SharedSlot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SharedSlot>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn slot(&self, id: &str) -> Result<SharedSlot> {
        self.sessions()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("session {} not found", id)))
    }

    pub fn insert(&self, id: &str, state: SessionState) {
        let slot = SessionSlot {
            state,
            last_seen: Instant::now(),
        };
        self.sessions()
            .insert(id.to_string(), Arc::new(Mutex::new(slot)));
    }

    pub fn get(&self, id: &str) -> Result<SessionState> {
        let shared = self.slot(id)?;
        let mut slot = lock_slot(&shared);
        slot.last_seen = Instant::now();
        Ok(slot.state.clone())
    }

    /// Runs `apply` against a copy of the session and keeps the result only
    /// when it succeeds, so a failed action leaves the session untouched.
    /// The session stays locked while `apply` runs.
    pub fn update<T>(
        &self,
        id: &str,
        apply: impl FnOnce(&mut SessionState) -> Result<T>,
    ) -> Result<T> {
        let shared = self.slot(id)?;
        let mut slot = lock_slot(&shared);
        slot.last_seen = Instant::now();
        let mut state = slot.state.clone();
        let value = apply(&mut state)?;
        slot.state = state;
        Ok(value)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions().remove(id).is_some()
    }

    /// Drops sessions untouched for `max_idle`. A session locked by a running
    /// update counts as active. Returns how many were dropped.
    pub fn sweep_idle(&self, max_idle: std::time::Duration) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, slot| {
            slot.try_lock()
                .map(|slot| slot.last_seen.elapsed() < max_idle)
                .unwrap_or(true)
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
