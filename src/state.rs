use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::services::advice_service::AdviceService;
use crate::services::llm_service::LlmService;
use crate::services::planner_service::PlannerService;
use crate::store::SettingsStore;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<PlannerService>,
    pub advice: Arc<AdviceService>,
    pub store_kind: &'static str,
    /// Pins "today" for reproducible month calculations.
    pub fixed_date: Option<NaiveDate>,
}

impl AppState {
    pub fn new(store: Arc<dyn SettingsStore>, store_kind: &'static str, llm: Arc<LlmService>) -> Self {
        Self {
            planner: Arc::new(PlannerService::new(store)),
            advice: Arc::new(AdviceService::new(llm)),
            store_kind,
            fixed_date: None,
        }
    }

    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_date.unwrap_or_else(|| Local::now().date_naive())
    }
}
