use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    default_bills, Bill, CreateBill, EarningsSummary, PlannerSettings, UpdateBill, UpdateGoals, DEFAULT_CURRENCY,
    DEFAULT_OFF_DAYS, DEFAULT_PROFIT, DEFAULT_SAVINGS,
};
use crate::services::{currency_service, earnings_service};
use crate::store::SettingsStore;

pub const KEY_BILLS: &str = "bills";
pub const KEY_PROFIT: &str = "profit";
pub const KEY_SAVINGS: &str = "savings";
pub const KEY_OFF_DAYS: &str = "offDays";
pub const KEY_CURRENCY: &str = "currency";

const ALL_KEYS: [&str; 5] = [KEY_BILLS, KEY_PROFIT, KEY_SAVINGS, KEY_OFF_DAYS, KEY_CURRENCY];

/// Owns the persisted planner state.
///
/// Every mutation is a read-modify-write of one or more keys, so writes are
/// serialized through `write_lock`.
pub struct PlannerService {
    store: Arc<dyn SettingsStore>,
    write_lock: Mutex<()>,
}

impl PlannerService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the planner; any key that is missing or unreadable takes its default.
    pub async fn load(&self) -> Result<PlannerSettings, AppError> {
        let (bills, profit, savings, off_days, mut currency): (Vec<Bill>, f64, f64, u32, String) = futures::try_join!(
            self.read_key(KEY_BILLS, default_bills),
            self.read_key(KEY_PROFIT, || DEFAULT_PROFIT),
            self.read_key(KEY_SAVINGS, || DEFAULT_SAVINGS),
            self.read_key(KEY_OFF_DAYS, || DEFAULT_OFF_DAYS),
            self.read_key(KEY_CURRENCY, || DEFAULT_CURRENCY.to_string())
        )?;

        if !currency_service::is_supported(&currency) {
            warn!("Stored currency '{}' is not supported, using {}", currency, DEFAULT_CURRENCY);
            currency = DEFAULT_CURRENCY.to_string();
        }

        Ok(PlannerSettings {
            bills,
            profit,
            savings,
            off_days,
            currency,
        })
    }

    /// Replaces the whole planner. Values are clamped for the month of `today`.
    pub async fn replace(&self, settings: PlannerSettings, today: NaiveDate) -> Result<PlannerSettings, AppError> {
        validate_currency(&settings.currency)?;
        let settings = normalize(settings).sanitized(earnings_service::days_in_month(today));

        let _guard = self.write_lock.lock().await;
        self.write_all(&settings).await?;
        info!("Planner replaced ({} bills)", settings.bills.len());
        Ok(settings)
    }

    /// Forgets everything stored and returns the defaults.
    pub async fn reset(&self) -> Result<PlannerSettings, AppError> {
        let _guard = self.write_lock.lock().await;
        for key in ALL_KEYS {
            self.store.remove(key).await?;
        }
        info!("Planner reset to defaults");
        Ok(PlannerSettings::default())
    }

    pub async fn add_bill(&self, data: CreateBill) -> Result<Bill, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut bills = self.load().await?.bills;
        let bill = Bill::from(data);
        bills.push(bill.clone());
        self.write_key(KEY_BILLS, &bills).await?;
        info!("Added bill {}", bill.id);
        Ok(bill)
    }

    pub async fn update_bill(&self, id: Uuid, update: UpdateBill) -> Result<Bill, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut bills = self.load().await?.bills;
        let bill = bills.iter_mut().find(|b| b.id == id).ok_or(AppError::NotFound)?;
        update.apply(bill);
        let updated = bill.clone();
        self.write_key(KEY_BILLS, &bills).await?;
        Ok(updated)
    }

    pub async fn remove_bill(&self, id: Uuid) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut bills = self.load().await?.bills;
        let before = bills.len();
        bills.retain(|b| b.id != id);
        if bills.len() == before {
            return Err(AppError::NotFound);
        }
        self.write_key(KEY_BILLS, &bills).await?;
        info!("Removed bill {}", id);
        Ok(())
    }

    /// Applies the provided goal fields; off-days are clamped to the month of `today`.
    pub async fn update_goals(&self, update: UpdateGoals, today: NaiveDate) -> Result<PlannerSettings, AppError> {
        if let Some(code) = &update.currency {
            validate_currency(code)?;
        }

        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await?;

        if let Some(profit) = update.profit {
            settings.profit = profit;
        }
        if let Some(savings) = update.savings {
            settings.savings = savings;
        }
        if let Some(off_days) = update.off_days {
            let (clamped, _) = earnings_service::working_days(earnings_service::days_in_month(today), off_days);
            settings.off_days = clamped;
        }
        if let Some(code) = update.currency {
            settings.currency = code.trim().to_ascii_uppercase();
        }

        let settings = settings.sanitized(earnings_service::days_in_month(today));
        self.write_key(KEY_PROFIT, &settings.profit).await?;
        self.write_key(KEY_SAVINGS, &settings.savings).await?;
        self.write_key(KEY_OFF_DAYS, &settings.off_days).await?;
        self.write_key(KEY_CURRENCY, &settings.currency).await?;
        Ok(settings)
    }

    pub async fn summary(&self, today: NaiveDate) -> Result<EarningsSummary, AppError> {
        let settings = self.load().await?;
        Ok(earnings_service::summarize_settings(&settings, today))
    }

    async fn read_key<T, F>(&self, key: &str, default: F) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.store.get(key).await? {
            None => Ok(default()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(value),
                Err(e) => {
                    warn!("Ignoring unreadable setting '{}': {}", key, e);
                    Ok(default())
                }
            },
        }
    }

    async fn write_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let encoded = serde_json::to_string(value).map_err(crate::errors::StoreError::from)?;
        self.store.put(key, &encoded).await?;
        Ok(())
    }

    async fn write_all(&self, settings: &PlannerSettings) -> Result<(), AppError> {
        self.write_key(KEY_BILLS, &settings.bills).await?;
        self.write_key(KEY_PROFIT, &settings.profit).await?;
        self.write_key(KEY_SAVINGS, &settings.savings).await?;
        self.write_key(KEY_OFF_DAYS, &settings.off_days).await?;
        self.write_key(KEY_CURRENCY, &settings.currency).await?;
        Ok(())
    }
}

fn validate_currency(code: &str) -> Result<(), AppError> {
    if currency_service::is_supported(code) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Unsupported currency: {}", code)))
    }
}

fn normalize(mut settings: PlannerSettings) -> PlannerSettings {
    settings.currency = settings.currency.trim().to_ascii_uppercase();
    settings
}
