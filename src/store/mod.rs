mod settings_store;

pub use settings_store::{MemorySettingsStore, PgSettingsStore, SettingsStore};
