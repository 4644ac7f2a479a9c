// ==========================================
// Agro Asociados - configuration layer
// ==========================================
// Storage: config_kv table, defaults fixed in code
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::{config_keys, defaults, ConfigManager};
pub use import_config_trait::ImportConfigReader;
