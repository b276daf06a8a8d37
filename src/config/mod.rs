// ==========================================
// 货舱 ULD 配载系统 - 配置层
// ==========================================
// 职责: 站点配置 + 机型档案目录
// 存储: JSON 文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod profile_catalog;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager, StationConfig, CONFIG_PATH_ENV};
pub use error::ConfigError;
pub use profile_catalog::{ec_nog_definition, ProfileCatalog};
