// ==========================================
// 货舱 ULD 配载系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的配置、档案目录与会话实例
// ==========================================

use std::path::Path;
use tracing::info;

use crate::api::{ApiError, ApiResult, LoadPlanApi};
use crate::config::config_manager::ConfigManager;
use crate::config::profile_catalog::ProfileCatalog;
use crate::domain::profile::AircraftProfile;
use crate::importer::{ImportReport, ImportResult, LoadSheetImporter};

/// 应用状态
///
/// 启动时装载内置档案与配置中列出的档案文件
#[derive(Debug)]
pub struct AppState {
    /// 站点配置
    pub config: ConfigManager,

    /// 机型档案目录
    pub catalog: ProfileCatalog,

    /// 配载会话
    pub session: LoadPlanApi,

    /// 装载清单导入器
    pub importer: LoadSheetImporter,
}

impl AppState {
    /// 从已加载的配置创建
    pub fn new(config: ConfigManager) -> ApiResult<Self> {
        let mut catalog = ProfileCatalog::with_builtins()?;
        for path in config.profile_file_paths() {
            catalog.load_file(&path)?;
        }

        info!(
            profiles = catalog.len(),
            origin_code = %config.config().origin_code,
            "应用状态初始化完成"
        );

        let session = LoadPlanApi::new(config.config().clone());
        Ok(Self {
            config,
            catalog,
            session,
            importer: LoadSheetImporter::new(),
        })
    }

    /// 按 显式路径 → 环境变量 → 用户配置目录 加载配置后创建
    pub fn from_config_path(explicit: Option<&Path>) -> ApiResult<Self> {
        Self::new(ConfigManager::load_or_default(explicit)?)
    }

    /// 按注册号选择机型档案（会清空当前记录）
    pub fn select_profile(&mut self, registration: &str) -> ApiResult<&AircraftProfile> {
        let profile = self
            .catalog
            .find(registration)
            .cloned()
            .ok_or_else(|| ApiError::ProfileNotFound(registration.trim().to_uppercase()))?;

        self.session.load_profile(profile);
        self.session.profile().ok_or(ApiError::NoProfile)
    }

    /// 导入装载清单到当前会话
    pub fn import_load_sheet(&mut self, path: &Path) -> ImportResult<ImportReport> {
        self.importer.import_file(&mut self.session, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_manager::StationConfig;

    fn state() -> AppState {
        AppState::new(ConfigManager::new(StationConfig::default()).unwrap()).unwrap()
    }

    #[test]
    fn test_builtin_profile_selectable() {
        let mut state = state();
        let profile = state.select_profile("ec-nog").unwrap();
        assert_eq!(profile.registration(), "EC-NOG");
        assert!(state.session.create_load().is_ok());
    }

    #[test]
    fn test_unknown_registration() {
        let mut state = state();
        let err = state.select_profile("EC-ZZZ").unwrap_err();
        assert!(matches!(err, ApiError::ProfileNotFound(ref r) if r == "EC-ZZZ"));
        assert!(state.session.profile().is_none());
    }
}
