// ==========================================
// 货舱 ULD 配载系统 - 核心库
// ==========================================
// 职责: 机型档案 / 舱位互斥 / 放置校验 / CPM 报文生成
// 系统定位: 配载辅助 (操作员最终控制权, 编号重复仅提示)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 档案与装载记录
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部装载清单
pub mod importer;

// 配置层 - 站点配置与档案目录
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 配载会话
pub mod api;

// 应用层 - 命令行集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BulkSubtype, SlotClass, UldType};

// 领域实体
pub use domain::{AircraftProfile, Load, LoadEdit, LoadId, ProfileDefinition};

// 引擎
pub use engine::{
    Advisory, BlockingEngine, CpmManifest, ManifestFormatter, PlacementValidator,
    RejectionReason,
};

// API
pub use api::{ApiError, ApiResult, EditOutcome, LoadPlanApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "货舱 ULD 配载系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
