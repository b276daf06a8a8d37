// ==========================================
// 货舱 ULD 配载系统 - API 层
// ==========================================
// 职责: 提供配载会话接口, 供命令行/界面调用
// ==========================================

pub mod error;
pub mod load_plan_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use load_plan_api::{EditOutcome, LoadPlanApi};
