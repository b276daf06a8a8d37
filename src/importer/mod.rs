// ==========================================
// 货舱 ULD 配载系统 - 导入层
// ==========================================
// 职责: 外部装载清单导入, 经会话 API 生成装载记录
// 支持: CSV
// ==========================================

pub mod error;
pub mod load_sheet;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use load_sheet::{ImportReport, LoadSheetImporter, LoadSheetRow, RowAdvisory, RowRejection};
