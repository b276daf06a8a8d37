// ==========================================
// 货舱 ULD 配载系统 - 应用层
// ==========================================
// 职责: 组装配置、机型档案目录与配载会话, 供命令行入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
