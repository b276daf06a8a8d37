// ==========================================
// 货舱 ULD 配载系统 - 引擎层
// ==========================================
// 职责: 舱位互斥计算 / 放置校验 / CPM 报文生成
// 红线: 引擎无状态, 不持有装载记录; 所有拒绝必须输出原因
// ==========================================

pub mod blocking;
pub mod manifest;
pub mod placement;

// 重导出核心引擎
pub use blocking::BlockingEngine;
pub use manifest::{CpmManifest, ManifestFormatter, ManifestLine, ManifestRequest};
pub use placement::{
    Advisory, DuplicateIdentity, EditDecision, LoadField, PlacementValidator, ReadinessIssue,
    ReadinessReason, RejectionReason,
};
