// ==========================================
// 货舱 ULD 配载系统 - API层错误类型
// ==========================================
// 职责: 定义会话层错误类型, 汇总引擎拒绝原因与配置错误
// 红线: 所有错误信息必须包含显式原因
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::load::LoadId;
use crate::domain::profile::ProfileError;
use crate::engine::placement::{ReadinessIssue, RejectionReason};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 放置校验错误（硬拒绝, 记录保持原状）
    // ==========================================
    #[error("修改被拒绝: {0}")]
    Rejected(#[from] RejectionReason),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("导出条件不满足: {} 条记录未就绪", .issues.len())]
    NotReady { issues: Vec<ReadinessIssue> },

    // ==========================================
    // 会话状态错误
    // ==========================================
    #[error("尚未装载机型档案")]
    NoProfile,

    #[error("装载记录不存在: id={0}")]
    LoadNotFound(LoadId),

    #[error("机型档案不存在: {0}")]
    ProfileNotFound(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("机型档案无效: {0}")]
    Profile(#[from] ProfileError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误代码（用于界面文案查找）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Rejected(RejectionReason::SlotTypeMismatch { .. }) => "SLOT_TYPE_MISMATCH",
            ApiError::Rejected(RejectionReason::PositionBlocked { .. }) => "POSITION_BLOCKED",
            ApiError::Rejected(RejectionReason::PositionOccupied { .. }) => "POSITION_OCCUPIED",
            ApiError::Rejected(RejectionReason::UnknownPosition { .. }) => "UNKNOWN_POSITION",
            ApiError::NotReady { .. } => "NOT_READY",
            ApiError::NoProfile => "NO_PROFILE",
            ApiError::LoadNotFound(_) => "LOAD_NOT_FOUND",
            ApiError::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Profile(_) => "PROFILE_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// 放置校验拒绝原因
    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            ApiError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
