// ==========================================
// 货舱 ULD 配载系统 - 装载记录
// ==========================================
// 职责: 单个装载记录 (Load) 与字段修改请求 (LoadEdit)
// 红线: 字段修改只能经过 PlacementValidator
// ==========================================

use crate::domain::types::{BulkSubtype, UldType};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// LoadId - 装载记录ID
// ==========================================
// 创建时分配, 单调递增, 不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(pub u64);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// Load - 装载记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Load {
    pub id: LoadId,
    pub uld_type: UldType,
    /// 大写; 空串表示占位记录
    pub uld_id: String,
    pub bulk_subtype: BulkSubtype,
    /// 公斤; FKT 时恒为 0
    pub weight: u32,
    /// 空串表示未放置
    pub position: String,
}

impl Load {
    /// 新建空记录（AKE / BY / 未放置）
    pub fn new(id: LoadId) -> Self {
        Self {
            id,
            uld_type: UldType::Ake,
            uld_id: String::new(),
            bulk_subtype: BulkSubtype::By,
            weight: 0,
            position: String::new(),
        }
    }

    pub fn is_placed(&self) -> bool {
        !self.position.is_empty()
    }

    /// 已指定 ULD 编号
    pub fn is_identified(&self) -> bool {
        !self.uld_id.is_empty()
    }

    /// 已放置且已指定编号: 该舱位被"占用", 参与互斥
    pub fn claims_position(&self) -> bool {
        self.is_placed() && self.is_identified()
    }

    /// 在报文中携带信息（非 `-POS/X` 占位）
    pub fn is_informative(&self) -> bool {
        self.bulk_subtype.is_fkt() || self.uld_type.is_bulk() || self.is_identified()
    }

    /// 当前可编辑字段
    pub fn field_locks(&self) -> FieldLocks {
        FieldLocks {
            identity_editable: !self.uld_type.is_bulk(),
            weight_editable: !self.bulk_subtype.is_fkt(),
        }
    }
}

// ==========================================
// FieldLocks - 字段可编辑性
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocks {
    /// BLK 不录入 ULD 编号
    pub identity_editable: bool,
    /// FKT 不录入重量
    pub weight_editable: bool,
}

// ==========================================
// LoadEdit - 字段修改请求
// ==========================================
// None 表示不修改该字段; position = Some("") 表示取消放置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadEdit {
    #[serde(default)]
    pub uld_type: Option<UldType>,
    #[serde(default)]
    pub uld_id: Option<String>,
    #[serde(default)]
    pub bulk_subtype: Option<BulkSubtype>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub position: Option<String>,
}

impl LoadEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uld_type(mut self, uld_type: UldType) -> Self {
        self.uld_type = Some(uld_type);
        self
    }

    pub fn uld_id(mut self, uld_id: impl Into<String>) -> Self {
        self.uld_id = Some(uld_id.into());
        self
    }

    pub fn bulk_subtype(mut self, bulk_subtype: BulkSubtype) -> Self {
        self.bulk_subtype = Some(bulk_subtype);
        self
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// 取消放置
    pub fn unplace(mut self) -> Self {
        self.position = Some(String::new());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.uld_type.is_none()
            && self.uld_id.is_none()
            && self.bulk_subtype.is_none()
            && self.weight.is_none()
            && self.position.is_none()
    }
}
