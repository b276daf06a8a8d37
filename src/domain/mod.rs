// ==========================================
// 货舱 ULD 配载系统 - 领域模型层
// ==========================================
// 职责: 定义机型档案、装载记录与基础类型
// 红线: 不含校验逻辑,不含报文逻辑
// ==========================================

pub mod load;
pub mod profile;
pub mod types;

// 重导出核心类型
pub use load::{FieldLocks, Load, LoadEdit, LoadId};
pub use profile::{AircraftProfile, ContainerRow, ProfileDefinition, ProfileError, BULK_POSITIONS};
pub use types::{BulkSubtype, SlotClass, UldType};
