// ==========================================
// 货舱 ULD 配载系统 - 放置校验器
// ==========================================
// 职责: 装载记录字段修改的唯一入口
// 红线: 舱位类型不匹配 / 舱位互斥 / 舱位已占用 → 硬拒绝
// 红线: ULD 编号重复 → 仅提示, 不拒绝
// 红线: 拒绝时记录保持原状（单次修改为原子操作）
// ==========================================
// 字段联动（见 FIELD_TRANSITIONS）:
// - 更换 ULD 类型 → 清空舱位（同次修改指定了舱位除外）
// - ULD 类型为 BLK → 清空并锁定 ULD 编号
// - 散货子类型为 FKT → 重量归零并锁定
// ==========================================

use crate::domain::load::{Load, LoadEdit, LoadId};
use crate::domain::profile::AircraftProfile;
use crate::domain::types::{SlotClass, UldType};
use crate::engine::blocking::BlockingEngine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

// ==========================================
// RejectionReason - 拒绝原因
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    #[error("舱位类型不匹配: {uld_type} 不能放置于 {position} ({slot_class})")]
    SlotTypeMismatch {
        uld_type: UldType,
        position: String,
        slot_class: SlotClass,
    },

    #[error("舱位 {position} 已被互斥: 占用方 {blocked_by:?}")]
    PositionBlocked {
        position: String,
        blocked_by: Vec<String>,
    },

    #[error("舱位 {position} 已被记录 {occupant} 使用")]
    PositionOccupied { position: String, occupant: LoadId },

    #[error("未知舱位: {position}")]
    UnknownPosition { position: String },
}

// ==========================================
// LoadField - 记录字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadField {
    UldType,
    UldId,
    BulkSubtype,
    Weight,
    Position,
}

impl fmt::Display for LoadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadField::UldType => write!(f, "ULD_TYPE"),
            LoadField::UldId => write!(f, "ULD_ID"),
            LoadField::BulkSubtype => write!(f, "BULK_SUBTYPE"),
            LoadField::Weight => write!(f, "WEIGHT"),
            LoadField::Position => write!(f, "POSITION"),
        }
    }
}

// ==========================================
// DuplicateIdentity / Advisory - 提示信息
// ==========================================

/// 同一 (类型, 编号) 出现在多条记录中
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateIdentity {
    pub uld_type: UldType,
    pub uld_id: String,
    pub load_ids: Vec<LoadId>,
}

/// 不阻断修改的提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Advisory {
    /// ULD 编号重复（允许暂存, 由操作员处理）
    DuplicateIdentity(DuplicateIdentity),
    /// 字段被锁定, 本次提交的值已忽略
    LockedFieldIgnored { field: LoadField },
}

// ==========================================
// 字段联动表
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// ULD 类型变化且本次未指定舱位
    UldTypeChangedUnplaced,
    /// ULD 类型为 BLK
    UldTypeIsBulk,
    /// 散货子类型为 FKT
    BulkSubtypeIsFkt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    ResetPosition,
    ClearIdentity,
    ZeroWeight,
}

const FIELD_TRANSITIONS: &[(Trigger, Effect)] = &[
    (Trigger::UldTypeChangedUnplaced, Effect::ResetPosition),
    (Trigger::UldTypeIsBulk, Effect::ClearIdentity),
    (Trigger::BulkSubtypeIsFkt, Effect::ZeroWeight),
];

struct EditContext {
    type_changed: bool,
    position_proposed: bool,
}

impl Trigger {
    fn fires(&self, ctx: &EditContext, candidate: &Load) -> bool {
        match self {
            Trigger::UldTypeChangedUnplaced => ctx.type_changed && !ctx.position_proposed,
            Trigger::UldTypeIsBulk => candidate.uld_type.is_bulk(),
            Trigger::BulkSubtypeIsFkt => candidate.bulk_subtype.is_fkt(),
        }
    }
}

// ==========================================
// EditDecision - 校验通过的修改结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDecision {
    /// 修改后的记录（尚未提交）
    pub load: Load,
    /// 因锁定被忽略的字段
    pub ignored_fields: Vec<LoadField>,
}

// ==========================================
// ReadinessIssue - 导出前置条件
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessReason {
    /// 未放置
    NotPlaced,
    /// BLK 未填重量
    MissingBulkWeight,
}

impl ReadinessReason {
    pub fn code(&self) -> &'static str {
        match self {
            ReadinessReason::NotPlaced => "NOT_PLACED",
            ReadinessReason::MissingBulkWeight => "MISSING_BULK_WEIGHT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessIssue {
    pub load_id: LoadId,
    pub reason: ReadinessReason,
}

// ==========================================
// PlacementValidator - 放置校验器
// ==========================================
#[derive(Debug)]
pub struct PlacementValidator {
    blocking: BlockingEngine,
}

impl PlacementValidator {
    pub fn new() -> Self {
        Self {
            blocking: BlockingEngine::new(),
        }
    }

    /// 校验并生成修改后的记录
    ///
    /// # 参数
    /// - `loads`: 当前全部记录（含 current）
    /// - `current`: 被修改的记录
    /// - `edit`: 本次提交的字段
    ///
    /// # 返回
    /// - Ok(EditDecision): 校验通过, 由调用方提交
    /// - Err(RejectionReason): 拒绝, 记录保持原状
    ///
    /// # 舱位重新校验时机
    /// 舱位非空, 且本次修改改变了舱位、改变了 ULD 类型, 或使占位记录获得了编号
    pub fn apply_edit(
        &self,
        loads: &[Load],
        profile: &AircraftProfile,
        current: &Load,
        edit: &LoadEdit,
    ) -> Result<EditDecision, RejectionReason> {
        let mut candidate = current.clone();
        let mut ignored_fields = Vec::new();

        let ctx = EditContext {
            type_changed: edit.uld_type.is_some_and(|t| t != current.uld_type),
            position_proposed: edit.position.is_some(),
        };

        if let Some(uld_type) = edit.uld_type {
            candidate.uld_type = uld_type;
        }
        if let Some(bulk_subtype) = edit.bulk_subtype {
            candidate.bulk_subtype = bulk_subtype;
        }
        if let Some(uld_id) = &edit.uld_id {
            candidate.uld_id = uld_id.trim().to_uppercase();
        }
        if let Some(weight) = edit.weight {
            candidate.weight = weight;
        }
        if let Some(position) = &edit.position {
            candidate.position = position.trim().to_uppercase();
        }

        for (trigger, effect) in FIELD_TRANSITIONS {
            if !trigger.fires(&ctx, &candidate) {
                continue;
            }
            match effect {
                Effect::ResetPosition => candidate.position.clear(),
                Effect::ClearIdentity => {
                    if edit.uld_id.as_deref().is_some_and(|id| !id.trim().is_empty()) {
                        ignored_fields.push(LoadField::UldId);
                    }
                    candidate.uld_id.clear();
                }
                Effect::ZeroWeight => {
                    if edit.weight.is_some_and(|w| w > 0) {
                        ignored_fields.push(LoadField::Weight);
                    }
                    candidate.weight = 0;
                }
            }
        }

        let needs_position_check = candidate.is_placed()
            && (candidate.position != current.position
                || candidate.uld_type != current.uld_type
                || (!current.is_identified() && candidate.is_identified()));

        if needs_position_check {
            if let Err(reason) = self.check_position(loads, profile, &candidate) {
                warn!(
                    load_id = %current.id,
                    position = %candidate.position,
                    uld_type = %candidate.uld_type,
                    reason = %reason,
                    "修改被拒绝, 记录保持原状"
                );
                return Err(reason);
            }
        }

        for field in &ignored_fields {
            warn!(load_id = %current.id, field = %field, "字段已锁定, 提交值被忽略");
        }

        debug!(
            load_id = %candidate.id,
            uld_type = %candidate.uld_type,
            uld_id = %candidate.uld_id,
            bulk = %candidate.bulk_subtype,
            weight = candidate.weight,
            position = %candidate.position,
            "修改校验通过"
        );

        Ok(EditDecision {
            load: candidate,
            ignored_fields,
        })
    }

    /// 舱位校验: 未知舱位 → 类型匹配 → 占用 → 互斥
    fn check_position(
        &self,
        loads: &[Load],
        profile: &AircraftProfile,
        candidate: &Load,
    ) -> Result<(), RejectionReason> {
        let position = candidate.position.as_str();

        let slot_class = profile
            .slot_class_of(position)
            .ok_or_else(|| RejectionReason::UnknownPosition {
                position: position.to_string(),
            })?;

        if slot_class != candidate.uld_type.slot_class() {
            return Err(RejectionReason::SlotTypeMismatch {
                uld_type: candidate.uld_type,
                position: position.to_string(),
                slot_class,
            });
        }

        if let Some(occupant) = loads
            .iter()
            .find(|l| l.id != candidate.id && l.position == position)
        {
            return Err(RejectionReason::PositionOccupied {
                position: position.to_string(),
                occupant: occupant.id,
            });
        }

        if self
            .blocking
            .is_blocked(position, loads, profile, Some(candidate.id))
        {
            return Err(RejectionReason::PositionBlocked {
                position: position.to_string(),
                blocked_by: blocking_sources(loads, profile, candidate.id, position),
            });
        }

        Ok(())
    }

    /// 全部重复的 (类型, 编号)
    pub fn find_duplicates(&self, loads: &[Load]) -> Vec<DuplicateIdentity> {
        let mut groups: BTreeMap<(UldType, &str), Vec<LoadId>> = BTreeMap::new();
        for load in loads.iter().filter(|l| l.is_identified()) {
            groups
                .entry((load.uld_type, load.uld_id.as_str()))
                .or_default()
                .push(load.id);
        }

        groups
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|((uld_type, uld_id), load_ids)| DuplicateIdentity {
                uld_type,
                uld_id: uld_id.to_string(),
                load_ids,
            })
            .collect()
    }

    /// 导出前置条件检查, 返回全部不满足项
    ///
    /// - FKT: 必须已放置
    /// - BLK: 必须已放置且重量 > 0
    /// - 其他: 必须已放置（编号与重量可空）
    pub fn readiness_issues(&self, loads: &[Load]) -> Vec<ReadinessIssue> {
        let mut issues = Vec::new();
        for load in loads {
            if !load.is_placed() {
                issues.push(ReadinessIssue {
                    load_id: load.id,
                    reason: ReadinessReason::NotPlaced,
                });
                continue;
            }
            if !load.bulk_subtype.is_fkt() && load.uld_type.is_bulk() && load.weight == 0 {
                issues.push(ReadinessIssue {
                    load_id: load.id,
                    reason: ReadinessReason::MissingBulkWeight,
                });
            }
        }
        issues
    }

    /// 全部记录满足导出条件
    pub fn all_loads_valid(&self, loads: &[Load]) -> bool {
        let ready = self.readiness_issues(loads).is_empty();
        info!(loads = loads.len(), ready = ready, "导出前置条件检查");
        ready
    }
}

impl Default for PlacementValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 导致 position 被互斥的已占用舱位
fn blocking_sources(
    loads: &[Load],
    profile: &AircraftProfile,
    exclude: LoadId,
    position: &str,
) -> Vec<String> {
    let overlapping: &[String] = match profile.slot_class_of(position) {
        Some(SlotClass::Pallet) => profile.containers_under(position),
        Some(SlotClass::Container) => profile.pallets_over(position),
        _ => &[],
    };

    overlapping
        .iter()
        .filter(|p| {
            loads
                .iter()
                .any(|l| l.id != exclude && l.claims_position() && &l.position == *p)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile_catalog::ec_nog_profile;
    use crate::domain::types::BulkSubtype;

    fn commit(loads: &mut Vec<Load>, load: Load) {
        if let Some(slot) = loads.iter_mut().find(|l| l.id == load.id) {
            *slot = load;
        } else {
            loads.push(load);
        }
    }

    #[test]
    fn test_bulk_only_in_bulk_positions() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let current = Load::new(LoadId(1));
        let loads = vec![current.clone()];

        let edit = LoadEdit::new().uld_type(UldType::Blk).position("24L");
        let err = validator
            .apply_edit(&loads, &profile, &current, &edit)
            .unwrap_err();
        assert_eq!(
            err,
            RejectionReason::SlotTypeMismatch {
                uld_type: UldType::Blk,
                position: "24L".into(),
                slot_class: SlotClass::Container,
            }
        );

        let edit = LoadEdit::new().uld_type(UldType::Blk).position("52");
        let decision = validator
            .apply_edit(&loads, &profile, &current, &edit)
            .unwrap();
        assert_eq!(decision.load.position, "52");
    }

    #[test]
    fn test_unknown_position() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let current = Load::new(LoadId(1));
        let loads = vec![current.clone()];

        let err = validator
            .apply_edit(&loads, &profile, &current, &LoadEdit::new().position("99L"))
            .unwrap_err();
        assert_eq!(
            err,
            RejectionReason::UnknownPosition {
                position: "99L".into()
            }
        );
    }

    #[test]
    fn test_blocked_position_reports_sources() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let mut loads = Vec::new();

        let pallet = Load::new(LoadId(1));
        commit(&mut loads, pallet.clone());
        let decision = validator
            .apply_edit(
                &loads,
                &profile,
                &pallet,
                &LoadEdit::new().uld_type(UldType::Pmc).uld_id("12345R7").position("24P"),
            )
            .unwrap();
        commit(&mut loads, decision.load);

        let ake = Load::new(LoadId(2));
        commit(&mut loads, ake.clone());
        let err = validator
            .apply_edit(&loads, &profile, &ake, &LoadEdit::new().position("25R"))
            .unwrap_err();
        assert_eq!(
            err,
            RejectionReason::PositionBlocked {
                position: "25R".into(),
                blocked_by: vec!["24P".into()],
            }
        );
    }

    #[test]
    fn test_identifying_placeholder_rechecks_blocking() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let mut loads = Vec::new();

        // 24P 占位记录（无编号）
        let mut placeholder = Load::new(LoadId(1));
        placeholder.uld_type = UldType::Pag;
        placeholder.position = "24P".into();
        commit(&mut loads, placeholder.clone());

        // 26L 已指定编号, 占位记录不阻挡
        let ake = Load::new(LoadId(2));
        commit(&mut loads, ake.clone());
        let decision = validator
            .apply_edit(&loads, &profile, &ake, &LoadEdit::new().uld_id("ake1").position("26L"))
            .unwrap();
        commit(&mut loads, decision.load);

        // 给占位记录指定编号 → 24P 被 26L 互斥
        let err = validator
            .apply_edit(&loads, &profile, &placeholder, &LoadEdit::new().uld_id("PAG1"))
            .unwrap_err();
        assert!(matches!(err, RejectionReason::PositionBlocked { .. }));

        // 仅修改重量不重新校验舱位
        let decision = validator
            .apply_edit(&loads, &profile, &placeholder, &LoadEdit::new().weight(800))
            .unwrap();
        assert_eq!(decision.load.weight, 800);
    }

    #[test]
    fn test_type_change_resets_position() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let mut current = Load::new(LoadId(1));
        current.position = "24L".into();
        let loads = vec![current.clone()];

        let decision = validator
            .apply_edit(&loads, &profile, &current, &LoadEdit::new().uld_type(UldType::Pmc))
            .unwrap();
        assert_eq!(decision.load.position, "");

        // 同类型不清空
        let decision = validator
            .apply_edit(&loads, &profile, &current, &LoadEdit::new().uld_type(UldType::Ake))
            .unwrap();
        assert_eq!(decision.load.position, "24L");
    }

    #[test]
    fn test_fkt_forces_zero_weight() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let current = Load::new(LoadId(1));
        let loads = vec![current.clone()];

        let edit = LoadEdit::new()
            .uld_type(UldType::Blk)
            .bulk_subtype(BulkSubtype::Fkt)
            .weight(350)
            .position("52");
        let decision = validator
            .apply_edit(&loads, &profile, &current, &edit)
            .unwrap();
        assert_eq!(decision.load.weight, 0);
        assert!(!decision.load.field_locks().weight_editable);
        assert_eq!(decision.ignored_fields, vec![LoadField::Weight]);
    }

    #[test]
    fn test_bulk_identity_cleared() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let mut current = Load::new(LoadId(1));
        current.uld_id = "OLD1".into();
        let loads = vec![current.clone()];

        let edit = LoadEdit::new().uld_type(UldType::Blk).uld_id("DESC");
        let decision = validator
            .apply_edit(&loads, &profile, &current, &edit)
            .unwrap();
        assert_eq!(decision.load.uld_id, "");
        assert_eq!(decision.ignored_fields, vec![LoadField::UldId]);
    }

    #[test]
    fn test_apply_edit_is_idempotent() {
        let profile = ec_nog_profile();
        let validator = PlacementValidator::new();
        let current = Load::new(LoadId(1));
        let mut loads = vec![current.clone()];

        let edit = LoadEdit::new().uld_id(" tt1234 ").weight(100).position("24l");
        let first = validator
            .apply_edit(&loads, &profile, &current, &edit)
            .unwrap();
        commit(&mut loads, first.load.clone());
        let second = validator
            .apply_edit(&loads, &profile, &first.load, &edit)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(second.load.uld_id, "TT1234");
        assert_eq!(second.load.position, "24L");
    }

    #[test]
    fn test_find_duplicates_by_type_and_id() {
        let validator = PlacementValidator::new();
        let mut a = Load::new(LoadId(1));
        a.uld_id = "12345AB".into();
        let mut b = Load::new(LoadId(2));
        b.uld_id = "12345AB".into();
        let mut c = Load::new(LoadId(3));
        c.uld_type = UldType::Akn;
        c.uld_id = "12345AB".into();
        let d = Load::new(LoadId(4));
        let e = Load::new(LoadId(5));

        let dups = validator.find_duplicates(&[a, b, c, d, e]);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].uld_type, UldType::Ake);
        assert_eq!(dups[0].load_ids, vec![LoadId(1), LoadId(2)]);
    }

    #[test]
    fn test_readiness_rules() {
        let validator = PlacementValidator::new();
        assert!(validator.all_loads_valid(&[]));

        let mut blk = Load::new(LoadId(1));
        blk.uld_type = UldType::Blk;
        blk.position = "51".into();
        assert!(!validator.all_loads_valid(std::slice::from_ref(&blk)));
        assert_eq!(
            validator.readiness_issues(std::slice::from_ref(&blk))[0].reason,
            ReadinessReason::MissingBulkWeight
        );

        blk.weight = 120;
        assert!(validator.all_loads_valid(std::slice::from_ref(&blk)));

        // FKT 只要求已放置
        let mut fkt = Load::new(LoadId(2));
        fkt.uld_type = UldType::Blk;
        fkt.bulk_subtype = BulkSubtype::Fkt;
        fkt.position = "52".into();
        assert!(validator.all_loads_valid(&[blk.clone(), fkt]));

        let unplaced = Load::new(LoadId(3));
        assert!(!validator.all_loads_valid(&[blk, unplaced]));
    }
}
