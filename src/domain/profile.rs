// ==========================================
// 货舱 ULD 配载系统 - 机型舱位档案
// ==========================================
// 职责: 描述单架飞机的舱位几何（集装箱位/集装板位/散货位）
// 红线: container_blocks 只能由 pallet_blocks 推导, 不允许单独编辑
// ==========================================
// ProfileDefinition: 原始定义 (JSON 文件 / 内置档案)
// AircraftProfile: 校验通过后的只读档案
// ==========================================

use crate::domain::types::SlotClass;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// 散货舱位（所有机型固定）
pub const BULK_POSITIONS: [&str; 3] = ["51", "52", "53"];

// ==========================================
// ProfileError - 档案校验错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("飞机注册号不能为空")]
    EmptyRegistration,

    #[error("舱位代码不能为空")]
    EmptyPosition,

    #[error("舱位代码重复: {0}")]
    DuplicatePosition(String),

    #[error("集装板位必须以 P 结尾: {0}")]
    InvalidPalletCode(String),

    #[error("集装箱位不能以 P 结尾: {0}")]
    InvalidContainerCode(String),

    #[error("舱位代码与散货舱位冲突: {0}")]
    ReservedBulkCode(String),

    #[error("互斥表引用了未定义的集装板位: {0}")]
    UnknownPalletInBlocks(String),

    #[error("互斥表引用了未定义的集装箱位: pallet={pallet}, container={container}")]
    UnknownContainerInBlocks { pallet: String, container: String },

    #[error("集装箱配对无效: {left}/{right} ({reason})")]
    InvalidPair {
        left: String,
        right: String,
        reason: String,
    },
}

// ==========================================
// ProfileDefinition - 原始档案定义
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub registration: String,

    #[serde(rename = "type", alias = "aircraft_type")]
    pub aircraft_type: String,

    /// AKE/AKN 位（有序）
    pub container_positions: Vec<String>,

    /// 集装板位（有序, 后缀 P）
    pub pallet_positions: Vec<String>,

    /// 集装板位 -> 其覆盖的集装箱位
    pub pallet_blocks: BTreeMap<String, Vec<String>>,

    /// 左右配对（可选, 缺省按 L/R 后缀推导）
    #[serde(default)]
    pub container_pairs: Option<Vec<(String, String)>>,
}

// ==========================================
// ContainerRow - 报文中的一行集装箱位
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerRow {
    /// 左右配对, 合并为一行
    Pair { left: String, right: String },
    /// 无配对的单独舱位
    Single { position: String },
}

impl ContainerRow {
    /// 行首舱位（用于排序）
    pub fn leading_position(&self) -> &str {
        match self {
            ContainerRow::Pair { left, .. } => left,
            ContainerRow::Single { position } => position,
        }
    }
}

// ==========================================
// AircraftProfile - 校验后的机型档案
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AircraftProfile {
    registration: String,
    aircraft_type: String,
    container_positions: Vec<String>,
    pallet_positions: Vec<String>,
    bulk_positions: Vec<String>,
    pallet_blocks: BTreeMap<String, Vec<String>>,
    /// 反向关系, 装载档案时一次性推导
    container_blocks: BTreeMap<String, Vec<String>>,
    container_rows: Vec<ContainerRow>,
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

impl AircraftProfile {
    /// 校验定义并构建档案
    ///
    /// # 校验规则
    /// 1. 注册号非空, 舱位代码非空且不重复
    /// 2. 集装板位以 P 结尾, 集装箱位不以 P 结尾, 二者均不得占用 51/52/53
    /// 3. 互斥表的键必须是集装板位, 值必须是集装箱位
    /// 4. 显式配对必须是两个不同的集装箱位, 且每个位置最多出现一次
    pub fn from_definition(def: ProfileDefinition) -> Result<Self, ProfileError> {
        let registration = normalize(&def.registration);
        if registration.is_empty() {
            return Err(ProfileError::EmptyRegistration);
        }

        let mut seen: HashSet<String> = HashSet::new();

        let mut container_positions = Vec::with_capacity(def.container_positions.len());
        for raw in &def.container_positions {
            let pos = normalize(raw);
            check_code(&pos, &mut seen)?;
            if pos.ends_with('P') {
                return Err(ProfileError::InvalidContainerCode(pos));
            }
            container_positions.push(pos);
        }

        let mut pallet_positions = Vec::with_capacity(def.pallet_positions.len());
        for raw in &def.pallet_positions {
            let pos = normalize(raw);
            check_code(&pos, &mut seen)?;
            if !pos.ends_with('P') {
                return Err(ProfileError::InvalidPalletCode(pos));
            }
            pallet_positions.push(pos);
        }

        let container_set: HashSet<&str> = container_positions.iter().map(String::as_str).collect();
        let pallet_set: HashSet<&str> = pallet_positions.iter().map(String::as_str).collect();

        let mut pallet_blocks: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (raw_pallet, raw_containers) in &def.pallet_blocks {
            let pallet = normalize(raw_pallet);
            if !pallet_set.contains(pallet.as_str()) {
                return Err(ProfileError::UnknownPalletInBlocks(pallet));
            }
            let mut containers: Vec<String> = Vec::with_capacity(raw_containers.len());
            for raw_container in raw_containers {
                let container = normalize(raw_container);
                if !container_set.contains(container.as_str()) {
                    return Err(ProfileError::UnknownContainerInBlocks { pallet, container });
                }
                if !containers.contains(&container) {
                    containers.push(container);
                }
            }
            pallet_blocks.insert(pallet, containers);
        }

        // 反向关系: 按集装板位顺序推导
        let mut container_blocks: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for pallet in &pallet_positions {
            if let Some(containers) = pallet_blocks.get(pallet) {
                for container in containers {
                    container_blocks
                        .entry(container.clone())
                        .or_default()
                        .push(pallet.clone());
                }
            }
        }

        let container_rows = match &def.container_pairs {
            Some(pairs) => explicit_rows(pairs, &container_positions, &container_set)?,
            None => derive_rows(&container_positions, &container_set),
        };

        Ok(Self {
            registration,
            aircraft_type: def.aircraft_type.trim().to_string(),
            container_positions,
            pallet_positions,
            bulk_positions: BULK_POSITIONS.iter().map(|p| p.to_string()).collect(),
            pallet_blocks,
            container_blocks,
            container_rows,
        })
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn registration(&self) -> &str {
        &self.registration
    }

    pub fn aircraft_type(&self) -> &str {
        &self.aircraft_type
    }

    pub fn container_positions(&self) -> &[String] {
        &self.container_positions
    }

    pub fn pallet_positions(&self) -> &[String] {
        &self.pallet_positions
    }

    pub fn bulk_positions(&self) -> &[String] {
        &self.bulk_positions
    }

    pub fn pallet_blocks(&self) -> &BTreeMap<String, Vec<String>> {
        &self.pallet_blocks
    }

    pub fn container_blocks(&self) -> &BTreeMap<String, Vec<String>> {
        &self.container_blocks
    }

    pub fn container_rows(&self) -> &[ContainerRow] {
        &self.container_rows
    }

    /// 集装板位覆盖的集装箱位
    pub fn containers_under(&self, pallet: &str) -> &[String] {
        self.pallet_blocks
            .get(pallet)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 覆盖该集装箱位的集装板位
    pub fn pallets_over(&self, container: &str) -> &[String] {
        self.container_blocks
            .get(container)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 舱位所属类别, 未定义返回 None
    pub fn slot_class_of(&self, position: &str) -> Option<SlotClass> {
        if self.bulk_positions.iter().any(|p| p == position) {
            Some(SlotClass::Bulk)
        } else if self.pallet_positions.iter().any(|p| p == position) {
            Some(SlotClass::Pallet)
        } else if self.container_positions.iter().any(|p| p == position) {
            Some(SlotClass::Container)
        } else {
            None
        }
    }

    /// 某类别的全部舱位
    pub fn positions_for(&self, class: SlotClass) -> &[String] {
        match class {
            SlotClass::Container => &self.container_positions,
            SlotClass::Pallet => &self.pallet_positions,
            SlotClass::Bulk => &self.bulk_positions,
        }
    }

    pub fn is_bulk_position(&self, position: &str) -> bool {
        self.bulk_positions.iter().any(|p| p == position)
    }
}

fn check_code(pos: &str, seen: &mut HashSet<String>) -> Result<(), ProfileError> {
    if pos.is_empty() {
        return Err(ProfileError::EmptyPosition);
    }
    if BULK_POSITIONS.contains(&pos) {
        return Err(ProfileError::ReservedBulkCode(pos.to_string()));
    }
    if !seen.insert(pos.to_string()) {
        return Err(ProfileError::DuplicatePosition(pos.to_string()));
    }
    Ok(())
}

/// 按 L/R 后缀推导配对: nnL 与 nnR 成对, 其余单列
fn derive_rows(containers: &[String], container_set: &HashSet<&str>) -> Vec<ContainerRow> {
    let mut rows = Vec::new();
    let mut covered: HashSet<String> = HashSet::new();

    for pos in containers {
        if let Some(prefix) = pos.strip_suffix('L') {
            let right = format!("{}R", prefix);
            if container_set.contains(right.as_str()) {
                covered.insert(pos.clone());
                covered.insert(right.clone());
                rows.push(ContainerRow::Pair {
                    left: pos.clone(),
                    right,
                });
            }
        }
    }

    for pos in containers {
        if !covered.contains(pos) {
            rows.push(ContainerRow::Single {
                position: pos.clone(),
            });
        }
    }

    rows
}

fn explicit_rows(
    pairs: &[(String, String)],
    containers: &[String],
    container_set: &HashSet<&str>,
) -> Result<Vec<ContainerRow>, ProfileError> {
    let mut rows = Vec::with_capacity(pairs.len());
    let mut covered: HashSet<String> = HashSet::new();

    for (raw_left, raw_right) in pairs {
        let left = normalize(raw_left);
        let right = normalize(raw_right);
        let invalid = |reason: &str| ProfileError::InvalidPair {
            left: left.clone(),
            right: right.clone(),
            reason: reason.to_string(),
        };

        if left == right {
            return Err(invalid("左右相同"));
        }
        if !container_set.contains(left.as_str()) || !container_set.contains(right.as_str()) {
            return Err(invalid("不是集装箱位"));
        }
        if covered.contains(&left) || covered.contains(&right) {
            return Err(invalid("舱位重复配对"));
        }
        covered.insert(left.clone());
        covered.insert(right.clone());
        rows.push(ContainerRow::Pair { left, right });
    }

    for pos in containers {
        if !covered.contains(pos) {
            rows.push(ContainerRow::Single {
                position: pos.clone(),
            });
        }
    }

    Ok(rows)
}
