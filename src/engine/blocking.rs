// ==========================================
// 货舱 ULD 配载系统 - 舱位互斥引擎
// ==========================================
// 职责: 根据档案互斥表与当前装载, 计算不可再放置的舱位集合
// 红线: 纯函数, 不修改装载记录
// 红线: 只有"已放置且已指定编号"的记录才占用舱位, 占位记录不触发互斥
// ==========================================
// 输入: 装载记录 + 机型档案 + 可选的排除ID（正在编辑的记录）
// 输出: 被互斥的舱位集合
// ==========================================

use crate::domain::load::{Load, LoadId};
use crate::domain::profile::AircraftProfile;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

// ==========================================
// BlockingEngine - 舱位互斥引擎
// ==========================================
// 无状态引擎, 档案与装载通过参数传入
#[derive(Debug)]
pub struct BlockingEngine {
    // 无状态
}

impl BlockingEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算被互斥的舱位
    ///
    /// # 规则
    /// - 集装板位 p 被互斥 ⇔ pallet_blocks[p] 中任一集装箱位被占用
    /// - 集装箱位 c 被互斥 ⇔ 覆盖 c 的任一集装板位被占用
    ///
    /// # 参数
    /// - `exclude`: 不计入占用的记录（校验自身时使用, 避免自己挡住自己）
    pub fn compute_blocked(
        &self,
        loads: &[Load],
        profile: &AircraftProfile,
        exclude: Option<LoadId>,
    ) -> BTreeSet<String> {
        let claimed: HashSet<&str> = loads
            .iter()
            .filter(|l| Some(l.id) != exclude)
            .filter(|l| l.claims_position())
            .map(|l| l.position.as_str())
            .collect();

        let mut blocked = BTreeSet::new();

        for (pallet, containers) in profile.pallet_blocks() {
            if containers.iter().any(|c| claimed.contains(c.as_str())) {
                blocked.insert(pallet.clone());
            }
        }

        for (container, pallets) in profile.container_blocks() {
            if pallets.iter().any(|p| claimed.contains(p.as_str())) {
                blocked.insert(container.clone());
            }
        }

        debug!(
            registration = %profile.registration(),
            claimed = claimed.len(),
            blocked = blocked.len(),
            exclude = ?exclude,
            "互斥舱位计算完成"
        );

        blocked
    }

    /// 单个舱位是否被互斥
    pub fn is_blocked(
        &self,
        position: &str,
        loads: &[Load],
        profile: &AircraftProfile,
        exclude: Option<LoadId>,
    ) -> bool {
        self.compute_blocked(loads, profile, exclude)
            .contains(position)
    }

    /// 已被其他记录放置的舱位（含占位记录）
    pub fn occupied_positions(&self, loads: &[Load], exclude: Option<LoadId>) -> BTreeSet<String> {
        loads
            .iter()
            .filter(|l| Some(l.id) != exclude)
            .filter(|l| l.is_placed())
            .map(|l| l.position.clone())
            .collect()
    }
}

impl Default for BlockingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile_catalog::ec_nog_profile;
    use crate::domain::types::UldType;

    fn placed(id: u64, uld_type: UldType, uld_id: &str, position: &str) -> Load {
        let mut load = Load::new(LoadId(id));
        load.uld_type = uld_type;
        load.uld_id = uld_id.to_string();
        load.position = position.to_string();
        load
    }

    #[test]
    fn test_pallet_blocks_its_containers() {
        let profile = ec_nog_profile();
        let engine = BlockingEngine::new();
        let loads = vec![placed(1, UldType::Pmc, "12345R7", "24P")];

        let blocked = engine.compute_blocked(&loads, &profile, None);
        for c in ["26L", "26R", "25L", "25R"] {
            assert!(blocked.contains(c), "{} should be blocked", c);
        }
        // 24P 自身不在互斥集合中, 23P 也不受影响
        assert!(!blocked.contains("24P"));
        assert!(!blocked.contains("23P"));
    }

    #[test]
    fn test_container_blocks_every_overlapping_pallet() {
        let profile = ec_nog_profile();
        let engine = BlockingEngine::new();
        // 25L 同时被 24P 与 23P 覆盖
        let loads = vec![placed(1, UldType::Ake, "12345AB", "25L")];

        let blocked = engine.compute_blocked(&loads, &profile, None);
        assert!(blocked.contains("24P"));
        assert!(blocked.contains("23P"));
        assert!(!blocked.contains("22P"));
    }

    #[test]
    fn test_placeholder_never_blocks() {
        let profile = ec_nog_profile();
        let engine = BlockingEngine::new();
        let loads = vec![placed(1, UldType::Pmc, "", "24P")];
        assert!(engine.compute_blocked(&loads, &profile, None).is_empty());
    }

    #[test]
    fn test_exclude_self() {
        let profile = ec_nog_profile();
        let engine = BlockingEngine::new();
        let loads = vec![placed(7, UldType::Ake, "11111AB", "31L")];

        assert!(engine.is_blocked("31P", &loads, &profile, None));
        assert!(!engine.is_blocked("31P", &loads, &profile, Some(LoadId(7))));
    }

    #[test]
    fn test_occupied_positions_include_placeholders() {
        let engine = BlockingEngine::new();
        let loads = vec![
            placed(1, UldType::Ake, "", "11L"),
            placed(2, UldType::Ake, "22222AB", "11R"),
            Load::new(LoadId(3)),
        ];
        let occupied = engine.occupied_positions(&loads, Some(LoadId(2)));
        assert_eq!(occupied.len(), 1);
        assert!(occupied.contains("11L"));
    }
}
