// ==========================================
// 货舱 ULD 配载系统 - 配载会话 API
// ==========================================
// 职责: 持有当前机型档案与装载记录, 作为外部调用方的唯一入口
// 红线: 记录字段只能经 PlacementValidator 修改
// 红线: 导出前必须满足全部记录的前置条件
// ==========================================
// 并发: 单线程同步; 一次 edit_load 即一个原子单元
// ==========================================

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::StationConfig;
use crate::domain::load::{Load, LoadEdit, LoadId};
use crate::domain::profile::AircraftProfile;
use crate::engine::blocking::BlockingEngine;
use crate::engine::manifest::{CpmManifest, ManifestFormatter, ManifestRequest};
use crate::engine::placement::{
    Advisory, DuplicateIdentity, PlacementValidator, ReadinessIssue,
};

// ==========================================
// EditOutcome - 修改结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// 提交后的记录
    pub load: Load,
    /// 提示（重复编号 / 被忽略的锁定字段）
    pub advisories: Vec<Advisory>,
}

impl EditOutcome {
    pub fn has_duplicate(&self) -> bool {
        self.advisories
            .iter()
            .any(|a| matches!(a, Advisory::DuplicateIdentity(_)))
    }
}

// ==========================================
// LoadPlanApi - 配载会话 API
// ==========================================

/// 配载会话API
///
/// 职责：
/// 1. 装载/切换机型档案
/// 2. 记录的创建、修改、删除
/// 3. 互斥舱位与可用舱位查询
/// 4. 导出前置条件检查与 CPM 报文生成
#[derive(Debug)]
pub struct LoadPlanApi {
    station: StationConfig,
    profile: Option<AircraftProfile>,
    loads: Vec<Load>,
    /// 下一个记录ID（单调递增, 不复用）
    next_id: u64,
    blocking: BlockingEngine,
    validator: PlacementValidator,
    formatter: ManifestFormatter,
}

impl LoadPlanApi {
    /// 创建新的会话（尚未装载机型档案）
    pub fn new(station: StationConfig) -> Self {
        Self {
            station,
            profile: None,
            loads: Vec::new(),
            next_id: 1,
            blocking: BlockingEngine::new(),
            validator: PlacementValidator::new(),
            formatter: ManifestFormatter::new(),
        }
    }

    // ==========================================
    // 机型档案
    // ==========================================

    /// 装载机型档案
    ///
    /// 原有记录的舱位属于旧档案, 一并清空（ID 计数不重置）
    pub fn load_profile(&mut self, profile: AircraftProfile) {
        let cleared = self.loads.len();
        self.loads.clear();

        info!(
            registration = %profile.registration(),
            aircraft_type = %profile.aircraft_type(),
            cleared_loads = cleared,
            "机型档案已装载"
        );

        self.profile = Some(profile);
    }

    pub fn profile(&self) -> Option<&AircraftProfile> {
        self.profile.as_ref()
    }

    pub fn station(&self) -> &StationConfig {
        &self.station
    }

    fn require_profile(&self) -> ApiResult<&AircraftProfile> {
        self.profile.as_ref().ok_or(ApiError::NoProfile)
    }

    // ==========================================
    // 记录管理
    // ==========================================

    /// 新建空记录
    pub fn create_load(&mut self) -> ApiResult<LoadId> {
        self.require_profile()?;

        let id = LoadId(self.next_id);
        self.next_id += 1;
        self.loads.push(Load::new(id));

        debug!(load_id = %id, "新建装载记录");
        Ok(id)
    }

    /// 修改记录字段
    ///
    /// # 返回
    /// - Ok(EditOutcome): 已提交, 附带提示
    /// - Err(ApiError::Rejected): 被拒绝, 记录保持原状
    pub fn edit_load(&mut self, id: LoadId, edit: &LoadEdit) -> ApiResult<EditOutcome> {
        let profile = self.profile.as_ref().ok_or(ApiError::NoProfile)?;
        let index = self
            .loads
            .iter()
            .position(|l| l.id == id)
            .ok_or(ApiError::LoadNotFound(id))?;

        let decision = self
            .validator
            .apply_edit(&self.loads, profile, &self.loads[index], edit)?;

        self.loads[index] = decision.load.clone();

        let mut advisories: Vec<Advisory> = decision
            .ignored_fields
            .into_iter()
            .map(|field| Advisory::LockedFieldIgnored { field })
            .collect();

        for duplicate in self.validator.find_duplicates(&self.loads) {
            if duplicate.load_ids.contains(&id) {
                warn!(
                    load_id = %id,
                    uld_type = %duplicate.uld_type,
                    uld_id = %duplicate.uld_id,
                    load_ids = ?duplicate.load_ids,
                    "ULD 编号重复"
                );
                advisories.push(Advisory::DuplicateIdentity(duplicate));
            }
        }

        info!(
            load_id = %id,
            position = %decision.load.position,
            advisories = advisories.len(),
            "装载记录已修改"
        );

        Ok(EditOutcome {
            load: decision.load,
            advisories,
        })
    }

    /// 删除记录, 立即释放其舱位
    pub fn delete_load(&mut self, id: LoadId) -> ApiResult<()> {
        let index = self
            .loads
            .iter()
            .position(|l| l.id == id)
            .ok_or(ApiError::LoadNotFound(id))?;
        let removed = self.loads.remove(index);

        info!(load_id = %id, position = %removed.position, "装载记录已删除");
        Ok(())
    }

    /// 清空全部记录, 返回清除数量
    pub fn clear_loads(&mut self) -> usize {
        let count = self.loads.len();
        self.loads.clear();
        info!(cleared = count, "全部装载记录已清空");
        count
    }

    pub fn load(&self, id: LoadId) -> Option<&Load> {
        self.loads.iter().find(|l| l.id == id)
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 当前被互斥的舱位
    pub fn blocked_positions(&self) -> ApiResult<BTreeSet<String>> {
        let profile = self.require_profile()?;
        Ok(self.blocking.compute_blocked(&self.loads, profile, None))
    }

    /// 该记录当前可选的舱位（按档案顺序）
    ///
    /// 与记录类型匹配, 未被互斥（不计自身）, 且未被其他记录占用
    pub fn available_positions(&self, id: LoadId) -> ApiResult<Vec<String>> {
        let profile = self.require_profile()?;
        let load = self.load(id).ok_or(ApiError::LoadNotFound(id))?;

        let blocked = self.blocking.compute_blocked(&self.loads, profile, Some(id));
        let occupied = self.blocking.occupied_positions(&self.loads, Some(id));

        Ok(profile
            .positions_for(load.uld_type.slot_class())
            .iter()
            .filter(|p| !blocked.contains(*p) && !occupied.contains(*p))
            .cloned()
            .collect())
    }

    /// 全部重复编号
    pub fn duplicate_identities(&self) -> Vec<DuplicateIdentity> {
        self.validator.find_duplicates(&self.loads)
    }

    /// 不满足导出条件的记录
    pub fn readiness_issues(&self) -> Vec<ReadinessIssue> {
        self.validator.readiness_issues(&self.loads)
    }

    /// 是否可以导出
    pub fn is_export_ready(&self) -> bool {
        self.profile.is_some() && self.validator.all_loads_valid(&self.loads)
    }

    // ==========================================
    // 报文导出
    // ==========================================

    /// 生成 CPM 报文
    ///
    /// # 参数
    /// - flight_no: 航班号（空则使用站点默认值）
    /// - destination: 目的站（空则使用站点默认值）
    /// - day_of_month: 当月第几天 (1-31)
    ///
    /// # 返回
    /// - Err(ApiError::NotReady): 存在未就绪记录
    pub fn build_manifest(
        &self,
        flight_no: &str,
        destination: &str,
        day_of_month: u32,
    ) -> ApiResult<CpmManifest> {
        let profile = self.require_profile()?;

        let issues = self.validator.readiness_issues(&self.loads);
        if !issues.is_empty() {
            warn!(issues = issues.len(), "导出条件不满足");
            return Err(ApiError::NotReady { issues });
        }

        if !(1..=31).contains(&day_of_month) {
            return Err(ApiError::InvalidInput(format!(
                "日期必须在 1-31 之间: {}",
                day_of_month
            )));
        }

        let request = ManifestRequest {
            flight_no: message_field("航班号", flight_no, &self.station.default_flight_no)?,
            destination: message_field("目的站", destination, &self.station.default_destination)?,
            day_of_month,
            origin_code: self.station.origin_code.clone(),
        };

        Ok(self.formatter.build(&self.loads, profile, &request))
    }
}

/// 报文字段: 去空格转大写, 空值取默认; 不允许包含分隔符或空白
fn message_field(name: &str, value: &str, default: &str) -> ApiResult<String> {
    let value = value.trim().to_uppercase();
    let value = if value.is_empty() {
        default.to_string()
    } else {
        value
    };

    if value.contains('/') || value.contains(char::is_whitespace) {
        return Err(ApiError::InvalidInput(format!(
            "{}不能包含 '/' 或空白: {}",
            name, value
        )));
    }
    Ok(value)
}
