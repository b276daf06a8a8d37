// ==========================================
// 货舱 ULD 配载系统 - CPM 报文生成引擎
// ==========================================
// 输入: 装载记录 + 机型档案 + 航班信息
// 输出: CPM 报文（头部两行 + 舱位行 + 汇总行）
// ==========================================

use crate::domain::load::Load;
use crate::domain::profile::{AircraftProfile, ContainerRow};
use crate::engine::blocking::BlockingEngine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

use super::segment::{format_segment, numeric_prefix, suffix};

/// 报文类型行
const MESSAGE_TYPE: &str = "CPM";

// ==========================================
// ManifestRequest - 航班信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRequest {
    /// 航班号
    pub flight_no: String,
    /// 目的站
    pub destination: String,
    /// 日期（当月第几天, 1-31）
    pub day_of_month: u32,
    /// 始发站
    pub origin_code: String,
}

// ==========================================
// ManifestLine / CpmManifest - 报文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestLine {
    /// 行首舱位（排序依据）
    pub position: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpmManifest {
    pub header: Vec<String>,
    pub lines: Vec<ManifestLine>,
    pub trailer: String,
    /// 全部记录重量之和（含未放置记录）
    pub total_weight: u64,
}

impl CpmManifest {
    /// 报文全文, 以换行分隔
    pub fn to_text(&self) -> String {
        let mut out: Vec<&str> = Vec::with_capacity(self.header.len() + self.lines.len() + 1);
        out.extend(self.header.iter().map(String::as_str));
        out.extend(self.lines.iter().map(|l| l.text.as_str()));
        out.push(&self.trailer);
        out.join("\n")
    }
}

impl fmt::Display for CpmManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

// ==========================================
// ManifestFormatter - CPM 报文生成引擎
// ==========================================
#[derive(Debug)]
pub struct ManifestFormatter {
    blocking: BlockingEngine,
}

impl ManifestFormatter {
    pub fn new() -> Self {
        Self {
            blocking: BlockingEngine::new(),
        }
    }

    /// 生成 CPM 报文
    ///
    /// 调用方负责先确认导出前置条件（见 PlacementValidator::all_loads_valid）
    pub fn build(
        &self,
        loads: &[Load],
        profile: &AircraftProfile,
        request: &ManifestRequest,
    ) -> CpmManifest {
        let dest = request.destination.as_str();

        // 舱位 → 记录（同一舱位仅取第一条）
        let mut by_position: HashMap<&str, &Load> = HashMap::new();
        for load in loads.iter().filter(|l| l.is_placed()) {
            by_position.entry(load.position.as_str()).or_insert(load);
        }
        let informative = |pos: &str| by_position.get(pos).is_some_and(|l| l.is_informative());

        // 1. 互斥舱位（不排除任何记录）
        let blocked: BTreeSet<String> = self.blocking.compute_blocked(loads, profile, None);

        // 2. 整板无货: 只输出集装板位, 压制其下集装箱位
        let mut pallet_only: Vec<&str> = Vec::new();
        let mut suppressed: HashSet<&str> = HashSet::new();
        for pallet in profile.pallet_positions() {
            if blocked.contains(pallet) {
                continue;
            }
            let containers = profile.containers_under(pallet);
            if !informative(pallet) && containers.iter().all(|c| !informative(c)) {
                pallet_only.push(pallet.as_str());
                suppressed.extend(containers.iter().map(String::as_str));
            }
        }

        let mut lines: Vec<ManifestLine> = Vec::new();
        let mut push = |position: &str, text: String| {
            lines.push(ManifestLine {
                position: position.to_string(),
                text,
            })
        };

        for &pallet in &pallet_only {
            push(pallet, format_segment(pallet, by_position.get(pallet).copied(), dest));
        }

        // 3. 集装箱位: 两侧均未互斥、未压制时合并输出, 否则只输出可用一侧
        let usable = |pos: &str| !blocked.contains(pos) && !suppressed.contains(pos);
        for row in profile.container_rows() {
            match row {
                ContainerRow::Pair { left, right } => {
                    // 仅一侧可用时该侧单独成行
                    let sides: Vec<&str> = [left.as_str(), right.as_str()]
                        .into_iter()
                        .filter(|p| usable(p))
                        .collect();
                    let Some(&leading) = sides.first() else {
                        continue;
                    };
                    let text: String = sides
                        .iter()
                        .map(|p| format_segment(p, by_position.get(p).copied(), dest))
                        .collect();
                    push(leading, text);
                }
                ContainerRow::Single { position } => {
                    if !usable(position) {
                        continue;
                    }
                    push(
                        position,
                        format_segment(position, by_position.get(position.as_str()).copied(), dest),
                    );
                }
            }
        }

        // 4. 其余集装板位
        for pallet in profile.pallet_positions() {
            if pallet_only.contains(&pallet.as_str()) || blocked.contains(pallet) {
                continue;
            }
            push(
                pallet,
                format_segment(pallet, by_position.get(pallet.as_str()).copied(), dest),
            );
        }

        // 5. 散货舱总是输出
        for bulk in profile.bulk_positions() {
            push(
                bulk,
                format_segment(bulk, by_position.get(bulk.as_str()).copied(), dest),
            );
        }

        // 6. 排序: 散货舱最后 → 数字前缀 → 后缀字典序
        lines.sort_by(|a, b| {
            sort_key(profile, &a.position).cmp(&sort_key(profile, &b.position))
        });

        let total_weight: u64 = loads.iter().map(|l| u64::from(l.weight)).sum();

        let header = vec![
            MESSAGE_TYPE.to_string(),
            format!(
                "{}/{:02}.{} {}",
                request.flight_no,
                request.day_of_month,
                profile.registration(),
                dest
            ),
        ];
        let trailer = format!(
            "SI {}-{} C 0 M 0 Total Pieces/{} O 0 T 0",
            request.origin_code, dest, total_weight
        );

        debug!(
            blocked = blocked.len(),
            pallet_only = pallet_only.len(),
            suppressed = suppressed.len(),
            "报文压制规则计算完成"
        );
        info!(
            flight_no = %request.flight_no,
            destination = %dest,
            registration = %profile.registration(),
            lines = lines.len(),
            total_weight = total_weight,
            "CPM 报文生成完成"
        );

        CpmManifest {
            header,
            lines,
            trailer,
            total_weight,
        }
    }
}

impl Default for ManifestFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_key<'a>(profile: &AircraftProfile, position: &'a str) -> (bool, u32, &'a str) {
    (
        profile.is_bulk_position(position),
        numeric_prefix(position),
        suffix(position),
    )
}
