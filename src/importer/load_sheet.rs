// ==========================================
// 货舱 ULD 配载系统 - CSV 装载清单导入
// ==========================================
// 列: type, uld_id, bulk, weight, position（表头不区分大小写, 缺列取默认）
// 流程: 解析 → 字段转换 → create_load + edit_load
// 红线: 单行被拒绝时删除该行新建的记录, 记入报告后继续
// ==========================================

use crate::api::error::ApiError;
use crate::api::load_plan_api::LoadPlanApi;
use crate::domain::load::{LoadEdit, LoadId};
use crate::domain::types::{BulkSubtype, UldType};
use crate::engine::placement::Advisory;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// 列名 → 规范列名（含别名）
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("type", "type"),
    ("uld_type", "type"),
    ("uld_id", "uld_id"),
    ("id", "uld_id"),
    ("bulk", "bulk"),
    ("bulk_subtype", "bulk"),
    ("weight", "weight"),
    ("position", "position"),
    ("pos", "position"),
];

// ==========================================
// LoadSheetRow - 原始行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSheetRow {
    /// 文件行号（表头为第 1 行）
    pub line: u64,
    pub uld_type: String,
    pub uld_id: String,
    pub bulk: String,
    pub weight: String,
    pub position: String,
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    pub line: u64,
    /// 稳定错误代码
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowAdvisory {
    pub line: u64,
    pub load_id: LoadId,
    pub advisory: Advisory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub rows_read: usize,
    pub imported: Vec<LoadId>,
    pub rejections: Vec<RowRejection>,
    pub advisories: Vec<RowAdvisory>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

// ==========================================
// LoadSheetImporter - 装载清单导入器
// ==========================================
#[derive(Debug)]
pub struct LoadSheetImporter;

impl LoadSheetImporter {
    pub fn new() -> Self {
        Self
    }

    /// 从文件导入
    ///
    /// # 返回
    /// - Ok(ImportReport): 文件可读即返回, 行级拒绝记入报告
    /// - Err(ImportError): 文件不存在 / CSV 格式错误 / 未装载机型档案
    pub fn import_file(&self, api: &mut LoadPlanApi, path: &Path) -> ImportResult<ImportReport> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let rows = self.parse_reader(File::open(path)?)?;
        let report = self.import_rows(api, &rows)?;

        info!(
            path = %path.display(),
            rows = report.rows_read,
            imported = report.imported_count(),
            rejected = report.rejections.len(),
            "装载清单导入完成"
        );

        Ok(report)
    }

    /// 解析 CSV, 跳过完全空白的行
    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<Vec<LoadSheetRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<Option<&'static str>> = reader
            .headers()?
            .iter()
            .map(canonical_column)
            .collect();

        if columns.iter().all(Option::is_none) {
            return Err(ImportError::MissingColumn(
                "type, uld_id, bulk, weight, position".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);

            let mut values: HashMap<&'static str, String> = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(Some(column)) = columns.get(col_idx) {
                    values.insert(*column, value.trim().to_string());
                }
            }

            if values.values().all(|v| v.is_empty()) {
                continue;
            }

            let mut take = |column: &str| values.remove(column).unwrap_or_default();
            rows.push(LoadSheetRow {
                line,
                uld_type: take("type"),
                uld_id: take("uld_id"),
                bulk: take("bulk"),
                weight: take("weight"),
                position: take("position"),
            });
        }

        Ok(rows)
    }

    /// 逐行创建并修改记录
    pub fn import_rows(
        &self,
        api: &mut LoadPlanApi,
        rows: &[LoadSheetRow],
    ) -> ImportResult<ImportReport> {
        let mut report = ImportReport {
            rows_read: rows.len(),
            ..ImportReport::default()
        };

        for row in rows {
            let edit = match self.row_to_edit(row) {
                Ok(edit) => edit,
                Err(message) => {
                    warn!(line = row.line, reason = %message, "装载清单行被拒绝");
                    report.rejections.push(RowRejection {
                        line: row.line,
                        code: "INVALID_INPUT".to_string(),
                        message,
                    });
                    continue;
                }
            };

            let id = api.create_load()?;
            match api.edit_load(id, &edit) {
                Ok(outcome) => {
                    report.imported.push(id);
                    report
                        .advisories
                        .extend(outcome.advisories.into_iter().map(|advisory| RowAdvisory {
                            line: row.line,
                            load_id: id,
                            advisory,
                        }));
                }
                Err(err @ ApiError::Rejected(_)) => {
                    warn!(line = row.line, load_id = %id, reason = %err, "装载清单行被拒绝");
                    api.delete_load(id)?;
                    report.rejections.push(RowRejection {
                        line: row.line,
                        code: err.code().to_string(),
                        message: err.to_string(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(report)
    }

    /// 行 → 修改请求; Err 为拒绝原因
    pub fn row_to_edit(&self, row: &LoadSheetRow) -> Result<LoadEdit, String> {
        let mut edit = LoadEdit::new();

        if !row.uld_type.is_empty() {
            let uld_type = UldType::parse(&row.uld_type)
                .ok_or_else(|| format!("未知 ULD 类型: {}", row.uld_type))?;
            edit = edit.uld_type(uld_type);
        }

        if !row.bulk.is_empty() {
            let subtype = BulkSubtype::parse(&row.bulk)
                .ok_or_else(|| format!("未知散货子类型: {}", row.bulk))?;
            edit = edit.bulk_subtype(subtype);
        }

        if !row.uld_id.is_empty() {
            edit = edit.uld_id(row.uld_id.to_uppercase());
        }

        if let Some(weight) = parse_weight(row.line, &row.weight)? {
            edit = edit.weight(weight);
        }

        if !row.position.is_empty() {
            edit = edit.position(row.position.to_uppercase());
        }

        Ok(edit)
    }
}

impl Default for LoadSheetImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_column(header: &str) -> Option<&'static str> {
    let header = header.trim().to_lowercase();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|(_, column)| *column)
}

/// 重量: 空 → 不修改; 非数字 → 0; 负数或超出范围 → 拒绝
fn parse_weight(line: u64, value: &str) -> Result<Option<u32>, String> {
    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<i64>() {
        Ok(w) if w < 0 => Err(format!("重量不能为负数: {}", w)),
        Ok(w) => u32::try_from(w)
            .map(Some)
            .map_err(|_| format!("重量超出范围: {}", w)),
        Err(_) => {
            warn!(line, value, "重量不是数字, 按 0 处理");
            Ok(Some(0))
        }
    }
}
