use crate::domain::load::Load;

/// 单个舱位的报文片段
///
/// | 情况 | 格式 |
/// |---|---|
/// | 无记录 / 普通 ULD 无编号 | `-POS/X` |
/// | FKT（任意类型） | `-POS/TYPE/E/DEST` |
/// | BLK | `-POS/WEIGHT/BY/DEST` |
/// | 普通 ULD | `-POS/TYPE+ID/WEIGHT 或 X/BY/DEST` |
pub fn format_segment(position: &str, load: Option<&Load>, destination: &str) -> String {
    let Some(load) = load else {
        return format!("-{}/X", position);
    };

    // FKT 优先于 BLK: 不输出编号与重量
    if load.bulk_subtype.is_fkt() {
        return format!(
            "-{}/{}/{}/{}",
            position,
            load.uld_type,
            load.bulk_subtype.manifest_code(),
            destination
        );
    }

    if load.uld_type.is_bulk() {
        return format!(
            "-{}/{}/{}/{}",
            position,
            load.weight,
            load.bulk_subtype.manifest_code(),
            destination
        );
    }

    if !load.is_identified() {
        return format!("-{}/X", position);
    }

    let weight = if load.weight > 0 {
        load.weight.to_string()
    } else {
        "X".to_string()
    };

    format!(
        "-{}/{}{}/{}/{}/{}",
        position,
        load.uld_type,
        load.uld_id,
        weight,
        load.bulk_subtype.manifest_code(),
        destination
    )
}

/// 舱位代码的数字前缀, 如 "24P" → 24; 无数字前缀时为 0
pub fn numeric_prefix(position: &str) -> u32 {
    let digits: String = position.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// 数字前缀之后的后缀, 如 "24P" → "P"
pub(crate) fn suffix(position: &str) -> &str {
    position.trim_start_matches(|c: char| c.is_ascii_digit())
}
