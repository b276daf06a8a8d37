// ==========================================
// 货舱 ULD 配载系统 - 领域类型定义
// ==========================================
// ULD 类型 / 散货子类型 / 舱位类别
// 序列化格式: 大写代码 (与 CPM 报文一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ULD 类型 (ULD Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UldType {
    Ake, // 小型集装箱
    Akn, // 小型集装箱
    Blk, // 散货
    Pag, // 集装板
    Pmc, // 集装板
    Paj, // 集装板
}

impl UldType {
    /// 全部类型（界面下拉顺序）
    pub const ALL: [UldType; 6] = [
        UldType::Ake,
        UldType::Akn,
        UldType::Blk,
        UldType::Pag,
        UldType::Pmc,
        UldType::Paj,
    ];

    /// 报文代码
    pub fn code(&self) -> &'static str {
        match self {
            UldType::Ake => "AKE",
            UldType::Akn => "AKN",
            UldType::Blk => "BLK",
            UldType::Pag => "PAG",
            UldType::Pmc => "PMC",
            UldType::Paj => "PAJ",
        }
    }

    /// 从代码解析（不区分大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "AKE" => Some(UldType::Ake),
            "AKN" => Some(UldType::Akn),
            "BLK" => Some(UldType::Blk),
            "PAG" => Some(UldType::Pag),
            "PMC" => Some(UldType::Pmc),
            "PAJ" => Some(UldType::Paj),
            _ => None,
        }
    }

    /// 该类型可使用的舱位类别
    pub fn slot_class(&self) -> SlotClass {
        match self {
            UldType::Blk => SlotClass::Bulk,
            UldType::Ake | UldType::Akn => SlotClass::Container,
            UldType::Pag | UldType::Pmc | UldType::Paj => SlotClass::Pallet,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, UldType::Blk)
    }
}

impl fmt::Display for UldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 散货子类型 (Bulk Subtype)
// ==========================================
// FKT: 报文中以 E 表示, 强制重量为 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum BulkSubtype {
    #[default]
    By,
    Fkt,
}

impl BulkSubtype {
    pub fn code(&self) -> &'static str {
        match self {
            BulkSubtype::By => "BY",
            BulkSubtype::Fkt => "FKT",
        }
    }

    /// CPM 报文中的散货代码
    pub fn manifest_code(&self) -> &'static str {
        match self {
            BulkSubtype::By => "BY",
            BulkSubtype::Fkt => "E",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BY" => Some(BulkSubtype::By),
            "FKT" => Some(BulkSubtype::Fkt),
            _ => None,
        }
    }

    pub fn is_fkt(&self) -> bool {
        matches!(self, BulkSubtype::Fkt)
    }
}

impl fmt::Display for BulkSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 舱位类别 (Slot Class)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotClass {
    Container, // AKE/AKN 位
    Pallet,    // 集装板位, 后缀 P
    Bulk,      // 散货舱 51/52/53
}

impl fmt::Display for SlotClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotClass::Container => write!(f, "CONTAINER"),
            SlotClass::Pallet => write!(f, "PALLET"),
            SlotClass::Bulk => write!(f, "BULK"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uld_type_parse_and_display() {
        assert_eq!(UldType::parse("ake"), Some(UldType::Ake));
        assert_eq!(UldType::parse(" PMC "), Some(UldType::Pmc));
        assert_eq!(UldType::parse("XYZ"), None);
        assert_eq!(UldType::Paj.to_string(), "PAJ");
    }

    #[test]
    fn test_slot_class_mapping() {
        assert_eq!(UldType::Blk.slot_class(), SlotClass::Bulk);
        assert_eq!(UldType::Akn.slot_class(), SlotClass::Container);
        assert_eq!(UldType::Pag.slot_class(), SlotClass::Pallet);
    }

    #[test]
    fn test_bulk_subtype_codes() {
        assert_eq!(BulkSubtype::default(), BulkSubtype::By);
        assert_eq!(BulkSubtype::Fkt.manifest_code(), "E");
        assert_eq!(BulkSubtype::By.manifest_code(), "BY");
        assert_eq!(BulkSubtype::parse("fkt"), Some(BulkSubtype::Fkt));
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&UldType::Ake).unwrap();
        assert_eq!(json, "\"AKE\"");
        let parsed: BulkSubtype = serde_json::from_str("\"FKT\"").unwrap();
        assert_eq!(parsed, BulkSubtype::Fkt);
    }
}
