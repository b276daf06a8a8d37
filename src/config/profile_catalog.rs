// ==========================================
// 货舱 ULD 配载系统 - 机型档案目录
// ==========================================
// 职责: 内置机型档案 + JSON 档案文件, 按注册号查找
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::profile::{AircraftProfile, ProfileDefinition, ProfileError};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// 内置档案: A330-223F EC-NOG
pub fn ec_nog_definition() -> ProfileDefinition {
    let container_positions = codes(&[
        // 前货舱
        "26L", "25L", "24L", "23L", "22L", "21L", "13L", "12L", "11L", //
        "26R", "25R", "24R", "23R", "22R", "21R", "13R", "12R", "11R", //
        // 后货舱
        "43L", "42L", "41L", "34L", "33L", "32L", "31L", //
        "43R", "42R", "41R", "34R", "33R", "32R", "31R",
    ]);

    let pallet_positions = codes(&[
        // 前货舱
        "24P", "23P", "22P", "21P", "12P", "11P", //
        // 后货舱
        "42P", "41P", "33P", "32P", "31P",
    ]);

    let blocks: [(&str, &[&str]); 11] = [
        // 前货舱
        ("24P", &["26L", "26R", "25L", "25R"]),
        ("23P", &["25L", "25R", "24L", "24R"]),
        ("22P", &["23L", "23R", "22L", "22R"]),
        ("21P", &["22L", "22R", "21L", "21R"]),
        ("12P", &["13L", "13R", "12L", "12R"]),
        ("11P", &["12L", "12R", "11L", "11R"]),
        // 后货舱
        ("42P", &["43L", "43R", "42L", "42R"]),
        ("41P", &["42L", "42R", "41L", "41R"]),
        ("33P", &["34L", "34R", "33L", "33R"]),
        ("32P", &["33L", "33R", "32L", "32R"]),
        ("31P", &["31L", "31R"]),
    ];
    let pallet_blocks: BTreeMap<String, Vec<String>> = blocks
        .iter()
        .map(|(pallet, containers)| (pallet.to_string(), codes(containers)))
        .collect();

    ProfileDefinition {
        registration: "EC-NOG".to_string(),
        aircraft_type: "A330-223F".to_string(),
        container_positions,
        pallet_positions,
        pallet_blocks,
        container_pairs: None,
    }
}

/// 单元测试用: 内置 EC-NOG 档案
#[cfg(test)]
pub(crate) fn ec_nog_profile() -> AircraftProfile {
    AircraftProfile::from_definition(ec_nog_definition()).unwrap()
}

// ==========================================
// ProfileCatalog - 机型档案目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: BTreeMap<String, AircraftProfile>,
}

impl ProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 含全部内置档案
    pub fn with_builtins() -> Result<Self, ProfileError> {
        let mut catalog = Self::new();
        catalog.register(AircraftProfile::from_definition(ec_nog_definition())?);
        Ok(catalog)
    }

    /// 注册档案, 同注册号覆盖并返回旧档案
    pub fn register(&mut self, profile: AircraftProfile) -> Option<AircraftProfile> {
        let registration = profile.registration().to_string();
        let replaced = self.profiles.insert(registration.clone(), profile);
        if replaced.is_some() {
            warn!(registration = %registration, "机型档案已被覆盖");
        }
        replaced
    }

    /// 从 JSON 文件加载档案并注册
    pub fn load_file(&mut self, path: &Path) -> Result<&AircraftProfile, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
            path: path.display().to_string(),
            source,
        })?;
        let definition: ProfileDefinition =
            serde_json::from_str(&raw).map_err(|source| ConfigError::ParseError {
                path: path.display().to_string(),
                source,
            })?;
        let profile = AircraftProfile::from_definition(definition)?;
        let registration = profile.registration().to_string();

        info!(
            path = %path.display(),
            registration = %registration,
            aircraft_type = %profile.aircraft_type(),
            containers = profile.container_positions().len(),
            pallets = profile.pallet_positions().len(),
            "机型档案加载完成"
        );

        match self.profiles.entry(registration) {
            Entry::Occupied(mut entry) => {
                warn!(registration = %entry.key(), "机型档案已被覆盖");
                entry.insert(profile);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(profile)),
        }
    }

    /// 按注册号查找（不区分大小写）
    pub fn find(&self, registration: &str) -> Option<&AircraftProfile> {
        self.profiles.get(&registration.trim().to_uppercase())
    }

    pub fn registrations(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &AircraftProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
