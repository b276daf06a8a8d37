// ==========================================
// 货舱 ULD 配载系统 - CPM 报文生成引擎
// ==========================================
// 职责: 将校验通过的装载记录序列化为 CPM (Cargo Position Message)
// 红线: 只读, 不修改装载记录
// ==========================================
// 规则:
// 1. 互斥舱位不输出
// 2. 集装板位及其覆盖的集装箱位均无货 → 只输出集装板位
// 3. 集装箱位左右配对合并为一行
// 4. 散货舱 51/52/53 总是输出
// 5. 按舱位数字前缀升序; 末行为总重量汇总
// ==========================================

mod core;
mod segment;

#[cfg(test)]
mod tests;

pub use self::core::{CpmManifest, ManifestFormatter, ManifestLine, ManifestRequest};
pub use segment::{format_segment, numeric_prefix};
