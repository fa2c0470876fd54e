use crate::domain::model::ReferenceSection;
use crate::utils::error::Result;
use serde::Deserialize;

const REFERENCE_TOML: &str = include_str!("../../assets/reference.toml");

#[derive(Debug, Deserialize)]
struct ReferenceContent {
    section: Vec<ReferenceSection>,
}

/// 取得樣本數、信賴水準與測試期間的參考公式
pub fn reference_sections() -> Result<Vec<ReferenceSection>> {
    let content: ReferenceContent = toml::from_str(REFERENCE_TOML)?;
    Ok(content.section)
}
