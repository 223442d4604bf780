//! 合规报告聚合：各匹配器的缺失项 → 每台设备一份报告
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use crate::rules::SectionOutcome;

pub const COMPLIANT_TEXT: &str = "Device is STIG compliant";
pub const NON_COMPLIANT_TEXT: &str = "Device is not STIG compliant, revisit the IOS_Template and check again\nThe device is missing the following commands\n\n";

/// 缺失项所属类别
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CategoryKind {
    /// 全局 STIG 命令
    Stig,
    /// 分段基线中的段落
    Section(String),
    /// 标准 ACL
    Acl(u32),
}

impl CategoryKind {
    /// 报告中的类别名称
    pub fn name(&self) -> String {
        match self {
            CategoryKind::Stig => "STIG".to_string(),
            CategoryKind::Section(key) => format!("Section {}", key),
            CategoryKind::Acl(number) => format!("ACL {}", number),
        }
    }

    /// 文本报告中的类别标题
    pub fn header(&self) -> String {
        match self {
            CategoryKind::Stig => r"//////// Missing the following commands \\\\\\\\".to_string(),
            CategoryKind::Section(key) => format!("Section {}: Missing commands:", key),
            CategoryKind::Acl(number) => {
                format!(r"//////// Missing the following from ACL {} \\\\\\\\", number)
            }
        }
    }
}

/// 单个类别的缺失列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCategory {
    pub kind: CategoryKind,
    pub name: String,
    pub missing: Vec<String>,
}

/// 单台设备的合规报告，生成后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub device_id: String,
    /// 固定顺序：STIG → 段落（段落顺序）→ ACL（编号升序）
    pub categories: Vec<MissingCategory>,
    /// 请求了但基线中不存在的段落键（不计入缺失）
    pub skipped_sections: Vec<String>,
    /// 设备未采集输出、未参与比较的 ACL 编号（不计入缺失）
    #[serde(default)]
    pub uncaptured_acls: Vec<u32>,
    pub compliant: bool,
}

impl ComplianceReport {
    /// 类别名称 → 缺失列表
    pub fn missing_by_category(&self) -> Vec<(&str, &[String])> {
        self.categories
            .iter()
            .map(|c| (c.name.as_str(), c.missing.as_slice()))
            .collect()
    }

    pub fn missing(&self, category_name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == category_name)
            .map(|c| c.missing.as_slice())
    }

    pub fn missing_count(&self) -> usize {
        self.categories.iter().map(|c| c.missing.len()).sum()
    }

    /// 全部缺失项（报告顺序）
    pub fn all_missing(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|c| c.missing.iter().cloned())
            .collect()
    }

    /// 是否所有请求的段落和 ACL 都实际参与了评估
    pub fn fully_evaluated(&self) -> bool {
        self.skipped_sections.is_empty() && self.uncaptured_acls.is_empty()
    }

    /// 展示层使用的文本报告
    pub fn text(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();
        for category in self.categories.iter().filter(|c| !c.missing.is_empty()) {
            let mut block = Vec::with_capacity(category.missing.len() + 1);
            block.push(category.kind.header());
            for item in &category.missing {
                match category.kind {
                    CategoryKind::Section(_) => block.push(format!("  {}", item)),
                    _ => block.push(item.clone()),
                }
            }
            blocks.push(block.join("\n"));
        }

        let mut text = if blocks.is_empty() {
            COMPLIANT_TEXT.to_string()
        } else {
            format!("{}{}", NON_COMPLIANT_TEXT, blocks.join("\n\n"))
        };

        let warnings: Vec<String> = self
            .skipped_sections
            .iter()
            .map(|key| format!("Section '{}' not found in golden config.", key))
            .chain(
                self.uncaptured_acls
                    .iter()
                    .map(|number| format!("ACL {} output not captured, not compared.", number)),
            )
            .collect();
        if !warnings.is_empty() {
            text.push_str("\n\n");
            text.push_str(&warnings.join("\n"));
        }

        text
    }
}

impl Display for ComplianceReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// 报告聚合器（消费式构建）
/// 调用顺序不影响输出顺序
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    device_id: String,
    stig: Option<Vec<String>>,
    sections: Option<SectionOutcome>,
    acls: BTreeMap<u32, Vec<String>>,
    uncaptured_acls: Vec<u32>,
}

impl ReportAggregator {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    pub fn stig(mut self, missing: Vec<String>) -> Self {
        self.stig = Some(missing);
        self
    }

    pub fn sections(mut self, outcome: SectionOutcome) -> Self {
        self.sections = Some(outcome);
        self
    }

    pub fn acl(mut self, number: u32, missing: Vec<String>) -> Self {
        self.acls.insert(number, missing);
        self
    }

    /// 设备没有该 ACL 的采集输出
    pub fn acl_not_captured(mut self, number: u32) -> Self {
        self.uncaptured_acls.push(number);
        self
    }

    pub fn finish(mut self) -> ComplianceReport {
        let mut categories = Vec::new();
        let mut skipped_sections = Vec::new();

        if let Some(missing) = self.stig {
            categories.push(Self::category(CategoryKind::Stig, missing));
        }

        if let Some(outcome) = self.sections {
            for section in outcome.sections {
                categories.push(Self::category(CategoryKind::Section(section.key), section.missing));
            }
            skipped_sections = outcome.skipped_sections;
        }

        // BTreeMap 保证 ACL 编号升序
        for (number, missing) in self.acls {
            categories.push(Self::category(CategoryKind::Acl(number), missing));
        }

        self.uncaptured_acls.sort_unstable();
        self.uncaptured_acls.dedup();

        let compliant = categories.iter().all(|c| c.missing.is_empty());
        log::info!(
            "Device [{}] {}: {} missing item(s) across {} categories",
            self.device_id,
            if compliant { "compliant" } else { "not compliant" },
            categories.iter().map(|c| c.missing.len()).sum::<usize>(),
            categories.len()
        );

        ComplianceReport {
            device_id: self.device_id,
            categories,
            skipped_sections,
            uncaptured_acls: self.uncaptured_acls,
            compliant,
        }
    }

    fn category(kind: CategoryKind, missing: Vec<String>) -> MissingCategory {
        MissingCategory {
            name: kind.name(),
            kind,
            missing,
        }
    }
}
