//! 单台设备的一次完整比对：规范化 → 匹配/规则评估 → 聚合
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{AclView, BaselineSet, HeaderAliases, RunningConfigView, SectionedBaseline};
use crate::matcher::BaselineMatcher;
use crate::report::{ComplianceReport, ReportAggregator};
use crate::rules::{ExceptionRuleEngine, RuleTable};

/// 一次运行使用的全部金标准，由调用方构建并持有
#[derive(Debug, Clone, Default)]
pub struct GoldenBaseline {
    /// 全局 STIG 命令（纯文本格式）
    pub stig: Option<BaselineSet>,
    /// STIG 条目的等价别名（默认 archived_configs 两种路径）
    pub stig_aliases: Option<HeaderAliases>,
    /// JSON 分段基线
    pub sectioned: Option<SectionedBaseline>,
    /// 要评估的段落键，空 = 全部
    pub section_keys: Vec<String>,
    /// ACL 编号 → 金标准
    pub acls: BTreeMap<u32, BaselineSet>,
}

impl GoldenBaseline {
    pub fn is_empty(&self) -> bool {
        self.stig.is_none() && self.sectioned.is_none() && self.acls.is_empty()
    }
}

/// 协作层交付的设备输出（已读取的文本）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceOutput {
    pub device_id: String,
    pub running_config: String,
    /// ACL 编号 → `show access-list N` 输出
    pub acl_outputs: BTreeMap<u32, String>,
}

impl DeviceOutput {
    pub fn new(device_id: impl Into<String>, running_config: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            running_config: running_config.into(),
            acl_outputs: BTreeMap::new(),
        }
    }

    pub fn with_acl(mut self, number: u32, output: impl Into<String>) -> Self {
        self.acl_outputs.insert(number, output.into());
        self
    }
}

/// 比对流程
/// 无共享可变状态，多台设备可并发调用同一实例
#[derive(Debug, Clone, Default)]
pub struct ComparisonPass {
    rules: ExceptionRuleEngine,
}

impl ComparisonPass {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self {
            rules: ExceptionRuleEngine::new(table),
        }
    }

    pub fn run(&self, golden: &GoldenBaseline, device: &DeviceOutput) -> ComplianceReport {
        let view = RunningConfigView::from_raw(device.running_config.as_str());
        log::debug!(
            "Device [{}]: running config normalized to {} unique line(s)",
            device.device_id,
            view.len()
        );

        let mut aggregator = ReportAggregator::new(device.device_id.as_str());

        if let Some(stig) = &golden.stig {
            let matcher = match &golden.stig_aliases {
                Some(aliases) => BaselineMatcher::with_aliases(aliases.clone()),
                None => BaselineMatcher::new(),
            };
            aggregator = aggregator.stig(matcher.match_set(stig.clone(), &view).missing);
        }

        if let Some(sectioned) = &golden.sectioned {
            let outcome = self.rules.evaluate(sectioned, &golden.section_keys, &view);
            aggregator = aggregator.sections(outcome);
        }

        for (number, baseline) in &golden.acls {
            // 未采集 ≠ 设备上不存在该 ACL（空输出）
            let Some(raw) = device.acl_outputs.get(number) else {
                log::warn!("Device [{}]: access-list {} not captured, skipped", device.device_id, number);
                aggregator = aggregator.acl_not_captured(*number);
                continue;
            };
            let acl_view = AclView::from_raw(*number, raw.as_str());
            let outcome = BaselineMatcher::for_acl(*number).match_set(baseline.clone(), &acl_view);
            aggregator = aggregator.acl(*number, outcome.missing);
        }

        aggregator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Section;

    fn golden() -> GoldenBaseline {
        let mut acls = BTreeMap::new();
        acls.insert(
            5,
            BaselineSet::from_lines("acl 5", ["ip access-list standard 5", "10 permit 10.5.0.0 0.0.255.255"]),
        );
        acls.insert(
            1,
            BaselineSet::from_lines("acl 1", ["ip access-list standard 1", "10 permit 10.0.0.0"]),
        );

        GoldenBaseline {
            stig: Some(BaselineSet::from_lines(
                "stig",
                ["path flash:/archived_configs", "ip ssh version 2", "no ip http server"],
            )),
            stig_aliases: Some(HeaderAliases::archived_configs()),
            sectioned: Some(SectionedBaseline::from_sections(vec![Section {
                key: "2.1".to_string(),
                commands: vec!["username networks privilege 0 secret 9 $9$x".to_string()],
            }])),
            section_keys: Vec::new(),
            acls,
        }
    }

    #[test]
    fn test_full_pass_compliant() {
        let device = DeviceOutput::new(
            "R1",
            "ip ssh version 2\nno ip http server\nusername networks privilege 0 secret 9 $9$other\n",
        )
        .with_acl(1, "Standard IP access list 1\n    10 permit 10.0.0.0, wildcard bits 0.0.0.255 (3 matches)\n")
        .with_acl(5, "Standard IP access list 5\n    10 permit 10.5.0.0, wildcard bits 0.0.255.255\n");

        let report = ComparisonPass::default().run(&golden(), &device);
        assert!(report.compliant, "{}", report.text());
        assert_eq!(report.text(), "Device is STIG compliant");
    }

    #[test]
    fn test_full_pass_missing_items() {
        let device = DeviceOutput::new("R2", "ip ssh version 2\n")
            .with_acl(1, "")
            .with_acl(5, "Standard IP access list 5\n");
        let report = ComparisonPass::default().run(&golden(), &device);

        assert!(!report.compliant);
        assert_eq!(report.missing("STIG"), Some(&["no ip http server".to_string()][..]));
        assert_eq!(report.missing("Section 2.1").map(|m| m.len()), Some(1));
        assert_eq!(report.missing("ACL 1"), Some(&["10 permit 10.0.0.0".to_string()][..]));
        assert_eq!(report.missing("ACL 5").map(|m| m.len()), Some(1));

        let names: Vec<&str> = report.missing_by_category().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["STIG", "Section 2.1", "ACL 1", "ACL 5"]);
    }

    #[test]
    fn test_uncaptured_acl_not_compared() {
        let device = DeviceOutput::new(
            "R4",
            "ip ssh version 2\nno ip http server\nusername networks privilege 0 secret 9 $9$y\n",
        )
        .with_acl(1, "Standard IP access list 1\n    10 permit 10.0.0.0\n");
        let report = ComparisonPass::default().run(&golden(), &device);

        assert!(report.compliant, "{}", report.text());
        assert!(report.missing("ACL 5").is_none());
        assert_eq!(report.uncaptured_acls, vec![5]);
        assert!(!report.fully_evaluated());
    }

    #[test]
    fn test_pass_does_not_touch_golden() {
        let golden = golden();
        let device = DeviceOutput::new("R3", "ip ssh version 2\n");
        let _ = ComparisonPass::default().run(&golden, &device);
        assert_eq!(golden.stig.as_ref().map(BaselineSet::satisfied_count), Some(0));
    }
}
