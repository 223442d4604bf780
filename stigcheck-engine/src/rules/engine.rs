use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{ConfigLines, RunningConfigView, SatisfiedBy, SectionedBaseline};
use crate::rules::RuleTable;
use crate::utils::{preview_compact, preview_list};

/// 单个段落的缺失命令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMissing {
    pub key: String,
    pub missing: Vec<String>,
}

/// 分段基线评估结果
/// 缺失段落键单独记录，不并入缺失命令，便于与"段落全部满足"区分
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOutcome {
    /// 按段落顺序的缺失命令（仅包含实际评估过的段落）
    pub sections: Vec<SectionMissing>,
    /// 基线中不存在、被跳过的段落键
    pub skipped_sections: Vec<String>,
}

impl SectionOutcome {
    pub fn missing_for(&self, key: &str) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.missing.as_slice())
    }

    /// 按段落顺序展平
    pub fn flatten(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|s| s.missing.iter().cloned())
            .collect()
    }

    pub fn is_satisfied(&self) -> bool {
        self.sections.iter().all(|s| s.missing.is_empty())
    }
}

/// 例外规则引擎
/// 命令满足条件：字面整行存在，或命令属于某规则类别且运行配置中有任意一行匹配该类别
#[derive(Debug, Clone)]
pub struct ExceptionRuleEngine {
    table: Arc<RuleTable>,
}

impl Default for ExceptionRuleEngine {
    fn default() -> Self {
        Self::new(RuleTable::builtin())
    }
}

impl ExceptionRuleEngine {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }

    /// 判断单条命令的满足途径
    /// 正则不匹配本身不代表不合规，只决定是否走规则路径
    pub fn resolve(&self, command: &str, view: &RunningConfigView) -> Option<SatisfiedBy> {
        if view.contains(command) {
            return Some(SatisfiedBy::Literal);
        }

        let category = self.table.classify(command)?;
        if self.table.any_line_matches(category, view.line_set()) {
            return Some(SatisfiedBy::Rule(category));
        }
        None
    }

    /// 评估请求的段落；`section_keys` 为空时评估基线中的全部段落
    pub fn evaluate(
        &self,
        baseline: &SectionedBaseline,
        section_keys: &[String],
        view: &RunningConfigView,
    ) -> SectionOutcome {
        let keys: Vec<String> = if section_keys.is_empty() {
            baseline.keys()
        } else {
            section_keys.to_vec()
        };

        let mut outcome = SectionOutcome::default();

        for key in keys {
            let Some(section) = baseline.get(&key) else {
                log::warn!("Section '{}' not found in golden config, skipped", key);
                outcome.skipped_sections.push(key);
                continue;
            };

            let mut missing = Vec::new();
            for command in &section.commands {
                let command = command.trim();
                if command.is_empty() {
                    continue;
                }
                match self.resolve(command, view) {
                    Some(SatisfiedBy::Rule(category)) => {
                        log::debug!(
                            "Section {}: [{}] accepted by rule [{}]",
                            key,
                            preview_compact(command, 60),
                            category
                        );
                    }
                    Some(_) => {}
                    None => missing.push(command.to_string()),
                }
            }

            if !missing.is_empty() {
                log::debug!("Section {} missing: {}", key, preview_list(&missing));
            }
            outcome.sections.push(SectionMissing { key, missing });
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RuleCategory, Section};

    fn baseline() -> SectionedBaseline {
        SectionedBaseline::from_sections(vec![
            Section {
                key: "1.1".to_string(),
                commands: vec![
                    "ip domain-name test.com".to_string(),
                    "ip ssh version 2".to_string(),
                ],
            },
            Section {
                key: "1.2".to_string(),
                commands: vec![
                    "ntp authentication-key 31 sha1 7 0822455D0A16".to_string(),
                    "logging host 192.168.1.1 transport udp port 10514".to_string(),
                ],
            },
        ])
    }

    #[test]
    fn test_literal_and_rule_paths() {
        let view = RunningConfigView::from_raw(
            "ip domain name test.com\nip ssh version 2\nntp authentication-key 32 sha2 7 1511021F0725\n",
        );
        let engine = ExceptionRuleEngine::default();
        let outcome = engine.evaluate(&baseline(), &[], &view);

        assert_eq!(outcome.missing_for("1.1").map(|m| m.is_empty()), Some(true));
        assert_eq!(
            outcome.missing_for("1.2"),
            Some(&["logging host 192.168.1.1 transport udp port 10514".to_string()][..])
        );
        assert!(outcome.skipped_sections.is_empty());
    }

    #[test]
    fn test_ntp_variants_accepted() {
        let engine = ExceptionRuleEngine::default();
        let view = RunningConfigView::from_raw("ntp authentication-key 32 sha2 7 ABCDEF");
        assert_eq!(
            engine.resolve("ntp authentication-key 31 sha1 7 0822455D0A16", &view),
            Some(SatisfiedBy::Rule(RuleCategory::NtpAuthenticationKey))
        );

        let view = RunningConfigView::from_raw("ntp server 10.0.0.1 key 31");
        assert_eq!(engine.resolve("ntp authentication-key 31 sha1 7 0822455D0A16", &view), None);
    }

    #[test]
    fn test_near_miss_site_values_rejected() {
        let engine = ExceptionRuleEngine::default();
        let cases = [
            ("ip domain name test.com", "ip domain name test.community"),
            ("aaa common-criteria policy PW_POLICY", "aaa common-criteria policy PW_POLICY_LEGACY"),
            (
                "logging host 192.168.1.1 transport udp port 10514",
                "logging host 192.168.1.1 transport udp port 105149",
            ),
        ];
        for (command, running) in cases {
            let view = RunningConfigView::from_raw(running);
            assert_eq!(engine.resolve(command, &view), None, "running: {}", running);
        }

        // 精确取值的另一种写法仍然接受
        let view = RunningConfigView::from_raw("aaa common-criteria policy PW_POLICY\n ip domain-name test.com\n");
        assert_eq!(
            engine.resolve("ip domain name test.com", &view),
            Some(SatisfiedBy::Rule(RuleCategory::DomainName))
        );
    }

    #[test]
    fn test_unclassified_command_needs_literal() {
        let engine = ExceptionRuleEngine::default();
        let view = RunningConfigView::from_raw("ip ssh version 1");
        assert_eq!(engine.resolve("ip ssh version 2", &view), None);
    }

    #[test]
    fn test_missing_section_is_skipped_not_compliant() {
        let engine = ExceptionRuleEngine::default();
        let view = RunningConfigView::from_raw("ip ssh version 2");
        let outcome = engine.evaluate(&baseline(), &["9.9".to_string()], &view);

        assert_eq!(outcome.skipped_sections, vec!["9.9"]);
        assert!(outcome.sections.is_empty());
        assert!(outcome.missing_for("9.9").is_none());
    }

    #[test]
    fn test_flatten_in_section_order() {
        let engine = ExceptionRuleEngine::default();
        let view = RunningConfigView::from_raw("");
        let outcome = engine.evaluate(&baseline(), &["1.2".to_string(), "1.1".to_string()], &view);
        assert_eq!(
            outcome.flatten(),
            vec![
                "ntp authentication-key 31 sha1 7 0822455D0A16",
                "logging host 192.168.1.1 transport udp port 10514",
                "ip domain-name test.com",
                "ip ssh version 2",
            ]
        );
    }
}
