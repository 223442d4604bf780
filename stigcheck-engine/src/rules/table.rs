use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::RuleCategory;
use crate::error::{CoreError, CoreResult};

/// 例外规则中与站点相关的参数
/// 其余部分（命令关键字、可接受的变体）固定不变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleParams {
    pub domain_name: String,
    pub password_policy: String,
    pub restricted_user: String,
    pub ntp_key_ids: Vec<u32>,
    pub logging_host: String,
    pub logging_ports: Vec<u16>,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            domain_name: "test.com".to_string(),
            password_policy: "PW_POLICY".to_string(),
            restricted_user: "networks".to_string(),
            ntp_key_ids: vec![31, 32],
            logging_host: "192.168.1.1".to_string(),
            logging_ports: vec![10514, 10516],
        }
    }
}

/// 内置规则表（默认参数），进程内只编译一次，只读共享
static BUILTIN_RULE_TABLE: Lazy<Arc<RuleTable>> = Lazy::new(|| {
    let table = RuleTable::from_params(&RuleParams::default()).unwrap_or_else(|e| {
        panic!("built-in rule patterns must compile: {}", e);
    });
    Arc::new(table)
});

/// 单条编译后的类别规则
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: RuleCategory,
    pub regex: Regex,
}

/// 类别 → 正则 的声明式规则表
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
}

impl RuleTable {
    /// 内置规则表
    pub fn builtin() -> Arc<RuleTable> {
        BUILTIN_RULE_TABLE.clone()
    }

    /// 按参数编译规则表，字面部分全部转义
    pub fn from_params(params: &RuleParams) -> CoreResult<Self> {
        if params.ntp_key_ids.is_empty() || params.logging_ports.is_empty() {
            return Err(CoreError::InvalidInput(
                "ntp_key_ids and logging_ports must not be empty".to_string(),
            ));
        }

        let mut rules = Vec::with_capacity(RuleCategory::ALL.len());
        for category in RuleCategory::ALL {
            let pattern = Self::pattern_source(category, params);
            log::debug!("Compiling rule [{}]: {}", category, pattern);
            rules.push(CategoryRule {
                category,
                regex: Regex::new(&pattern)?,
            });
        }
        Ok(Self { rules })
    }

    /// 生成类别的正则源码
    /// 锚定行首；站点相关字段之后必须是空白或行尾，不接受更长的同前缀取值
    fn pattern_source(category: RuleCategory, params: &RuleParams) -> String {
        match category {
            RuleCategory::DomainName => {
                format!(r"^ip domain(-| )name {}(\s|$)", regex::escape(&params.domain_name))
            }
            RuleCategory::SshEncryption => r"^ip ssh server algorithm encryption aes256.*".to_string(),
            RuleCategory::AaaPasswordPolicy => format!(
                r"^aaa common-criteria policy {}(\s|$)",
                regex::escape(&params.password_policy)
            ),
            RuleCategory::RestrictedUsername => format!(
                r"^username {} privilege 0(\s|$)",
                regex::escape(&params.restricted_user)
            ),
            RuleCategory::NtpAuthenticationKey => format!(
                r"^ntp authentication-key ({}) sha(1|2)(\s|$)",
                join_alternatives(&params.ntp_key_ids)
            ),
            RuleCategory::RemoteLoggingHost => format!(
                r"^logging host {} transport udp port ({})(\s|$)",
                regex::escape(&params.logging_host),
                join_alternatives(&params.logging_ports)
            ),
        }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// 用基线命令本身判断所属类别（不是用运行配置行）
    pub fn classify(&self, command: &str) -> Option<RuleCategory> {
        self.rules
            .iter()
            .find(|rule| rule.regex.is_match(command))
            .map(|rule| rule.category)
    }

    pub fn regex(&self, category: RuleCategory) -> Option<&Regex> {
        self.rules
            .iter()
            .find(|rule| rule.category == category)
            .map(|rule| &rule.regex)
    }

    /// 运行配置中是否存在任意一行匹配该类别
    pub fn any_line_matches<'a, I>(&self, category: RuleCategory, lines: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        let Some(regex) = self.regex(category) else {
            return false;
        };
        lines.into_iter().any(|line| regex.is_match(line))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::builtin().as_ref().clone()
    }
}

fn join_alternatives<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| regex::escape(&v.to_string()))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_builtin_categories() {
        let table = RuleTable::builtin();
        let cases = [
            ("ip domain-name test.com", Some(RuleCategory::DomainName)),
            ("ip domain name test.com", Some(RuleCategory::DomainName)),
            ("ip ssh server algorithm encryption aes256-ctr", Some(RuleCategory::SshEncryption)),
            ("aaa common-criteria policy PW_POLICY", Some(RuleCategory::AaaPasswordPolicy)),
            ("username networks privilege 0 secret 9 $9$abc", Some(RuleCategory::RestrictedUsername)),
            ("ntp authentication-key 31 sha1 7 0123ABCD", Some(RuleCategory::NtpAuthenticationKey)),
            ("logging host 192.168.1.1 transport udp port 10516", Some(RuleCategory::RemoteLoggingHost)),
            ("ip ssh version 2", None),
            ("ntp authentication-key 30 sha1 7 0123ABCD", None),
        ];
        for (command, expected) in cases {
            assert_eq!(table.classify(command), expected, "command: {}", command);
        }
    }

    #[test]
    fn test_literal_parts_are_escaped() {
        let table = RuleTable::builtin();
        // `.` 不能当作任意字符
        assert_eq!(table.classify("ip domain-name testXcom"), None);
        assert_eq!(table.classify("logging host 192x168x1x1 transport udp port 10514"), None);
    }

    #[test]
    fn test_site_fields_end_at_word_boundary() {
        let table = RuleTable::builtin();
        assert_eq!(table.classify("ip domain name test.community"), None);
        assert_eq!(table.classify("aaa common-criteria policy PW_POLICY_LEGACY"), None);
        assert_eq!(table.classify("logging host 192.168.1.1 transport udp port 105149"), None);
        assert_eq!(table.classify("username networksadmin privilege 0 secret 9 $9$x"), None);
        assert_eq!(table.classify("ntp authentication-key 31 sha256 7 FF"), None);
        assert_eq!(
            table.classify("aaa common-criteria policy PW_POLICY"),
            Some(RuleCategory::AaaPasswordPolicy)
        );
    }

    #[test]
    fn test_custom_params() {
        let params = RuleParams {
            domain_name: "corp.example".to_string(),
            ntp_key_ids: vec![7],
            ..RuleParams::default()
        };
        let table = RuleTable::from_params(&params).unwrap();
        assert_eq!(table.classify("ip domain name corp.example"), Some(RuleCategory::DomainName));
        assert_eq!(table.classify("ip domain name test.com"), None);
        assert_eq!(table.classify("ntp authentication-key 7 sha2 7 FF"), Some(RuleCategory::NtpAuthenticationKey));
    }

    #[test]
    fn test_empty_alternatives_rejected() {
        let params = RuleParams {
            logging_ports: Vec::new(),
            ..RuleParams::default()
        };
        assert!(matches!(RuleTable::from_params(&params), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_any_line_matches() {
        let table = RuleTable::builtin();
        let lines = vec!["hostname R1".to_string(), "ntp authentication-key 32 sha2 7 FFEE".to_string()];
        assert!(table.any_line_matches(RuleCategory::NtpAuthenticationKey, &lines));
        assert!(!table.any_line_matches(RuleCategory::SshEncryption, &lines));
    }
}
