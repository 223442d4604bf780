use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// 例外规则类别：命中这些类别的基线命令允许以多种写法满足
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    DomainName,
    SshEncryption,
    AaaPasswordPolicy,
    RestrictedUsername,
    NtpAuthenticationKey,
    RemoteLoggingHost,
}

impl RuleCategory {
    /// 固定的类别集合（评估顺序）
    pub const ALL: [RuleCategory; 6] = [
        RuleCategory::DomainName,
        RuleCategory::SshEncryption,
        RuleCategory::AaaPasswordPolicy,
        RuleCategory::RestrictedUsername,
        RuleCategory::NtpAuthenticationKey,
        RuleCategory::RemoteLoggingHost,
    ];
}

impl Display for RuleCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleCategory::DomainName => write!(f, "domain name"),
            RuleCategory::SshEncryption => write!(f, "ssh encryption"),
            RuleCategory::AaaPasswordPolicy => write!(f, "aaa password policy"),
            RuleCategory::RestrictedUsername => write!(f, "restricted username"),
            RuleCategory::NtpAuthenticationKey => write!(f, "ntp authentication key"),
            RuleCategory::RemoteLoggingHost => write!(f, "remote logging host"),
        }
    }
}

/// 命令被满足的途径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "path", content = "category")]
pub enum SatisfiedBy {
    /// 头部别名
    Alias,
    /// 字面整行
    Literal,
    /// 例外规则（类别正则）
    Rule(RuleCategory),
}
