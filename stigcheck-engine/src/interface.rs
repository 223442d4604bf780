//! 接入端口审计：access 口必须有描述且不能处于 shutdown
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static INTERFACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^interface\s+(\S+)").unwrap());
static DESCRIPTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^description\s+(.+)").unwrap());
static ACCESS_VLAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^switchport access vlan \d+").unwrap());

/// 单个接口的记录结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPortFinding {
    pub interface: String,
    /// `switchport access vlan N` 原文
    pub access_vlan: Option<String>,
    pub description: Option<String>,
    pub shutdown: bool,
}

impl AccessPortFinding {
    pub fn is_access_port(&self) -> bool {
        self.access_vlan.is_some()
    }

    /// 非 access 口不在检查范围内，视为合规
    pub fn is_compliant(&self) -> bool {
        !self.is_access_port() || (self.description.is_some() && !self.shutdown)
    }
}

/// 遍历运行配置中的接口块，按出现顺序返回所有接口
pub fn audit_access_ports(running_config: &str) -> Vec<AccessPortFinding> {
    let mut findings: Vec<AccessPortFinding> = Vec::new();

    for line in running_config.lines().map(str::trim) {
        if let Some(caps) = INTERFACE_REGEX.captures(line) {
            findings.push(AccessPortFinding {
                interface: caps[1].to_string(),
                ..AccessPortFinding::default()
            });
            continue;
        }

        let Some(current) = findings.last_mut() else {
            continue;
        };

        if let Some(m) = ACCESS_VLAN_REGEX.find(line) {
            current.access_vlan = Some(m.as_str().to_string());
        } else if let Some(caps) = DESCRIPTION_REGEX.captures(line) {
            current.description = Some(caps[1].trim().to_string());
        } else if line == "shutdown" {
            current.shutdown = true;
        }
    }

    let non_compliant = findings.iter().filter(|f| !f.is_compliant()).count();
    log::debug!(
        "Access port audit: {} interface(s), {} non-compliant",
        findings.len(),
        non_compliant
    );

    findings
}

/// 仅返回不合规的接入端口
pub fn non_compliant_access_ports(running_config: &str) -> Vec<AccessPortFinding> {
    audit_access_ports(running_config)
        .into_iter()
        .filter(|f| !f.is_compliant())
        .collect()
}
