//! 审计配置管理
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stigcheck_engine::{HeaderAliases, RuleParams};

use crate::error::{StigError, StigResult};

/// ACL 金标准文件名模板中的占位符
pub const ACL_NUMBER_PLACEHOLDER: &str = "{n}";

/// 完整审计配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// 金标准文件所在目录
    pub golden_dir: PathBuf,
    /// 纯文本 STIG 金标准（None = 不检查）
    pub stig_file: Option<String>,
    /// JSON 分段金标准（None = 不检查）
    pub sectioned_file: Option<String>,
    /// 需要检查的标准 ACL 编号
    pub acl_numbers: Vec<u32>,
    /// ACL 金标准文件名模板，`{n}` 替换为 ACL 编号
    pub acl_file_template: String,
    /// 要评估的段落键，空 = 全部
    pub section_keys: Vec<String>,
    /// STIG 条目等价别名
    pub stig_aliases: Option<HeaderAliases>,
    /// 例外规则参数
    pub rule_params: RuleParams,
    /// 设备采集目录中的运行配置文件名
    pub running_config_file: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            golden_dir: PathBuf::from("golden"),
            stig_file: Some("golden_stig_file.txt".to_string()),
            sectioned_file: Some("golden_config.json".to_string()),
            acl_numbers: vec![1, 2, 5, 55],
            acl_file_template: "golden_acl{n}_file.txt".to_string(),
            section_keys: Vec::new(),
            stig_aliases: Some(HeaderAliases::archived_configs()),
            rule_params: RuleParams::default(),
            running_config_file: "running_config.txt".to_string(),
        }
    }
}

impl AuditConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_json_file(path: impl AsRef<Path>) -> StigResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            StigError::ConfigError(format!("cannot read config [{}]: {}", path.display(), e))
        })?;
        let config: AuditConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        log::debug!("Audit config loaded from [{}]", path.display());
        Ok(config)
    }

    /// 基本合法性检查
    pub fn validate(&self) -> StigResult<()> {
        if !self.acl_numbers.is_empty() && !self.acl_file_template.contains(ACL_NUMBER_PLACEHOLDER) {
            return Err(StigError::ConfigError(format!(
                "acl_file_template [{}] must contain {}",
                self.acl_file_template, ACL_NUMBER_PLACEHOLDER
            )));
        }
        if self.running_config_file.trim().is_empty() {
            return Err(StigError::ConfigError("running_config_file must not be empty".into()));
        }
        Ok(())
    }

    pub fn stig_path(&self) -> Option<PathBuf> {
        self.stig_file.as_ref().map(|f| self.golden_dir.join(f))
    }

    pub fn sectioned_path(&self) -> Option<PathBuf> {
        self.sectioned_file.as_ref().map(|f| self.golden_dir.join(f))
    }

    /// ACL 金标准完整路径
    pub fn acl_path(&self, number: u32) -> PathBuf {
        let file_name = self
            .acl_file_template
            .replace(ACL_NUMBER_PLACEHOLDER, &number.to_string());
        self.golden_dir.join(file_name)
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: AuditConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn golden_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.golden_dir = path.into();
        self
    }

    pub fn stig_file(mut self, file: Option<&str>) -> Self {
        self.config.stig_file = file.map(str::to_string);
        self
    }

    pub fn sectioned_file(mut self, file: Option<&str>) -> Self {
        self.config.sectioned_file = file.map(str::to_string);
        self
    }

    pub fn acl_numbers(mut self, numbers: Vec<u32>) -> Self {
        self.config.acl_numbers = numbers;
        self
    }

    pub fn acl_file_template(mut self, template: impl Into<String>) -> Self {
        self.config.acl_file_template = template.into();
        self
    }

    pub fn section_keys(mut self, keys: Vec<String>) -> Self {
        self.config.section_keys = keys;
        self
    }

    pub fn stig_aliases(mut self, aliases: Option<HeaderAliases>) -> Self {
        self.config.stig_aliases = aliases;
        self
    }

    pub fn rule_params(mut self, params: RuleParams) -> Self {
        self.config.rule_params = params;
        self
    }

    pub fn running_config_file(mut self, file: impl Into<String>) -> Self {
        self.config.running_config_file = file.into();
        self
    }

    pub fn build(self) -> StigResult<AuditConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
