// 核心数据模型：基线条目/集合、运行配置视图、分段基线
pub mod core;
// 行规范化（ACL 清洗、trim、去重）
pub mod normalizer;
// 基线匹配（字面 + 头部别名）
pub mod matcher;
// 例外规则表 + 分段基线评估
pub mod rules;
// 有序逐行比对
pub mod differ;
// 合规报告聚合
pub mod report;
// 单设备完整比对流程
pub mod pass;
// 接入端口审计
pub mod interface;
// 日志格式化
pub mod utils;
mod error;

pub use error::{CoreError, CoreResult};

// 顶层导出常用类型
pub use crate::core::{
    AclView, BaselineEntry, BaselineSet, ConfigLines, HeaderAliases, RuleCategory,
    RunningConfigView, SatisfiedBy, Section, SectionedBaseline,
};
pub use differ::{extract_hostname, DiffOutcome, LineVerdict, OrderedLineDiffer};
pub use interface::{audit_access_ports, non_compliant_access_ports, AccessPortFinding};
pub use matcher::{BaselineMatcher, MatchOutcome};
pub use normalizer::{clean_acl_entries, clean_acl_text, normalize_lines};
pub use pass::{ComparisonPass, DeviceOutput, GoldenBaseline};
pub use report::{CategoryKind, ComplianceReport, MissingCategory, ReportAggregator};
pub use rules::{ExceptionRuleEngine, RuleParams, RuleTable, SectionMissing, SectionOutcome};
