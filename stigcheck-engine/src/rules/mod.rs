//! 例外规则：类别正则表 + 分段基线评估
mod engine;
mod table;

pub use engine::{ExceptionRuleEngine, SectionMissing, SectionOutcome};
pub use table::{CategoryRule, RuleParams, RuleTable};
