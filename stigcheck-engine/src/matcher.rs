//! 基线匹配器：判断每条基线条目是否被运行配置满足
use crate::core::{BaselineSet, ConfigLines, HeaderAliases, SatisfiedBy};
use crate::utils::preview_compact;

/// 单个基线集合的匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// 缺失条目（保持文件顺序）
    pub missing: Vec<String>,
    /// 更新了 satisfied 标记的基线集合
    pub baseline: BaselineSet,
}

impl MatchOutcome {
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// 基线匹配器
/// 纯函数：不持有可变状态，可在多台设备间并发复用
#[derive(Debug, Clone, Default)]
pub struct BaselineMatcher {
    aliases: Option<HeaderAliases>,
}

impl BaselineMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aliases(aliases: HeaderAliases) -> Self {
        Self {
            aliases: Some(aliases),
        }
    }

    /// 标准 ACL 匹配器（声明行两种写法均视为满足）
    pub fn for_acl(number: u32) -> Self {
        Self::with_aliases(HeaderAliases::acl(number))
    }

    pub fn aliases(&self) -> Option<&HeaderAliases> {
        self.aliases.as_ref()
    }

    /// 判断单条文本的满足途径：别名 → 字面
    #[inline]
    pub fn resolve<V: ConfigLines + ?Sized>(&self, text: &str, view: &V) -> Option<SatisfiedBy> {
        if self.aliases.as_ref().is_some_and(|a| a.matches(text)) {
            return Some(SatisfiedBy::Alias);
        }
        if view.satisfies(text) {
            return Some(SatisfiedBy::Literal);
        }
        None
    }

    /// 对整个基线集合执行匹配
    /// 已满足的条目不会被重置；未满足且无法解析的条目按顺序进入缺失列表
    pub fn match_set<V: ConfigLines + ?Sized>(&self, mut baseline: BaselineSet, view: &V) -> MatchOutcome {
        let mut missing = Vec::new();

        for entry in baseline.entries_mut() {
            if entry.satisfied {
                continue;
            }
            match self.resolve(&entry.text, view) {
                Some(path) => {
                    log::trace!("[{:?}] {}", path, preview_compact(&entry.text, 80));
                    entry.mark_satisfied();
                }
                None => missing.push(entry.text.clone()),
            }
        }

        log::debug!(
            "Baseline [{}] matched: {}/{} satisfied, {} missing",
            baseline.name,
            baseline.satisfied_count(),
            baseline.len(),
            missing.len()
        );

        MatchOutcome { missing, baseline }
    }

    /// 借用版本：不改动调用方持有的基线
    pub fn missing_for<V: ConfigLines + ?Sized>(&self, baseline: &BaselineSet, view: &V) -> Vec<String> {
        self.match_set(baseline.clone(), view).missing
    }
}
