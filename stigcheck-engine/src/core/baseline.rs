use serde::{Deserialize, Serialize};

/// 单条基线条目（金标准文件的一行 / JSON 段落中的一条命令）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub text: String,
    pub satisfied: bool,
}

impl BaselineEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            satisfied: false,
        }
    }

    /// 标记为已满足，一次比对过程中不会被重置
    #[inline(always)]
    pub(crate) fn mark_satisfied(&mut self) {
        self.satisfied = true;
    }
}

/// 基线集合：一个金标准文件或一个 JSON 段落对应一份
/// 条目顺序不影响匹配，仅用于报告输出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSet {
    pub name: String,
    entries: Vec<BaselineEntry>,
}

impl BaselineSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// 从金标准文本行构建（逐行 trim，丢弃空行，保留文件顺序）
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .map(BaselineEntry::new)
            .collect();

        Self {
            name: name.into(),
            entries,
        }
    }

    /// 从整段文本构建
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::from_lines(name, text.lines())
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push(BaselineEntry::new(text));
    }

    pub fn entries(&self) -> &[BaselineEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [BaselineEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn satisfied_count(&self) -> usize {
        self.entries.iter().filter(|e| e.satisfied).count()
    }
}

/// 头部别名：两种字面写法等价，命中即视为满足
/// 用于 ACL 声明行（`ip access-list standard N` / `Standard IP access list N`）
/// 以及 STIG 基线中 archived_configs 的两种路径写法
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderAliases {
    pub primary: String,
    pub alternate: String,
}

impl HeaderAliases {
    pub fn new(primary: impl Into<String>, alternate: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            alternate: alternate.into(),
        }
    }

    /// 标准 ACL 的声明行别名
    pub fn acl(number: u32) -> Self {
        Self::new(
            format!("ip access-list standard {}", number),
            format!("Standard IP access list {}", number),
        )
    }

    /// STIG 基线中归档配置路径的两种写法
    pub fn archived_configs() -> Self {
        Self::new("path flash:/archived_configs", "path bootflash:/archived_configs")
    }

    #[inline(always)]
    pub fn matches(&self, text: &str) -> bool {
        text == self.primary || text == self.alternate
    }
}
