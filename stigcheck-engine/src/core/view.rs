use rustc_hash::FxHashSet;

use crate::normalizer::{clean_acl_entries, clean_acl_text, normalize_lines};

/// 可被基线条目查询的行来源
/// 普通运行配置按整行精确匹配，ACL 输出额外容忍设备追加的掩码/计数
pub trait ConfigLines {
    /// 判断某条基线文本是否被当前配置满足
    fn satisfies(&self, entry: &str) -> bool;

    /// 规范化后的行集合
    fn line_set(&self) -> &FxHashSet<String>;
}

/// 运行配置视图：构建后只读
#[derive(Debug, Clone, Default)]
pub struct RunningConfigView {
    raw_text: String,
    line_set: FxHashSet<String>,
}

impl RunningConfigView {
    pub fn from_raw(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let line_set = normalize_lines(&raw_text);
        Self { raw_text, line_set }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn contains(&self, line: &str) -> bool {
        self.line_set.contains(line)
    }

    pub fn len(&self) -> usize {
        self.line_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_set.is_empty()
    }
}

impl ConfigLines for RunningConfigView {
    #[inline(always)]
    fn satisfies(&self, entry: &str) -> bool {
        self.contains(entry)
    }

    fn line_set(&self) -> &FxHashSet<String> {
        &self.line_set
    }
}

/// `show access-list N` 输出视图
#[derive(Debug, Clone, Default)]
pub struct AclView {
    acl_number: u32,
    raw: RunningConfigView,
    cleaned_text: String,
    cleaned_lines: FxHashSet<String>,
    cleaned_entries: Vec<String>,
    entry_set: FxHashSet<String>,
}

impl AclView {
    pub fn from_raw(acl_number: u32, raw_text: impl Into<String>) -> Self {
        let raw = RunningConfigView::from_raw(raw_text);
        let cleaned_text = clean_acl_text(raw.raw_text());
        let cleaned_lines = normalize_lines(&cleaned_text);

        let cleaned_entries = clean_acl_entries(
            cleaned_text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        );
        let entry_set = cleaned_entries
            .iter()
            .filter(|entry| !entry.is_empty())
            .cloned()
            .collect();

        Self {
            acl_number,
            raw,
            cleaned_text,
            cleaned_lines,
            cleaned_entries,
            entry_set,
        }
    }

    pub fn acl_number(&self) -> u32 {
        self.acl_number
    }

    pub fn raw(&self) -> &RunningConfigView {
        &self.raw
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    pub fn cleaned_entries(&self) -> &[String] {
        &self.cleaned_entries
    }
}

impl ConfigLines for AclView {
    fn satisfies(&self, entry: &str) -> bool {
        if self.cleaned_lines.contains(entry) || self.entry_set.contains(entry) {
            return true;
        }

        self.cleaned_lines
            .iter()
            .chain(self.entry_set.iter())
            .any(|line| extends_at_word_boundary(line, entry))
    }

    fn line_set(&self) -> &FxHashSet<String> {
        &self.cleaned_lines
    }
}

/// `line` 以 `prefix` 开头，且紧随其后的是空白
#[inline]
fn extends_at_word_boundary(line: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && line
            .strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_whitespace)
}
