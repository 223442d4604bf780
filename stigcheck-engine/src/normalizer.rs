//! 行规范化：把设备原始输出转换为可比较的行形式
use rustc_hash::FxHashSet;

/// 设备在网络掩码后插入的短语，金标准中从不出现
pub const WILDCARD_BITS_PHRASE: &str = ", wildcard bits";

/// 按换行拆分 → trim → 丢弃空行 → 去重
pub fn normalize_lines(text: &str) -> FxHashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 移除 `, wildcard bits` 短语
#[inline]
pub fn clean_acl_text(text: &str) -> String {
    text.replace(WILDCARD_BITS_PHRASE, "")
}

/// 逐条清洗 ACL 条目：
/// 1. 去掉行首序号及其两侧空白（`10 permit ...` → `permit ...`）
/// 2. 行尾为 `)` 时截断到与之配对的 `(` 之前（命中计数 `(n matches)` 不参与比较）
///
/// 输出与输入一一对应，长度相同
pub fn clean_acl_entries<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| clean_acl_entry(line.as_ref()))
        .collect()
}

fn clean_acl_entry(line: &str) -> String {
    let stripped = line
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim();

    match strip_trailing_annotation(stripped) {
        Some(head) => head.trim_end().to_string(),
        None => stripped.to_string(),
    }
}

/// 行尾括号注释：返回配对 `(` 之前的部分；括号不配对时返回 None
fn strip_trailing_annotation(line: &str) -> Option<&str> {
    if !line.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, ch) in line.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&line[..idx]);
                }
            }
            _ => {}
        }
    }
    None
}
