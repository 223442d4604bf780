use std::fmt::{self, Write};

// ======================== 日志预览 ========================
/// 配置行的日志预览：按空白切词后以单个空格重新拼接，超出字符上限时以 `…` 结尾
/// 只在格式化时遍历原文，不分配
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    text: &'a str,
    limit: usize,
}

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut budget = self.limit;
        for (idx, word) in self.text.split_whitespace().enumerate() {
            if idx > 0 {
                if budget == 0 {
                    return f.write_str("…");
                }
                f.write_char(' ')?;
                budget -= 1;
            }
            for ch in word.chars() {
                if budget == 0 {
                    return f.write_str("…");
                }
                f.write_char(ch)?;
                budget -= 1;
            }
        }
        Ok(())
    }
}

/// 设备输出行可能很长（banner/证书块），调试日志只需前若干字符
#[inline]
pub fn preview_compact(text: &str, max_chars: usize) -> Preview<'_> {
    Preview {
        text,
        limit: max_chars,
    }
}

/// 命令列表日志格式：[cmd1, cmd2, ...] (total: N)
pub fn preview_list(items: &[String]) -> String {
    if items.is_empty() {
        return "[empty]".to_string();
    }

    const MAX_COUNT: usize = 5;
    const MAX_ITEM_LEN: usize = 40;

    let mut result = String::with_capacity(MAX_COUNT * (MAX_ITEM_LEN + 2) + 20);
    result.push('[');
    for (idx, item) in items.iter().take(MAX_COUNT).enumerate() {
        if idx > 0 {
            result.push_str(", ");
        }
        let _ = write!(result, "{}", preview_compact(item, MAX_ITEM_LEN));
    }
    if items.len() > MAX_COUNT {
        let _ = write!(result, "… (total: {})", items.len());
    }
    result.push(']');
    result
}
