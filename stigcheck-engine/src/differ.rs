//! 有序逐行比对：金标准文件 vs 设备会话记录
//!
//! 尽力对齐而非最小编辑距离：设备游标 `j` 只前进不回退
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::utils::preview_compact;

/// 默认跳过的设备行前缀（配置模式回显）
pub const DEFAULT_SKIP_PREFIXES: [&str; 2] = ["configure terminal", "Enter"];

/// 单行比对结论
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum LineVerdict {
    /// 在剩余设备行中找到（已消耗一次出现）
    Found { line_no: usize },
    /// 与游标处的设备行一致
    Identical { line_no: usize },
    /// 与游标处的设备行不一致
    Mismatch {
        line_no: usize,
        golden: String,
        device: String,
    },
    /// 设备记录已耗尽，无可比较的行
    DeviceExhausted { line_no: usize, golden: String },
}

impl LineVerdict {
    pub fn line_no(&self) -> usize {
        match self {
            LineVerdict::Found { line_no }
            | LineVerdict::Identical { line_no }
            | LineVerdict::Mismatch { line_no, .. }
            | LineVerdict::DeviceExhausted { line_no, .. } => *line_no,
        }
    }

    pub fn is_identical(&self) -> bool {
        matches!(self, LineVerdict::Found { .. } | LineVerdict::Identical { .. })
    }
}

/// 比对结果 + 会话日志风格的文本渲染
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOutcome {
    pub hostname: Option<String>,
    pub verdicts: Vec<LineVerdict>,
}

impl DiffOutcome {
    pub fn identical_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_identical()).count()
    }

    pub fn mismatch_count(&self) -> usize {
        self.verdicts.len() - self.identical_count()
    }

    pub fn is_clean(&self) -> bool {
        self.verdicts.iter().all(LineVerdict::is_identical)
    }
}

impl Display for DiffOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let device_label = self.hostname.as_deref().unwrap_or("Device");
        for verdict in &self.verdicts {
            match verdict {
                LineVerdict::Found { line_no } => writeln!(f, "Line {} : IDENTICAL (Found)", line_no)?,
                LineVerdict::Identical { line_no } => writeln!(f, "Line {} : IDENTICAL", line_no)?,
                LineVerdict::Mismatch { line_no, golden, device } => {
                    writeln!(f, "Line {} :", line_no)?;
                    writeln!(f, "\tGolden STIG: {}", golden)?;
                    writeln!(f, "\t{}: {}", device_label, device)?;
                }
                LineVerdict::DeviceExhausted { line_no, golden } => {
                    writeln!(f, "Line {} :", line_no)?;
                    writeln!(f, "\tGolden STIG: {}", golden)?;
                    writeln!(f, "\t{}: <end of transcript>", device_label)?;
                }
            }
        }
        Ok(())
    }
}

/// 有序逐行比对器
#[derive(Debug, Clone)]
pub struct OrderedLineDiffer {
    hostname: Option<String>,
    skip_prefixes: Vec<String>,
}

impl Default for OrderedLineDiffer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl OrderedLineDiffer {
    /// 跳过列表 = [主机名提示符, `configure terminal`, `Enter`]
    /// 空主机名会让所有行都被跳过，因此忽略
    pub fn new(hostname: Option<&str>) -> Self {
        let hostname = hostname
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        let mut skip_prefixes: Vec<String> = Vec::with_capacity(DEFAULT_SKIP_PREFIXES.len() + 1);
        if let Some(h) = &hostname {
            skip_prefixes.push(h.clone());
        }
        skip_prefixes.extend(DEFAULT_SKIP_PREFIXES.iter().map(|s| s.to_string()));

        Self {
            hostname,
            skip_prefixes,
        }
    }

    /// 从会话记录中识别主机名后构建
    pub fn for_transcript(transcript: &str) -> Self {
        Self::new(extract_hostname(transcript).as_deref())
    }

    pub fn skip_prefixes(&self) -> &[String] {
        &self.skip_prefixes
    }

    /// 空白行与提示符/回显行不参与顺序比对
    #[inline]
    fn is_skipped(&self, line: &str) -> bool {
        line.trim().is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }

    /// 文本入口：按行拆分并去掉行尾空白后比对
    pub fn diff_text(&self, golden: &str, transcript: &str) -> DiffOutcome {
        let golden: Vec<&str> = golden.lines().map(str::trim_end).collect();
        let device: Vec<&str> = transcript.lines().map(str::trim_end).collect();
        self.diff(&golden, &device)
    }

    /// 核心比对
    pub fn diff<G, D>(&self, golden: &[G], device: &[D]) -> DiffOutcome
    where
        G: AsRef<str>,
        D: AsRef<str>,
    {
        // 剩余设备行多重集合，命中一次消耗一次
        let mut remaining: FxHashMap<&str, usize> = FxHashMap::default();
        for line in device {
            *remaining.entry(line.as_ref()).or_insert(0) += 1;
        }

        let mut verdicts = Vec::with_capacity(golden.len());
        let mut j = 0usize;

        for (idx, golden_line) in golden.iter().enumerate() {
            let golden_line = golden_line.as_ref();
            let line_no = idx + 1;

            if let Some(count) = remaining.get_mut(golden_line).filter(|c| **c > 0) {
                *count -= 1;
                verdicts.push(LineVerdict::Found { line_no });
                continue;
            }

            while j < device.len() && self.is_skipped(device[j].as_ref()) {
                j += 1;
            }

            let Some(device_line) = device.get(j).map(|d| d.as_ref()) else {
                verdicts.push(LineVerdict::DeviceExhausted {
                    line_no,
                    golden: golden_line.to_string(),
                });
                continue;
            };
            j += 1;

            if device_line == golden_line {
                verdicts.push(LineVerdict::Identical { line_no });
            } else {
                log::trace!(
                    "Line {} mismatch: golden=[{}] device=[{}]",
                    line_no,
                    preview_compact(golden_line, 60),
                    preview_compact(device_line, 60)
                );
                verdicts.push(LineVerdict::Mismatch {
                    line_no,
                    golden: golden_line.to_string(),
                    device: device_line.to_string(),
                });
            }
        }

        let outcome = DiffOutcome {
            hostname: self.hostname.clone(),
            verdicts,
        };
        log::debug!(
            "Ordered diff finished: {} identical, {} mismatched",
            outcome.identical_count(),
            outcome.mismatch_count()
        );
        outcome
    }
}

/// 会话记录中第一条 `hostname <name>` 配置行的主机名
pub fn extract_hostname(transcript: &str) -> Option<String> {
    transcript.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("hostname"), Some(name), None) => Some(name.to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hostname() {
        let transcript = "configure terminal\nEnter configuration commands, one per line.  End with CNTL/Z.\nRouter1(config)#hostname\nhostname Router1\nRouter1(config)#end\n";
        assert_eq!(extract_hostname(transcript), Some("Router1".to_string()));
        assert_eq!(extract_hostname("no hostname here\n"), None);
    }

    #[test]
    fn test_found_lines_are_consumed() {
        let differ = OrderedLineDiffer::new(None);
        let golden = ["service password-encryption", "service password-encryption"];
        let device = ["service password-encryption", "no service pad"];
        let outcome = differ.diff(&golden, &device);

        assert_eq!(outcome.verdicts[0], LineVerdict::Found { line_no: 1 });
        // 第二次出现已被消耗，落到游标比对（游标仍在设备第一行）
        assert_eq!(outcome.verdicts[1], LineVerdict::Identical { line_no: 2 });
    }

    #[test]
    fn test_cursor_advances_after_identical() {
        let differ = OrderedLineDiffer::new(None);
        let golden = ["a", "a", "a"];
        let device = ["a", "b"];
        let outcome = differ.diff(&golden, &device);

        assert_eq!(outcome.verdicts[0], LineVerdict::Found { line_no: 1 });
        assert_eq!(outcome.verdicts[1], LineVerdict::Identical { line_no: 2 });
        assert_eq!(
            outcome.verdicts[2],
            LineVerdict::Mismatch {
                line_no: 3,
                golden: "a".to_string(),
                device: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_hostname_prompt_is_skipped() {
        let differ = OrderedLineDiffer::new(Some("Router1"));
        let golden = ["enable secret 5 $1$abcd$efgh", "ip ssh version 2"];
        let device = ["Router1#", "configure terminal", "enable secret 9 $9$xyz", "ip ssh version 2"];
        let outcome = differ.diff(&golden, &device);

        assert_eq!(
            outcome.verdicts[0],
            LineVerdict::Mismatch {
                line_no: 1,
                golden: "enable secret 5 $1$abcd$efgh".to_string(),
                device: "enable secret 9 $9$xyz".to_string(),
            }
        );
        assert_eq!(outcome.verdicts[1], LineVerdict::Found { line_no: 2 });
        assert_eq!(outcome.identical_count(), 1);
        assert_eq!(outcome.mismatch_count(), 1);
    }

    #[test]
    fn test_blank_device_lines_skipped() {
        let differ = OrderedLineDiffer::new(Some("R1"));
        let golden = ["ip ssh version 2", "no ip http server"];
        let device = ["", "R1#", "ip ssh version 1", "   ", "no ip http server secure"];
        let outcome = differ.diff(&golden, &device);

        assert_eq!(
            outcome.verdicts,
            vec![
                LineVerdict::Mismatch {
                    line_no: 1,
                    golden: "ip ssh version 2".to_string(),
                    device: "ip ssh version 1".to_string(),
                },
                LineVerdict::Mismatch {
                    line_no: 2,
                    golden: "no ip http server".to_string(),
                    device: "no ip http server secure".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_config_mode_banner_skipped() {
        let differ = OrderedLineDiffer::default();
        let golden = ["service timestamps debug datetime msec"];
        let device = [
            "Enter configuration commands, one per line.  End with CNTL/Z.",
            "service timestamps debug uptime",
        ];
        let outcome = differ.diff(&golden, &device);

        assert_eq!(
            outcome.verdicts[0],
            LineVerdict::Mismatch {
                line_no: 1,
                golden: "service timestamps debug datetime msec".to_string(),
                device: "service timestamps debug uptime".to_string(),
            }
        );
    }

    #[test]
    fn test_cursor_never_moves_backwards() {
        let differ = OrderedLineDiffer::new(None);
        let golden = ["a", "b", "c"];
        let device = ["x", "y"];
        let outcome = differ.diff(&golden, &device);

        assert!(matches!(outcome.verdicts[0], LineVerdict::Mismatch { ref device, .. } if device == "x"));
        assert!(matches!(outcome.verdicts[1], LineVerdict::Mismatch { ref device, .. } if device == "y"));
        assert_eq!(
            outcome.verdicts[2],
            LineVerdict::DeviceExhausted { line_no: 3, golden: "c".to_string() }
        );
    }

    #[test]
    fn test_empty_hostname_ignored() {
        let differ = OrderedLineDiffer::new(Some("  "));
        assert_eq!(differ.skip_prefixes(), &["configure terminal".to_string(), "Enter".to_string()]);
    }

    #[test]
    fn test_render_transcript_text() {
        let differ = OrderedLineDiffer::new(Some("R1"));
        let outcome = differ.diff_text("ip ssh version 2\nno ip http server\n", "R1#show run\nip http server\n");
        let text = outcome.to_string();
        assert!(text.contains("Line 1 :\n\tGolden STIG: ip ssh version 2\n\tR1: ip http server\n"));
        assert!(text.contains("Line 2 :\n\tGolden STIG: no ip http server\n\tR1: <end of transcript>\n"));
    }
}
