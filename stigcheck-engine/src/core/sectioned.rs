use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// 单个段落：段落键 + 有序命令列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub commands: Vec<String>,
}

/// 分段基线 `{ "sections": { "<key>": ["<command>", ...] } }`
/// 段落保持文档中的出现顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionedBaseline {
    sections: OrderedSections,
}

impl SectionedBaseline {
    /// 解析 JSON 文本，格式错误统一映射为 BaselineFormatError
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            CoreError::BaselineFormatError(format!("invalid sectioned baseline: {}", e))
        })
    }

    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self {
            sections: OrderedSections(sections),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections.0
    }

    pub fn get(&self, key: &str) -> Option<&Section> {
        self.sections.0.iter().find(|s| s.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 文档顺序的全部段落键
    pub fn keys(&self) -> Vec<String> {
        self.sections.0.iter().map(|s| s.key.clone()).collect()
    }

    pub fn command_count(&self) -> usize {
        self.sections.0.iter().map(|s| s.commands.len()).sum()
    }
}

/// 保序段落表（serde_json 默认 Map 会按键排序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OrderedSections(Vec<Section>);

impl Serialize for OrderedSections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for section in &self.0 {
            map.serialize_entry(&section.key, &section.commands)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OrderedSections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionsVisitor;

        impl<'de> Visitor<'de> for SectionsVisitor {
            type Value = OrderedSections;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping section keys to command arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut sections: Vec<Section> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, commands)) = access.next_entry::<String, Vec<String>>()? {
                    // 重复键：后者覆盖前者，位置保持首次出现处
                    match sections.iter_mut().find(|s| s.key == key) {
                        Some(existing) => existing.commands = commands,
                        None => sections.push(Section { key, commands }),
                    }
                }
                Ok(OrderedSections(sections))
            }
        }

        deserializer.deserialize_map(SectionsVisitor)
    }
}
