//! 金标准文件加载
//! 文件读取在此完成，内核只接收文本
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use stigcheck_engine::{BaselineSet, GoldenBaseline, SectionedBaseline};

use crate::config::AuditConfig;
use crate::error::{StigError, StigResult};

/// 读取到的原始金标准文本
#[derive(Debug, Default)]
struct RawGolden {
    stig: Option<String>,
    sectioned: Option<String>,
    acls: Vec<(u32, String)>,
}

/// 同步加载全部已配置的金标准
pub fn load_golden(config: &AuditConfig) -> StigResult<GoldenBaseline> {
    let mut raw = RawGolden::default();

    if let Some(path) = config.stig_path() {
        raw.stig = read_optional(&path)?;
    }
    if let Some(path) = config.sectioned_path() {
        raw.sectioned = read_optional(&path)?;
    }
    for number in &config.acl_numbers {
        if let Some(text) = read_optional(&config.acl_path(*number))? {
            raw.acls.push((*number, text));
        }
    }

    assemble(config, raw)
}

/// 异步加载（tokio::fs）
#[cfg(feature = "async-io")]
pub async fn load_golden_async(config: &AuditConfig) -> StigResult<GoldenBaseline> {
    let mut raw = RawGolden::default();

    if let Some(path) = config.stig_path() {
        raw.stig = read_optional_async(&path).await?;
    }
    if let Some(path) = config.sectioned_path() {
        raw.sectioned = read_optional_async(&path).await?;
    }
    for number in &config.acl_numbers {
        if let Some(text) = read_optional_async(&config.acl_path(*number)).await? {
            raw.acls.push((*number, text));
        }
    }

    assemble(config, raw)
}

/// 原始文本 → GoldenBaseline
fn assemble(config: &AuditConfig, raw: RawGolden) -> StigResult<GoldenBaseline> {
    let stig = raw.stig.map(|text| BaselineSet::from_text("stig", &text));

    let sectioned = match raw.sectioned {
        Some(text) => Some(SectionedBaseline::from_json_str(&text)?),
        None => None,
    };

    let acls: BTreeMap<u32, BaselineSet> = raw
        .acls
        .into_iter()
        .map(|(number, text)| (number, BaselineSet::from_text(format!("acl {}", number), &text)))
        .collect();

    let golden = GoldenBaseline {
        stig,
        stig_aliases: config.stig_aliases.clone(),
        sectioned,
        section_keys: config.section_keys.clone(),
        acls,
    };

    if golden.is_empty() {
        return Err(StigError::BaselineLoadError(format!(
            "no golden files found in [{}]",
            config.golden_dir.display()
        )));
    }

    log::info!(
        "Golden baseline loaded: stig={} entries, sections={}, acls={:?}",
        golden.stig.as_ref().map(BaselineSet::len).unwrap_or(0),
        golden.sectioned.as_ref().map(|s| s.sections().len()).unwrap_or(0),
        golden.acls.keys().collect::<Vec<_>>()
    );

    Ok(golden)
}

/// 文件不存在 → None（记录警告），其余 IO 错误向上传递
fn read_optional(path: &Path) -> StigResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("Golden file [{}] not found, skipped", path.display());
            Ok(None)
        }
        Err(e) => Err(StigError::BaselineLoadError(format!("{}: {}", path.display(), e))),
    }
}

#[cfg(feature = "async-io")]
async fn read_optional_async(path: &Path) -> StigResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("Golden file [{}] not found, skipped", path.display());
            Ok(None)
        }
        Err(e) => Err(StigError::BaselineLoadError(format!("{}: {}", path.display(), e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomConfigBuilder;
    use std::fs;
    use std::path::PathBuf;

    fn temp_golden_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stigcheck-golden-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_all_files() {
        let dir = temp_golden_dir("all");
        fs::write(dir.join("golden_stig_file.txt"), "service password-encryption\n\nip ssh version 2\n").unwrap();
        fs::write(dir.join("golden_config.json"), r#"{"sections": {"1.1": ["no ip http server"]}}"#).unwrap();
        fs::write(dir.join("golden_acl1_file.txt"), "ip access-list standard 1\n10 permit 10.0.0.0\n").unwrap();

        let config = CustomConfigBuilder::new().golden_dir(&dir).build().unwrap();
        let golden = load_golden(&config).unwrap();

        assert_eq!(golden.stig.as_ref().map(BaselineSet::len), Some(2));
        assert_eq!(golden.sectioned.as_ref().map(|s| s.keys()), Some(vec!["1.1".to_string()]));
        // ACL 2/5/55 文件不存在，跳过
        assert_eq!(golden.acls.keys().copied().collect::<Vec<_>>(), vec![1]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_golden_dir_is_error() {
        let dir = temp_golden_dir("empty");
        let config = CustomConfigBuilder::new().golden_dir(&dir).build().unwrap();
        assert!(matches!(load_golden(&config), Err(StigError::BaselineLoadError(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_sectioned_file() {
        let dir = temp_golden_dir("malformed");
        fs::write(dir.join("golden_config.json"), "{ not json").unwrap();
        let config = CustomConfigBuilder::new().golden_dir(&dir).build().unwrap();
        assert!(matches!(load_golden(&config), Err(StigError::Core(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(feature = "async-io")]
    #[tokio::test]
    async fn test_load_golden_async() {
        let dir = temp_golden_dir("async");
        fs::write(dir.join("golden_stig_file.txt"), "ip ssh version 2\n").unwrap();
        let config = CustomConfigBuilder::new().golden_dir(&dir).build().unwrap();
        let golden = load_golden_async(&config).await.unwrap();
        assert_eq!(golden.stig.as_ref().map(BaselineSet::len), Some(1));
        let _ = fs::remove_dir_all(&dir);
    }
}
