//! 设备采集输出加载
//!
//! 目录结构：
//! ```text
//! <capture_dir>/<device_id>/running_config.txt
//! <capture_dir>/<device_id>/show_access_list_<n>.txt
//! ```
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use stigcheck_engine::DeviceOutput;

use crate::config::AuditConfig;
use crate::error::{StigError, StigResult};

static ACL_CAPTURE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^show_access_list_(\d+)\.txt$").unwrap());

/// ACL 采集文件名 → ACL 编号
pub fn acl_number_from_file_name(file_name: &str) -> Option<u32> {
    ACL_CAPTURE_REGEX
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// ACL 编号 → 采集文件名
pub fn acl_capture_file_name(number: u32) -> String {
    format!("show_access_list_{}.txt", number)
}

/// 加载单台设备目录
pub fn load_device(device_dir: &Path, config: &AuditConfig) -> StigResult<DeviceOutput> {
    let device_id = device_id_of(device_dir)?;
    let running_path = device_dir.join(&config.running_config_file);
    let running_config = std::fs::read_to_string(&running_path).map_err(|e| {
        StigError::CaptureLoadError(format!("{}: {}", running_path.display(), e))
    })?;

    let mut device = DeviceOutput::new(device_id, running_config);
    for entry in std::fs::read_dir(device_dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(number) = file_name.to_str().and_then(acl_number_from_file_name) else {
            continue;
        };
        let text = std::fs::read_to_string(entry.path())?;
        device.acl_outputs.insert(number, text);
    }

    log::debug!(
        "Device [{}] capture loaded: {} bytes running config, acls={:?}",
        device.device_id,
        device.running_config.len(),
        device.acl_outputs.keys().collect::<Vec<_>>()
    );
    Ok(device)
}

/// 加载采集根目录下所有设备（按目录名排序）
/// 缺少运行配置的子目录跳过并记录警告
pub fn load_capture_dir(capture_dir: &Path, config: &AuditConfig) -> StigResult<Vec<DeviceOutput>> {
    let mut device_dirs: Vec<PathBuf> = std::fs::read_dir(capture_dir)
        .map_err(|e| StigError::CaptureLoadError(format!("{}: {}", capture_dir.display(), e)))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    device_dirs.sort();

    let mut devices = Vec::with_capacity(device_dirs.len());
    for dir in device_dirs {
        if !dir.join(&config.running_config_file).is_file() {
            log::warn!("Capture dir [{}] has no {}, skipped", dir.display(), config.running_config_file);
            continue;
        }
        devices.push(load_device(&dir, config)?);
    }

    log::info!("Loaded {} device capture(s) from [{}]", devices.len(), capture_dir.display());
    Ok(devices)
}

/// 读取会话记录文件（有序比对输入）
pub fn load_transcript(path: &Path) -> StigResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| StigError::CaptureLoadError(format!("{}: {}", path.display(), e)))
}

/// 异步加载单台设备目录（tokio::fs）
#[cfg(feature = "async-io")]
pub async fn load_device_async(device_dir: &Path, config: &AuditConfig) -> StigResult<DeviceOutput> {
    let device_id = device_id_of(device_dir)?;
    let running_path = device_dir.join(&config.running_config_file);
    let running_config = tokio::fs::read_to_string(&running_path).await.map_err(|e| {
        StigError::CaptureLoadError(format!("{}: {}", running_path.display(), e))
    })?;

    let mut acl_outputs = std::collections::BTreeMap::new();
    let mut entries = tokio::fs::read_dir(device_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(number) = file_name.to_str().and_then(acl_number_from_file_name) else {
            continue;
        };
        acl_outputs.insert(number, tokio::fs::read_to_string(entry.path()).await?);
    }

    Ok(DeviceOutput {
        device_id,
        running_config,
        acl_outputs,
    })
}

/// 异步加载采集根目录
#[cfg(feature = "async-io")]
pub async fn load_capture_dir_async(capture_dir: &Path, config: &AuditConfig) -> StigResult<Vec<DeviceOutput>> {
    let mut entries = tokio::fs::read_dir(capture_dir)
        .await
        .map_err(|e| StigError::CaptureLoadError(format!("{}: {}", capture_dir.display(), e)))?;

    let mut device_dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            device_dirs.push(entry.path());
        }
    }
    device_dirs.sort();

    let mut devices = Vec::with_capacity(device_dirs.len());
    for dir in device_dirs {
        if tokio::fs::metadata(dir.join(&config.running_config_file)).await.is_err() {
            log::warn!("Capture dir [{}] has no {}, skipped", dir.display(), config.running_config_file);
            continue;
        }
        devices.push(load_device_async(&dir, config).await?);
    }
    Ok(devices)
}

fn device_id_of(device_dir: &Path) -> StigResult<String> {
    device_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            StigError::CaptureLoadError(format!("invalid device dir [{}]", device_dir.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_capture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stigcheck-capture-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_acl_file_name_roundtrip() {
        assert_eq!(acl_number_from_file_name(&acl_capture_file_name(55)), Some(55));
        assert_eq!(acl_number_from_file_name("show_access_list_x.txt"), None);
        assert_eq!(acl_number_from_file_name("running_config.txt"), None);
    }

    #[test]
    fn test_load_capture_dir() {
        let root = temp_capture_dir("multi");
        let r1 = root.join("R1");
        let r2 = root.join("R2");
        let empty = root.join("R3-empty");
        for dir in [&r1, &r2, &empty] {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(r1.join("running_config.txt"), "hostname R1\n").unwrap();
        fs::write(r1.join("show_access_list_5.txt"), "Standard IP access list 5\n").unwrap();
        fs::write(r2.join("running_config.txt"), "hostname R2\n").unwrap();

        let devices = load_capture_dir(&root, &AuditConfig::default()).unwrap();
        let ids: Vec<&str> = devices.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2"]);
        assert_eq!(devices[0].acl_outputs.keys().copied().collect::<Vec<_>>(), vec![5]);
        assert!(devices[1].acl_outputs.is_empty());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_running_config_is_error() {
        let root = temp_capture_dir("single");
        let result = load_device(&root, &AuditConfig::default());
        assert!(matches!(result, Err(StigError::CaptureLoadError(_))));
        let _ = fs::remove_dir_all(&root);
    }

    #[cfg(feature = "async-io")]
    #[tokio::test]
    async fn test_load_capture_dir_async() {
        let root = temp_capture_dir("async");
        let r1 = root.join("R1");
        fs::create_dir_all(&r1).unwrap();
        fs::write(r1.join("running_config.txt"), "hostname R1\n").unwrap();
        fs::write(r1.join("show_access_list_1.txt"), "Standard IP access list 1\n").unwrap();

        let devices = load_capture_dir_async(&root, &AuditConfig::default()).await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].acl_outputs.keys().copied().collect::<Vec<_>>(), vec![1]);
        let _ = fs::remove_dir_all(&root);
    }
}
