//! stigcheck 审计演示程序
//! 在临时目录中生成金标准与两台设备的采集输出，执行并发审计并输出报告
//!
//! 运行命令：
//! cargo run --example audit_demo --features async-io

use env_logger::{Builder, Env, Target};
use std::{error::Error, fs, path::Path, time::Instant};
use stigcheck::{load_capture_dir_async, AuditConfig, ComplianceAuditor, CustomConfigBuilder};

const GOLDEN_STIG: &str = "\
service password-encryption
no ip http server
path flash:/archived_configs
";

const GOLDEN_SECTIONS: &str = r#"{
  "sections": {
    "1.1": ["ip domain name test.com", "ip ssh version 2"],
    "1.2": ["ntp authentication-key 31 sha1 7 0822455D0A16"],
    "2.1": ["logging host 192.168.1.1 transport udp port 10514"]
  }
}"#;

const GOLDEN_ACL1: &str = "\
ip access-list standard 1
10 permit 10.0.0.0
20 deny any
";

fn write_fixture(root: &Path) -> Result<(), Box<dyn Error>> {
    let golden = root.join("golden");
    fs::create_dir_all(&golden)?;
    fs::write(golden.join("golden_stig_file.txt"), GOLDEN_STIG)?;
    fs::write(golden.join("golden_config.json"), GOLDEN_SECTIONS)?;
    fs::write(golden.join("golden_acl1_file.txt"), GOLDEN_ACL1)?;

    let r1 = root.join("captures/R1");
    fs::create_dir_all(&r1)?;
    fs::write(
        r1.join("running_config.txt"),
        "hostname R1\nservice password-encryption\nno ip http server\nip domain-name test.com\nip ssh version 2\nntp authentication-key 32 sha2 7 1511021F0725\nlogging host 192.168.1.1 transport udp port 10516\n",
    )?;
    fs::write(
        r1.join("show_access_list_1.txt"),
        "Standard IP access list 1\n    10 permit 10.0.0.0, wildcard bits 0.0.0.255 (12 matches)\n    20 deny   any\n",
    )?;

    let r2 = root.join("captures/R2");
    fs::create_dir_all(&r2)?;
    fs::write(r2.join("running_config.txt"), "hostname R2\nip http server\nip ssh version 2\n")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // ========== 1. 日志系统初始化 ==========
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    // ========== 2. 生成演示数据 ==========
    let root = std::env::temp_dir().join("stigcheck-demo");
    let _ = fs::remove_dir_all(&root);
    write_fixture(&root)?;

    // ========== 3. 构建配置与审计器 ==========
    let config: AuditConfig = CustomConfigBuilder::new()
        .golden_dir(root.join("golden"))
        .acl_numbers(vec![1])
        .build()?;
    let auditor = ComplianceAuditor::from_config_async(&config).await?;

    // ========== 4. 并发审计 ==========
    let devices = load_capture_dir_async(&root.join("captures"), &config).await?;
    let start_instant = Instant::now();
    let summary = auditor.audit_all_concurrent(devices).await?;
    let elapsed = start_instant.elapsed();

    // ========== 5. 输出结果 ==========
    for report in &summary.reports {
        println!("===== {} =====\n{}\n", report.device_id, report.text());
    }
    println!("{}/{} compliant in {:?}", summary.compliant_count(), summary.total(), elapsed);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let _ = fs::remove_dir_all(&root);
    Ok(())
}
