//! 命令行参数与子命令执行
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stigcheck_engine::{non_compliant_access_ports, AccessPortFinding};

use crate::auditor::{AuditSummary, ComplianceAuditor};
use crate::capture::{load_capture_dir, load_transcript};
use crate::config::AuditConfig;
use crate::error::StigResult;

/// 退出码
pub mod codes {
    pub const SUCCESS: u8 = 0;
    /// 存在不合规设备 / 比对不一致 / 接入端口不合规
    pub const NON_COMPLIANT: u8 = 1;
    pub const ERROR: u8 = 2;
}

/// STIG compliance checker for Cisco IOS golden baselines.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "stigcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Default log filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Audit every device capture against the golden baseline.
    Audit(AuditArgs),
    /// Ordered line diff of a golden file against a session transcript.
    Diff(DiffArgs),
    /// Check that access ports carry a description and are not shut down.
    Interfaces(InterfacesArgs),
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct AuditArgs {
    /// Directory holding the golden files.
    #[arg(short, long)]
    pub golden_dir: Option<PathBuf>,

    /// Directory with one subdirectory per device.
    #[arg(short = 'c', long)]
    pub capture_dir: PathBuf,

    /// JSON audit config; command line flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Section key to evaluate (repeatable); all sections when omitted.
    #[arg(short, long = "section")]
    pub sections: Vec<String>,

    /// Print reports as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl AuditArgs {
    /// 配置文件 + 命令行覆盖
    pub fn resolve_config(&self) -> StigResult<AuditConfig> {
        let mut config = match &self.config {
            Some(path) => AuditConfig::from_json_file(path)?,
            None => AuditConfig::default(),
        };
        if let Some(dir) = &self.golden_dir {
            config.golden_dir = dir.clone();
        }
        if !self.sections.is_empty() {
            config.section_keys = self.sections.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct DiffArgs {
    /// Golden STIG file.
    #[arg(long)]
    pub golden: PathBuf,

    /// Captured session transcript.
    #[arg(long)]
    pub transcript: PathBuf,

    /// Device prompt to skip; detected from the transcript when omitted.
    #[arg(long)]
    pub hostname: Option<String>,
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct InterfacesArgs {
    /// Running configuration file.
    #[arg(long)]
    pub config: PathBuf,
}

/// 执行 audit，返回退出码
pub fn execute_audit(args: &AuditArgs) -> StigResult<u8> {
    let config = args.resolve_config()?;
    let auditor = ComplianceAuditor::from_config(&config)?;
    let devices = load_capture_dir(&args.capture_dir, &config)?;
    let summary = auditor.audit_all(&devices);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary));
    }

    Ok(if summary.all_compliant() {
        codes::SUCCESS
    } else {
        codes::NON_COMPLIANT
    })
}

/// 执行 diff，返回退出码
pub fn execute_diff(args: &DiffArgs) -> StigResult<u8> {
    let golden = load_transcript(&args.golden)?;
    let transcript = load_transcript(&args.transcript)?;
    let outcome = ComplianceAuditor::diff_transcript(&golden, &transcript, args.hostname.as_deref());

    print!("{}", outcome);
    println!(
        "{} identical, {} mismatched",
        outcome.identical_count(),
        outcome.mismatch_count()
    );

    Ok(if outcome.is_clean() {
        codes::SUCCESS
    } else {
        codes::NON_COMPLIANT
    })
}

/// 执行 interfaces，返回退出码
pub fn execute_interfaces(args: &InterfacesArgs) -> StigResult<u8> {
    let running_config = load_transcript(&args.config)?;
    let findings = non_compliant_access_ports(&running_config);

    print!("{}", render_findings(&findings));

    Ok(if findings.is_empty() {
        codes::SUCCESS
    } else {
        codes::NON_COMPLIANT
    })
}

/// 文本汇总：每台设备一段报告
pub fn render_summary(summary: &AuditSummary) -> String {
    let mut out = String::new();
    for report in &summary.reports {
        out.push_str(&format!("===== {} =====\n{}\n\n", report.device_id, report.text()));
    }
    out.push_str(&format!(
        "{}/{} device(s) compliant\n",
        summary.compliant_count(),
        summary.total()
    ));
    out
}

pub fn render_findings(findings: &[AccessPortFinding]) -> String {
    if findings.is_empty() {
        return "All access ports compliant\n".to_string();
    }
    let mut out = String::new();
    for finding in findings {
        let mut problems = Vec::new();
        if finding.description.is_none() {
            problems.push("no description");
        }
        if finding.shutdown {
            problems.push("shutdown");
        }
        out.push_str(&format!("{}: {}\n", finding.interface, problems.join(", ")));
    }
    out
}
