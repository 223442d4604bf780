//! 多设备审计编排
//! 金标准与规则表只读共享，每台设备一次独立比对
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stigcheck_engine::{
    ComparisonPass, ComplianceReport, DeviceOutput, DiffOutcome, GoldenBaseline, OrderedLineDiffer,
    RuleParams, RuleTable,
};

use crate::baseline::load_golden;
use crate::config::AuditConfig;
use crate::error::StigResult;

/// 一次多设备审计的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// 与输入设备顺序一致
    pub reports: Vec<ComplianceReport>,
}

impl AuditSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn compliant_count(&self) -> usize {
        self.reports.iter().filter(|r| r.compliant).count()
    }

    pub fn non_compliant(&self) -> Vec<&ComplianceReport> {
        self.reports.iter().filter(|r| !r.compliant).collect()
    }

    pub fn all_compliant(&self) -> bool {
        self.reports.iter().all(|r| r.compliant)
    }

    pub fn report_for(&self, device_id: &str) -> Option<&ComplianceReport> {
        self.reports.iter().find(|r| r.device_id == device_id)
    }
}

/// 合规审计器
#[derive(Debug, Clone)]
pub struct ComplianceAuditor {
    golden: Arc<GoldenBaseline>,
    pass: Arc<ComparisonPass>,
}

impl ComplianceAuditor {
    pub fn new(golden: GoldenBaseline, table: Arc<RuleTable>) -> Self {
        Self {
            golden: Arc::new(golden),
            pass: Arc::new(ComparisonPass::new(table)),
        }
    }

    /// 按配置加载金标准并编译规则表
    pub fn from_config(config: &AuditConfig) -> StigResult<Self> {
        let golden = load_golden(config)?;
        let table = rule_table_for(&config.rule_params)?;
        Ok(Self::new(golden, table))
    }

    #[cfg(feature = "async-io")]
    pub async fn from_config_async(config: &AuditConfig) -> StigResult<Self> {
        let golden = crate::baseline::load_golden_async(config).await?;
        let table = rule_table_for(&config.rule_params)?;
        Ok(Self::new(golden, table))
    }

    pub fn golden(&self) -> &GoldenBaseline {
        &self.golden
    }

    /// 单台设备
    pub fn audit(&self, device: &DeviceOutput) -> ComplianceReport {
        self.pass.run(&self.golden, device)
    }

    /// 顺序审计全部设备
    pub fn audit_all(&self, devices: &[DeviceOutput]) -> AuditSummary {
        let reports = devices.iter().map(|d| self.audit(d)).collect();
        let summary = AuditSummary { reports };
        log::info!(
            "Audit finished: {}/{} device(s) compliant",
            summary.compliant_count(),
            summary.total()
        );
        summary
    }

    /// 每台设备一个 spawn_blocking 任务，结果按输入顺序返回
    #[cfg(feature = "async-io")]
    pub async fn audit_all_concurrent(&self, devices: Vec<DeviceOutput>) -> StigResult<AuditSummary> {
        use crate::error::StigError;

        let handles: Vec<_> = devices
            .into_iter()
            .map(|device| {
                let golden = Arc::clone(&self.golden);
                let pass = Arc::clone(&self.pass);
                tokio::task::spawn_blocking(move || pass.run(&golden, &device))
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            let report = handle
                .await
                .map_err(|e| StigError::AsyncTaskError(e.to_string()))?;
            reports.push(report);
        }

        let summary = AuditSummary { reports };
        log::info!(
            "Concurrent audit finished: {}/{} device(s) compliant",
            summary.compliant_count(),
            summary.total()
        );
        Ok(summary)
    }

    /// 金标准文件与会话记录的有序逐行比对
    /// 未指定主机名时从会话记录中识别
    pub fn diff_transcript(golden: &str, transcript: &str, hostname: Option<&str>) -> DiffOutcome {
        let differ = match hostname {
            Some(h) => OrderedLineDiffer::new(Some(h)),
            None => OrderedLineDiffer::for_transcript(transcript),
        };
        differ.diff_text(golden, transcript)
    }
}

/// 默认参数复用进程内置规则表，否则按参数编译
fn rule_table_for(params: &RuleParams) -> StigResult<Arc<RuleTable>> {
    if *params == RuleParams::default() {
        return Ok(RuleTable::builtin());
    }
    Ok(Arc::new(RuleTable::from_params(params)?))
}
