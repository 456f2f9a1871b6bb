use serde::Serialize;
use ts_rs::TS;

/// 单行导入失败
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "reconciliation.ts")]
pub struct ImportFailure {
    /// 数据行号（从 1 开始，不含表头）
    pub row: usize,
    pub subject: String,
    pub reason: String,
}

/// 批量导入结果
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "reconciliation.ts")]
pub struct ImportReport {
    pub success_count: usize,
    pub fail_count: usize,
    pub reasons: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn succeed(&mut self) {
        self.success_count += 1;
    }

    pub fn fail(&mut self, row: usize, subject: impl Into<String>, reason: impl Into<String>) {
        self.fail_count += 1;
        self.reasons.push(ImportFailure {
            row,
            subject: subject.into(),
            reason: reason.into(),
        });
    }

    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }
}
