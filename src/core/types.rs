use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// VK 照片的最高分辨率变体，只在导入过程中短暂存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteImage {
    pub url: String,
}

/// 云端已存储的一个文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// 账号内唯一的存储路径
    pub path: String,
    /// 稳定的下载地址
    pub file_url: String,
    pub name: String,
    /// 创建时间由远端服务写入，本系统从不修改
    pub created: DateTime<FixedOffset>,
    pub size: u64,
}

/// 单张照片的导入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// 上传尚未完成时的占位
    Pending,
    Succeeded { path: String },
    Failed { reason: String },
}

/// 一次导入的按序结果汇总
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ImportOutcome::Succeeded { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ImportOutcome::Failed { .. }))
            .count()
    }

    /// 部分成功部分失败时为真
    pub fn is_partial(&self) -> bool {
        self.succeeded() > 0 && self.failed() > 0
    }
}

/// 画廊里一条渲染项：云端文件加瞬态 UI 状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub file: StoredFile,
    /// 删除请求在途时为真
    pub pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = ImportReport {
            outcomes: vec![
                ImportOutcome::Succeeded { path: "/a".to_string() },
                ImportOutcome::Failed { reason: "x".to_string() },
                ImportOutcome::Succeeded { path: "/b".to_string() },
            ],
        };
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.is_partial(), "有成有败应视为部分失败");
    }

    #[test]
    fn test_all_success_not_partial() {
        let report = ImportReport {
            outcomes: vec![ImportOutcome::Succeeded { path: "/a".to_string() }],
        };
        assert!(!report.is_partial());
    }
}
