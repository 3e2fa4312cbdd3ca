use crate::core::types::StoredFile;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 文件列表响应
#[derive(Debug, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub items: Vec<FileItem>,
}

/// 列表中的单个文件
#[derive(Debug, Clone, Deserialize)]
pub struct FileItem {
    /// 稳定下载地址
    pub file: String,
    pub name: String,
    /// 由远端服务写入的 ISO-8601 创建时间
    pub created: DateTime<FixedOffset>,
    pub size: u64,
    pub path: String,
}

impl From<FileItem> for StoredFile {
    fn from(item: FileItem) -> Self {
        StoredFile {
            path: item.path,
            file_url: item.file,
            name: item.name,
            created: item.created,
            size: item.size,
        }
    }
}

/// 上传/删除请求体
#[derive(Debug, Serialize)]
pub struct ResourceBody<'a> {
    pub way: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
}

/// 成功形状响应里可能出现的错误载荷
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ErrorBody {
    /// 取最具体的一条错误描述
    pub fn summary(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.description.clone())
            .or_else(|| self.error.clone())
    }
}
