use thiserror::Error;

/// VK 数据请求失败时的通用提示
pub const VK_CONNECTIVITY_MSG: &str = "VK 数据请求失败，请检查网络连接后重试";

/// 照片源（VK）侧的错误分类
#[derive(Debug, Error)]
pub enum SourceError {
    /// 传输失败或响应格式不正确，不产生任何照片列表
    #[error("{0}")]
    Connectivity(String),
    /// 服务端返回了格式正确的错误载荷，携带服务端消息
    #[error("{0}")]
    Remote(String),
    /// 响应有效但没有任何照片，与网络错误区分开
    #[error("该账号中没有可导入的照片，请尝试其他 id")]
    Empty,
    /// 上一次请求尚未完成，单飞约束拒绝并发调用
    #[error("上一次 VK 请求尚未完成，请稍后重试")]
    Busy,
}

impl SourceError {
    pub fn connectivity() -> Self {
        Self::Connectivity(VK_CONNECTIVITY_MSG.to_string())
    }
}

/// 云存储（Yandex.Disk）侧的错误分类
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    /// 凭证缺失或被服务端拒绝
    #[error("缺少或无效的 OAuth 凭证")]
    Auth,
    #[error("文件不存在: {0}")]
    NotFound(String),
    /// 成功形状的响应里携带了非空错误载荷
    #[error("服务端返回错误: {0}")]
    Server(String),
}
