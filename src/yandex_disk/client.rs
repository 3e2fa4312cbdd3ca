use crate::config::AppConfig;
use crate::core::ports::CloudStore;
use crate::core::types::StoredFile;
use crate::error::CloudError;
use crate::token::TokenStore;
use crate::utils::http::built_in_client;
use crate::yandex_disk::models::{ErrorBody, FilesResponse, ResourceBody};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 下载触发协作方，对应浏览器里 `<a href>.click()` 的角色
pub type DownloadDispatcher = Arc<dyn Fn(&str) + Send + Sync>;

/// Yandex.Disk 客户端，封装上传、删除、列表三个认证操作。
/// 凭证来自注入的 TokenStore，从不自行读取全局状态。
#[derive(Clone)]
pub struct DiskClient {
    client: reqwest::Client,
    host: String,
    list_limit: u64,
    tokens: TokenStore,
    dispatcher: DownloadDispatcher,
}

impl DiskClient {
    pub fn new(config: &AppConfig, tokens: TokenStore) -> Self {
        Self {
            client: built_in_client(),
            host: config.disk_host.clone(),
            list_limit: config.disk_list_limit,
            tokens,
            dispatcher: Arc::new(|url: &str| {
                info!("📎 下载地址已派发: {}", url);
            }),
        }
    }

    /// 替换下载派发器，由真实 UI 注入打开器
    pub fn with_dispatcher(mut self, dispatcher: DownloadDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// 空凭证直接判 Auth，不发请求
    fn auth_header(&self) -> Result<String, CloudError> {
        let token = self.tokens.credential();
        if token.is_empty() {
            warn!("⚠️ 凭证为空，拒绝发起云端请求");
            return Err(CloudError::Auth);
        }
        Ok(format!("OAuth {}", token))
    }

    /// 统一的状态码到错误的映射
    fn map_status(status: StatusCode, path: &str, body: &str) -> CloudError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CloudError::Auth,
            StatusCode::NOT_FOUND => CloudError::NotFound(path.to_string()),
            _ => {
                let detail = serde_json::from_str::<ErrorBody>(body)
                    .ok()
                    .and_then(|b| b.summary())
                    .unwrap_or_else(|| format!("HTTP {}", status));
                CloudError::Server(detail)
            }
        }
    }

    /// 2xx 但响应体携带错误载荷时仍按失败处理
    fn check_success_body(body: &str) -> Result<(), CloudError> {
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(());
        }
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(msg) = parsed.summary() {
                return Err(CloudError::Server(msg));
            }
        }
        Ok(())
    }

    /// 删除接口只信空响应体：任何非空、非 null 的载荷都不算删除完成，
    /// 例如异步删除返回的 {"href": ...} 操作句柄
    fn check_empty_body(body: &str) -> Result<(), CloudError> {
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(());
        }
        let detail = serde_json::from_str::<ErrorBody>(trimmed)
            .ok()
            .and_then(|b| b.summary())
            .unwrap_or_else(|| trimmed.to_string());
        Err(CloudError::Server(detail))
    }
}

impl CloudStore for DiskClient {
    async fn upload(&self, path: &str, source_url: &str) -> Result<(), CloudError> {
        let auth = self.auth_header()?;
        debug!("上传 {} -> {}", source_url, path);
        let response = self
            .client
            .post(format!("{}/resources/upload", self.host))
            .header("Authorization", auth)
            .json(&ResourceBody {
                way: path,
                url: Some(source_url),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("❌ 上传 {} 失败: HTTP {}", path, status);
            return Err(Self::map_status(status, path, &body));
        }
        Self::check_success_body(&body)?;
        info!("✅ 已提交上传: {}", path);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), CloudError> {
        let auth = self.auth_header()?;
        debug!("删除 {}", path);
        let response = self
            .client
            .delete(format!("{}/resources", self.host))
            .header("Authorization", auth)
            .json(&ResourceBody { way: path, url: None })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("❌ 删除 {} 失败: HTTP {}", path, status);
            return Err(Self::map_status(status, path, &body));
        }
        // 只有空响应体才算删除成功，任何其他载荷都不得当作已删除
        match Self::check_empty_body(&body) {
            Ok(()) => {
                info!("✅ 已删除: {}", path);
                Ok(())
            }
            Err(e) => {
                warn!("❌ 删除 {} 返回了错误载荷", path);
                Err(e)
            }
        }
    }

    async fn list(&self) -> Result<Vec<StoredFile>, CloudError> {
        let auth = self.auth_header()?;
        let limit = self.list_limit.to_string();
        let response = self
            .client
            .get(format!("{}/resources/files", self.host))
            .header("Authorization", auth)
            .query(&[("mediaType", "image"), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!("❌ 获取文件列表失败: HTTP {}", status);
            return Err(Self::map_status(status, "", &body));
        }
        let parsed: FilesResponse = response
            .json()
            .await
            .map_err(CloudError::Network)?;
        debug!("云端共有 {} 个图片文件", parsed.items.len());
        Ok(parsed.items.into_iter().map(Into::into).collect())
    }

    fn resolve_download(&self, url: &str) {
        // 同步派发，没有自己的网络请求，也没有完成信号
        (self.dispatcher)(url);
    }
}
