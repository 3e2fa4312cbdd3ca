use crate::config::AppConfig;
use crate::core::ports::PhotoSource;
use crate::core::types::RemoteImage;
use crate::error::{SourceError, VK_CONNECTIVITY_MSG};
use crate::vk::bridge::{BridgeRequest, BridgeTransport, CallbackBridge};
use serde_json::Value;
use tracing::{debug, info, warn};
use urlencoding::encode;

/// VK 照片适配器。
/// 照片接口没有同源可用的 JSON 端点，只能走回调桥完成请求；
/// 对外仍表现为一次普通的异步调用。
pub struct VkAdapter<T: BridgeTransport> {
    transport: T,
    bridge: CallbackBridge,
    host: String,
    access_token: String,
    api_version: String,
    page_size: u32,
}

impl<T: BridgeTransport> VkAdapter<T> {
    pub fn new(config: &AppConfig, transport: T) -> Self {
        Self {
            transport,
            bridge: CallbackBridge::new(),
            host: config.vk_host.clone(),
            access_token: config.vk_access_token.clone(),
            api_version: config.vk_api_version.clone(),
            page_size: config.effective_page_size(),
        }
    }

    fn build_url(&self, account_id: &str, callback: &str) -> String {
        format!(
            "{}/method/photos.get?owner_id={}&album_id=profile&photo_sizes=1&count={}&access_token={}&v={}&callback={}",
            self.host,
            encode(account_id),
            self.page_size,
            self.access_token,
            self.api_version,
            callback,
        )
    }

    /// 响应处理，严格按顺序：错误载荷 → 空列表 → 取每项 sizes 的最后一个（最大）变体
    fn process_payload(payload: Value) -> Result<Vec<RemoteImage>, SourceError> {
        let Some(obj) = payload.as_object() else {
            warn!("❌ VK 响应缺失或格式不正确");
            return Err(SourceError::connectivity());
        };

        if let Some(error) = obj.get("error") {
            let msg = error
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or(VK_CONNECTIVITY_MSG)
                .to_string();
            warn!("❌ VK 返回错误: {}", msg);
            return Err(SourceError::Remote(msg));
        }

        let Some(items) = obj
            .get("response")
            .and_then(|r| r.get("items"))
            .and_then(Value::as_array)
        else {
            warn!("❌ VK 响应中没有 items 字段");
            return Err(SourceError::connectivity());
        };

        if items.is_empty() {
            info!("账号有效但没有照片");
            return Err(SourceError::Empty);
        }

        let mut images = Vec::with_capacity(items.len());
        for item in items {
            // sizes 按从小到大排列，最后一个即最高分辨率
            let Some(url) = item
                .get("sizes")
                .and_then(Value::as_array)
                .and_then(|sizes| sizes.last())
                .and_then(|size| size.get("url"))
                .and_then(Value::as_str)
            else {
                warn!("❌ 照片项缺少 sizes，放弃整个列表");
                return Err(SourceError::connectivity());
            };
            images.push(RemoteImage {
                url: url.to_string(),
            });
        }

        debug!("解析出 {} 张照片", images.len());
        Ok(images)
    }
}

impl<T: BridgeTransport> PhotoSource for VkAdapter<T> {
    async fn fetch_album(&self, account_id: &str) -> Result<Vec<RemoteImage>, SourceError> {
        let (callback, rx) = self.bridge.register()?;
        let request = BridgeRequest {
            url: self.build_url(account_id, &callback),
            callback: callback.clone(),
        };

        info!("📥 正在请求账号 {} 的照片...", account_id);
        if let Err(e) = self.transport.inject(&request, &self.bridge).await {
            warn!("❌ 注入传输失败: {}", e);
            self.bridge.cancel(&callback);
            return Err(SourceError::connectivity());
        }

        // 传输层在完成前丢弃了发送端时按连接失败处理
        let payload = rx.await.map_err(|_| SourceError::connectivity())?;
        Self::process_payload(payload)
    }
}
