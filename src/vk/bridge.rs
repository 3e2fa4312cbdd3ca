use crate::error::SourceError;
use crate::utils::http::built_in_client;
use serde_json::Value;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

/// 跨域回调桥的一次注入请求
#[derive(Debug, Clone)]
pub struct BridgeRequest {
    pub url: String,
    /// 响应脚本要调用的全局回调名
    pub callback: String,
}

/// 负责实际投递请求并把载荷送回桥的传输层
pub trait BridgeTransport: Send + Sync {
    fn inject(
        &self,
        request: &BridgeRequest,
        bridge: &CallbackBridge,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

struct PendingCallback {
    name: String,
    tx: oneshot::Sender<Value>,
}

/// 单飞回调槽：同一时刻最多挂一个待完成回调。
/// complete 先注销槽位（对应"移除注入的 script 元素"），再投递载荷。
#[derive(Default)]
pub struct CallbackBridge {
    slot: Mutex<Option<PendingCallback>>,
}

impl CallbackBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册待完成回调并生成回调名；槽位被占用时拒绝
    pub fn register(&self) -> Result<(String, oneshot::Receiver<Value>), SourceError> {
        let mut slot = self.slot.lock().expect("bridge slot poisoned");
        if slot.is_some() {
            warn!("⚠️ 上一次 VK 请求尚未完成，拒绝并发调用");
            return Err(SourceError::Busy);
        }
        let name = format!("vkcb_{}", Uuid::new_v4().simple());
        let (tx, rx) = oneshot::channel();
        *slot = Some(PendingCallback {
            name: name.clone(),
            tx,
        });
        debug!("注册回调: {}", name);
        Ok((name, rx))
    }

    /// 远端响应到达时调用；回调名不匹配的过期响应被丢弃
    pub fn complete(&self, name: &str, payload: Value) -> bool {
        let pending = {
            let mut slot = self.slot.lock().expect("bridge slot poisoned");
            match slot.as_ref() {
                Some(p) if p.name == name => slot.take(),
                _ => None,
            }
        };
        match pending {
            Some(p) => {
                debug!("回调 {} 完成，槽位已清空", name);
                // 接收方已放弃时丢弃载荷即可
                let _ = p.tx.send(payload);
                true
            }
            None => {
                warn!("忽略过期回调: {}", name);
                false
            }
        }
    }

    /// 注入失败时清理槽位，避免适配器被卡死
    pub fn cancel(&self, name: &str) {
        let mut slot = self.slot.lock().expect("bridge slot poisoned");
        if slot.as_ref().is_some_and(|p| p.name == name) {
            debug!("取消回调: {}", name);
            *slot = None;
        }
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.slot.lock().unwrap().is_some()
    }
}

/// 生产环境传输：GET 注入地址，剥掉 `callback(...)` 包装后回投载荷。
/// 包装不完整或不是合法 JSON 时按"响应缺失"投递 Null。
#[derive(Clone, Default)]
pub struct JsonpTransport;

impl JsonpTransport {
    fn unwrap_payload(body: &str, callback: &str) -> Value {
        let trimmed = body.trim();
        let prefix = format!("{}(", callback);
        let inner = trimmed
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(");").or_else(|| rest.strip_suffix(')')));
        match inner {
            Some(json) => serde_json::from_str(json).unwrap_or(Value::Null),
            None => serde_json::from_str(trimmed).unwrap_or(Value::Null),
        }
    }
}

impl BridgeTransport for JsonpTransport {
    async fn inject(&self, request: &BridgeRequest, bridge: &CallbackBridge) -> Result<(), String> {
        let response = built_in_client()
            .get(&request.url)
            .send()
            .await
            .map_err(|e| format!("注入请求失败: {}", e))?;
        let body = response
            .text()
            .await
            .map_err(|e| format!("读取响应失败: {}", e))?;
        let payload = Self::unwrap_payload(&body, &request.callback);
        bridge.complete(&request.callback, payload);
        Ok(())
    }
}
