use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// 凭证提示协作方，由外层 UI 实现；返回 None 表示用户拒绝
pub trait TokenPrompt: Send + Sync {
    fn request_token(&self) -> Option<String>;
}

/// 保存唯一一份 Yandex.Disk OAuth 凭证。
/// 会话内首次使用时才获取，之后不再提示，也从不自动刷新。
#[derive(Clone)]
pub struct TokenStore {
    path: PathBuf,
    prompt: Arc<dyn TokenPrompt>,
    cached: Arc<Mutex<Option<String>>>,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>, prompt: Arc<dyn TokenPrompt>) -> Self {
        Self {
            path: path.into(),
            prompt,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// 返回凭证。用户拒绝提示时静默返回空串，
    /// 调用方应把空凭证当作"所有云端调用都会被拒绝"处理，不得崩溃。
    pub fn credential(&self) -> String {
        let mut cached = self.cached.lock().expect("token cache poisoned");
        if let Some(tok) = cached.as_ref() {
            return tok.clone();
        }

        if let Some(tok) = read_persisted(&self.path) {
            debug!("已从 {} 读取持久化凭证", self.path.display());
            *cached = Some(tok.clone());
            return tok;
        }

        let token = match self.prompt.request_token() {
            Some(tok) if !tok.trim().is_empty() => {
                let tok = tok.trim().to_string();
                persist(&self.path, &tok);
                info!("✅ 已获取并保存 OAuth 凭证");
                tok
            }
            _ => {
                warn!("⚠️ 用户未提供 OAuth 凭证，后续云端调用将被拒绝");
                String::new()
            }
        };
        *cached = Some(token.clone());
        token
    }
}

fn read_persisted(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn persist(path: &Path, token: &str) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("创建凭证目录失败: {}，凭证仅保留在会话内", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, token) {
        warn!("保存凭证失败: {}，凭证仅保留在会话内", e);
    }
}
