use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// VK 端单页照片数量上限（API 文档约定）
pub const VK_PAGE_CAP: u32 = 1000;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_vk_host")]
    pub vk_host: String,
    #[serde(default)]
    pub vk_access_token: String,
    #[serde(default = "default_vk_api_version")]
    pub vk_api_version: String,
    #[serde(default = "default_vk_page_size")]
    pub vk_page_size: u32,
    #[serde(default = "default_disk_host")]
    pub disk_host: String,
    #[serde(default = "default_disk_list_limit")]
    pub disk_list_limit: u64,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new("config.toml"));
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
            let cfg: AppConfig = toml::from_str(&raw)
                .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
            return Ok(cfg);
        }
        Ok(AppConfig::default())
    }

    /// 实际请求使用的单页数量，不超过 API 上限
    pub fn effective_page_size(&self) -> u32 {
        self.vk_page_size.min(VK_PAGE_CAP)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vk_host: default_vk_host(),
            vk_access_token: String::new(),
            vk_api_version: default_vk_api_version(),
            vk_page_size: default_vk_page_size(),
            disk_host: default_disk_host(),
            disk_list_limit: default_disk_list_limit(),
            token_path: default_token_path(),
            upload_dir: default_upload_dir(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_vk_host() -> String {
    "https://api.vk.com".to_string()
}

fn default_vk_api_version() -> String {
    "5.131".to_string()
}

fn default_vk_page_size() -> u32 {
    VK_PAGE_CAP
}

fn default_disk_host() -> String {
    "https://cloud-api.yandex.net/v1/disk".to_string()
}

fn default_disk_list_limit() -> u64 {
    1_000_000
}

fn default_token_path() -> String {
    "other/ya_token.txt".to_string()
}

fn default_upload_dir() -> String {
    "/album".to_string()
}

fn default_concurrency() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.vk_page_size, 1000, "默认单页数量应为 API 上限");
        assert_eq!(cfg.disk_list_limit, 1_000_000, "默认列表上限应为一百万");
        assert_eq!(cfg.vk_api_version, "5.131");
        assert!(cfg.vk_access_token.is_empty(), "默认不内置 access_token");
    }

    #[test]
    fn test_page_size_clamped_to_cap() {
        let cfg = AppConfig {
            vk_page_size: 5000,
            ..AppConfig::default()
        };
        assert_eq!(cfg.effective_page_size(), 1000, "单页数量应被限制在上限内");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_default() {
        let cfg = AppConfig::load(Some(Path::new("does_not_exist.toml"))).unwrap();
        assert_eq!(cfg.upload_dir, "/album");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("vk_access_token = \"abc\"\nconcurrency = 8").unwrap();
        assert_eq!(cfg.vk_access_token, "abc");
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.disk_host, "https://cloud-api.yandex.net/v1/disk");
    }
}
