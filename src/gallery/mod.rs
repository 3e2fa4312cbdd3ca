use crate::core::ports::CloudStore;
use crate::core::types::{GalleryItem, StoredFile};
use crate::error::CloudError;
use chrono::{DateTime, FixedOffset};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// 已上传文件的浏览面板视图模型。
/// 不绑定任何渲染层，items() 的顺序就是展示顺序（最新在前）。
/// 列表放在内部锁后面，所有方法都取共享引用：
/// 某一项的删除在途时，其余项的下载、关闭等动作照常派发。
pub struct GalleryView<C: CloudStore> {
    store: C,
    items: Mutex<Vec<GalleryItem>>,
    visible: AtomicBool,
}

impl<C: CloudStore> GalleryView<C> {
    pub fn new(store: C) -> Self {
        Self {
            store,
            items: Mutex::new(Vec::new()),
            visible: AtomicBool::new(false),
        }
    }

    /// 用列表结果整体替换展示内容。
    /// 远端按插入顺序返回（最旧在前），展示时反转为最新在前。
    pub fn render(&self, files: Vec<StoredFile>) {
        let mut items = self.items.lock().expect("gallery items poisoned");
        *items = files
            .into_iter()
            .rev()
            .map(|file| GalleryItem {
                file,
                pending: false,
            })
            .collect();
        self.visible.store(true, Ordering::SeqCst);
        debug!("渲染 {} 个画廊项", items.len());
    }

    /// 请求云端列表并渲染
    pub async fn refresh(&self) -> Result<(), CloudError> {
        let files = self.store.list().await?;
        self.render(files);
        Ok(())
    }

    /// 当前展示内容的快照
    pub fn items(&self) -> Vec<GalleryItem> {
        self.items.lock().expect("gallery items poisoned").clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// 删除一项。成功时只移除这一项的渲染，不重新拉取列表；
    /// 失败时恢复为非 pending 并把错误交给上层提示，绝不让项永远转圈或凭空消失。
    /// 等待远端期间不持有锁，其他项的动作不受影响。
    pub async fn delete(&self, path: &str) -> Result<(), CloudError> {
        {
            let mut items = self.items.lock().expect("gallery items poisoned");
            let Some(item) = items.iter_mut().find(|i| i.file.path == path) else {
                return Err(CloudError::NotFound(path.to_string()));
            };
            if item.pending {
                // 同一项的删除已在途，忽略重复点击
                debug!("忽略重复删除: {}", path);
                return Ok(());
            }
            item.pending = true;
        }

        match self.store.remove(path).await {
            Ok(()) => {
                // 外科手术式移除：其余项不动
                let mut items = self.items.lock().expect("gallery items poisoned");
                items.retain(|i| i.file.path != path);
                info!("🗑️ 已移除画廊项: {}", path);
                Ok(())
            }
            Err(e) => {
                let mut items = self.items.lock().expect("gallery items poisoned");
                if let Some(item) = items.iter_mut().find(|i| i.file.path == path) {
                    item.pending = false;
                }
                warn!("❌ 删除 {} 失败: {}", path, e);
                Err(e)
            }
        }
    }

    /// 下载一项：把稳定地址派发给云端客户端，不改变任何状态
    pub fn download(&self, path: &str) -> bool {
        let url = {
            let items = self.items.lock().expect("gallery items poisoned");
            items
                .iter()
                .find(|i| i.file.path == path)
                .map(|i| i.file.file_url.clone())
        };
        match url {
            Some(url) => {
                self.store.resolve_download(&url);
                true
            }
            None => false,
        }
    }

    /// 关闭面板只隐藏视图，不发起任何云端调用
    pub fn close(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }
}

/// 把远端的 ISO-8601 创建时间格式化为展示文本
pub fn format_created(created: &DateTime<FixedOffset>) -> String {
    created.format("%Y年%m月%d日 %H:%M").to_string()
}

/// 字节数格式化为两位小数的 KB 文本
pub fn format_size(size: u64) -> String {
    format!("{:.2}KB", size as f64 / 1024.0)
}
