use crate::core::ports::{CloudStore, PhotoSource};
use crate::core::types::{ImportOutcome, ImportReport};
use crate::error::SourceError;
use crate::utils::text::sanitize_path_segment;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

/// 导入协调器：一次拉取，逐张并发上传，按下标记录每张的结果
pub struct ImportCoordinator<S: PhotoSource, C: CloudStore> {
    source: S,
    store: C,
    upload_dir: String,
    concurrency: usize,
}

impl<S: PhotoSource, C: CloudStore> ImportCoordinator<S, C> {
    pub fn new(source: S, store: C, upload_dir: impl Into<String>, concurrency: usize) -> Self {
        Self {
            source,
            store,
            upload_dir: upload_dir.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// 拉取账号照片并全部上传。
    /// 拉取失败直接短路返回，不会发起任何上传；
    /// 单张上传失败不取消其余兄弟任务。
    pub async fn import_album(&self, account_id: &str) -> Result<ImportReport, SourceError> {
        let images = self.source.fetch_album(account_id).await?;
        info!("🚀 开始导入账号 {} 的 {} 张照片...", account_id, images.len());

        // 同一会话内重复导入同一账号也不能互相覆盖，路径里带本次运行的标识
        let run_id = Uuid::new_v4().simple().to_string();
        let account = sanitize_path_segment(account_id);

        let mut outcomes = vec![ImportOutcome::Pending; images.len()];
        let mut stream = stream::iter(images.into_iter().enumerate().map(|(idx, image)| {
            let path = format!(
                "{}/{}_{}_{:03}.jpg",
                self.upload_dir, account, run_id, idx
            );
            let store = &self.store;
            async move {
                let result = store.upload(&path, &image.url).await;
                (idx, path, result)
            }
        }))
        .buffer_unordered(self.concurrency);

        // 结果按下标落位，与到达顺序无关
        while let Some((idx, path, result)) = stream.next().await {
            outcomes[idx] = match result {
                Ok(()) => ImportOutcome::Succeeded { path },
                Err(e) => {
                    warn!("❌ 第 {} 张照片上传失败: {}", idx + 1, e);
                    ImportOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
        }

        let report = ImportReport { outcomes };
        if report.is_partial() {
            warn!(
                "⚠️ 导入部分失败: 成功 {} 张，失败 {} 张",
                report.succeeded(),
                report.failed()
            );
        } else {
            info!(
                "🎉 导入完成: 成功 {} 张，失败 {} 张",
                report.succeeded(),
                report.failed()
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{RemoteImage, StoredFile};
    use crate::error::CloudError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FixedSource {
        result: Mutex<Option<Result<Vec<RemoteImage>, SourceError>>>,
    }

    impl FixedSource {
        fn ok(urls: &[&str]) -> Self {
            Self {
                result: Mutex::new(Some(Ok(urls
                    .iter()
                    .map(|u| RemoteImage { url: u.to_string() })
                    .collect()))),
            }
        }

        fn err(e: SourceError) -> Self {
            Self {
                result: Mutex::new(Some(Err(e))),
            }
        }
    }

    impl PhotoSource for FixedSource {
        async fn fetch_album(&self, _account_id: &str) -> Result<Vec<RemoteImage>, SourceError> {
            self.result.lock().unwrap().take().expect("fetch 只应调用一次")
        }
    }

    /// 记录上传调用、可按来源地址注入失败的测试存储
    #[derive(Default)]
    struct RecordingStore {
        uploads: Arc<Mutex<Vec<(String, String)>>>,
        fail_on: Option<String>,
        upload_count: Arc<AtomicUsize>,
    }

    impl RecordingStore {
        fn failing_on(url: &str) -> Self {
            Self {
                fail_on: Some(url.to_string()),
                ..Self::default()
            }
        }
    }

    impl CloudStore for RecordingStore {
        async fn upload(&self, path: &str, source_url: &str) -> Result<(), CloudError> {
            self.upload_count.fetch_add(1, Ordering::SeqCst);
            self.uploads
                .lock()
                .unwrap()
                .push((path.to_string(), source_url.to_string()));
            if self.fail_on.as_deref() == Some(source_url) {
                return Err(CloudError::Server("磁盘空间不足".to_string()));
            }
            Ok(())
        }

        async fn remove(&self, _path: &str) -> Result<(), CloudError> {
            Ok(())
        }

        async fn list(&self) -> Result<Vec<StoredFile>, CloudError> {
            Ok(Vec::new())
        }

        fn resolve_download(&self, _url: &str) {}
    }

    #[tokio::test]
    async fn test_one_failure_does_not_cancel_siblings() {
        let source = FixedSource::ok(&["u0", "u1", "u2"]);
        let store = RecordingStore::failing_on("u1");
        let coordinator = ImportCoordinator::new(source, store, "/album", 4);

        let report = coordinator.import_album("42").await.unwrap();
        assert_eq!(report.outcomes.len(), 3, "三张照片应有三个结果");
        assert!(matches!(report.outcomes[0], ImportOutcome::Succeeded { .. }));
        assert!(
            matches!(&report.outcomes[1], ImportOutcome::Failed { reason } if reason.contains("磁盘空间不足")),
            "失败结果应携带原因"
        );
        assert!(matches!(report.outcomes[2], ImportOutcome::Succeeded { .. }));
        assert!(report.is_partial());
    }

    #[tokio::test]
    async fn test_fetch_failure_short_circuits_without_uploads() {
        let source = FixedSource::err(SourceError::Empty);
        let store = RecordingStore::default();
        let count = store.upload_count.clone();
        let coordinator = ImportCoordinator::new(source, store, "/album", 4);

        let err = coordinator.import_album("42").await.unwrap_err();
        assert!(matches!(err, SourceError::Empty));
        assert_eq!(count.load(Ordering::SeqCst), 0, "拉取失败时不应发起上传");
    }

    #[tokio::test]
    async fn test_outcomes_indexed_with_unique_paths() {
        let source = FixedSource::ok(&["a", "b"]);
        let store = RecordingStore::default();
        let uploads = store.uploads.clone();
        let coordinator = ImportCoordinator::new(source, store, "/album", 1);

        let report = coordinator.import_album("42").await.unwrap();
        let sources: Vec<String> = uploads.lock().unwrap().iter().map(|(_, u)| u.clone()).collect();
        assert_eq!(sources, vec!["a", "b"], "应按响应顺序提交来源地址");
        let paths: Vec<&str> = report
            .outcomes
            .iter()
            .map(|o| match o {
                ImportOutcome::Succeeded { path } => path.as_str(),
                other => panic!("期望全部成功，实际: {:?}", other),
            })
            .collect();
        assert!(paths[0].starts_with("/album/42_"));
        assert!(paths[0].ends_with("_000.jpg"), "路径应包含位置下标");
        assert!(paths[1].ends_with("_001.jpg"));
        assert_ne!(paths[0], paths[1], "同一次运行内路径不得重复");
    }

    #[tokio::test]
    async fn test_two_runs_never_collide() {
        let coordinator = ImportCoordinator::new(
            FixedSource::ok(&["a"]),
            RecordingStore::default(),
            "/album",
            1,
        );
        let first = coordinator.import_album("42").await.unwrap();

        let coordinator = ImportCoordinator::new(
            FixedSource::ok(&["a"]),
            RecordingStore::default(),
            "/album",
            1,
        );
        let second = coordinator.import_album("42").await.unwrap();

        let path_of = |r: &ImportReport| match &r.outcomes[0] {
            ImportOutcome::Succeeded { path } => path.clone(),
            other => panic!("期望成功，实际: {:?}", other),
        };
        assert_ne!(path_of(&first), path_of(&second), "两次导入不得覆盖彼此的文件");
    }
}
