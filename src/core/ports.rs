use crate::core::types::{RemoteImage, StoredFile};
use crate::error::{CloudError, SourceError};

/// 照片来源端口，协调器只依赖这个抽象
pub trait PhotoSource {
    /// 按账号 id 拉取一页照片，返回按响应顺序排列的最高分辨率地址
    fn fetch_album(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Vec<RemoteImage>, SourceError>> + Send;
}

/// 云存储端口，四个操作全部要求有效凭证
pub trait CloudStore {
    /// 让远端服务自行抓取 source_url 并存到 path，本进程不中转字节
    fn upload(
        &self,
        path: &str,
        source_url: &str,
    ) -> impl Future<Output = Result<(), CloudError>> + Send;

    /// 删除 path 处的文件，只有响应体为空时才算成功
    fn remove(&self, path: &str) -> impl Future<Output = Result<(), CloudError>> + Send;

    /// 列出云端图片文件，上限由配置决定
    fn list(&self) -> impl Future<Output = Result<Vec<StoredFile>, CloudError>> + Send;

    /// 触发客户端下载，同步、无网络请求、无完成信号
    fn resolve_download(&self, url: &str);
}
