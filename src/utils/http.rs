use once_cell::sync::Lazy;

static BUILT_IN_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// 进程内唯一的内置 HTTP 客户端，连接池在所有调用方之间共享
pub fn built_in_client() -> reqwest::Client {
    BUILT_IN_CLIENT.clone()
}
