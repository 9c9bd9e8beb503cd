use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 构造指定类型的缓存插件
async fn build_cache(cache_type: &str) -> Result<Arc<dyn ObjectCache>, String> {
    let constructor = get_object_cache_plugin(cache_type)
        .ok_or_else(|| format!("Cache backend '{cache_type}' not found in registry"))?;
    constructor()
        .await
        .map(Arc::from)
        .map_err(|e| e.to_string())
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            return Ok(cache);
        }
        Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        match build_cache("moka").await {
            Ok(cache) => {
                warn!("Successfully created fallback Moka (in-memory) cache backend");
                return Ok(cache);
            }
            Err(e) => warn!("Failed to create fallback Moka cache: {}", e),
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和路由配置等
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let evaluation = &AppConfig::get().evaluation;
    warn!(
        "Submission deadline {} ms, rate limit {} per minute",
        evaluation.submit_timeout_ms, evaluation.submit_rate_limit
    );

    // 创建缓存实例
    let cache = create_cache().await.expect("Failed to create cache");
    // 清空上次运行遗留的条目
    cache.invalidate_all().await;
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}
