//! 品牌同步客户端
//!
//! 会话级状态机：
//!
//! ```text
//! UNINITIALIZED ──(会话缓存命中)──────────────▶ CACHED ──┐
//!       │                                              ├──(应用完成)──▶ APPLIED
//!       └──▶ FETCHING ──(成功，写入会话缓存)──▶ CACHED ──┤
//!                 └────(失败/超时/非 2xx)───▶ FALLBACK ─┘
//! ```
//!
//! 每个客户端最多只有一次在途请求，并发调用者等待同一个结果；
//! 解析完成后整个生命周期内都返回同一个状态，失败不会重试。

use crate::applier::{BrandApplier, PresentationTarget, TargetRegistry};
use crate::error::NetworkFetchError;
use crate::source::{BrandSource, DEFAULT_FETCH_TIMEOUT, HttpBrandSource};
use crate::state::{BrandOrigin, BrandPhase, BrandState};
use crate::store::{BRAND_DATA_KEY, SessionStore};
use sfukit_common::types::BrandDocument;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

/// 客户端配置
#[derive(Debug, Clone)]
pub struct BrandClientConfig {
    /// 远程请求的总超时
    pub timeout: Duration,
    /// 降级文档
    pub fallback: Arc<BrandDocument>,
}

impl Default for BrandClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            fallback: Arc::new(BrandDocument::builtin()),
        }
    }
}

/// 品牌同步客户端
pub struct BrandSyncClient {
    source: Arc<dyn BrandSource>,
    store: Arc<dyn SessionStore>,
    config: BrandClientConfig,
    resolved: OnceCell<BrandState>,
    phase: watch::Sender<BrandPhase>,
}

impl std::fmt::Debug for BrandSyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandSyncClient")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl BrandSyncClient {
    pub fn new(
        source: Arc<dyn BrandSource>,
        store: Arc<dyn SessionStore>,
        config: BrandClientConfig,
    ) -> Self {
        let (phase, _) = watch::channel(BrandPhase::Uninitialized);
        Self {
            source,
            store,
            config,
            resolved: OnceCell::new(),
            phase,
        }
    }

    /// 使用 HTTP 来源创建客户端
    pub fn http(
        endpoint: &str,
        store: Arc<dyn SessionStore>,
        config: BrandClientConfig,
    ) -> Result<Self, NetworkFetchError> {
        let source = HttpBrandSource::new(endpoint, config.timeout)?;
        Ok(Self::new(Arc::new(source), store, config))
    }

    /// 当前阶段
    pub fn phase(&self) -> BrandPhase {
        *self.phase.borrow()
    }

    /// 订阅阶段变化
    pub fn subscribe(&self) -> watch::Receiver<BrandPhase> {
        self.phase.subscribe()
    }

    /// 解析本会话的品牌文档
    ///
    /// 永不失败：所有错误都降级为 `Fallback`。
    pub async fn get_brand(&self) -> BrandState {
        self.resolved.get_or_init(|| self.resolve()).await.clone()
    }

    /// 解析并应用到展示目标，阶段最终为 `Applied`
    pub async fn sync<T: PresentationTarget>(
        &self,
        applier: &BrandApplier,
        registry: &mut TargetRegistry<T>,
    ) -> BrandState {
        let state = self.get_brand().await;
        let applied = applier.apply(&state, registry);
        self.set_phase(BrandPhase::Applied);
        applied
    }

    async fn resolve(&self) -> BrandState {
        if let Some(document) = self.read_session() {
            debug!("Brand document served from session cache");
            self.set_phase(BrandPhase::Cached);
            return BrandState::cached(Arc::new(document), BrandOrigin::SessionCache);
        }

        self.set_phase(BrandPhase::Fetching);
        match self.fetch().await {
            Ok(document) => {
                self.write_session(&document);
                info!("Brand document fetched from remote endpoint");
                self.set_phase(BrandPhase::Cached);
                BrandState::cached(Arc::new(document), BrandOrigin::Remote)
            }
            Err(e) => {
                warn!("Brand fetch failed, using built-in document: {}", e);
                self.set_phase(BrandPhase::Fallback);
                BrandState::fallback(Arc::clone(&self.config.fallback))
            }
        }
    }

    async fn fetch(&self) -> Result<BrandDocument, NetworkFetchError> {
        match tokio::time::timeout(self.config.timeout, self.source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(NetworkFetchError::Timeout {
                after: self.config.timeout,
            }),
        }
    }

    fn read_session(&self) -> Option<BrandDocument> {
        let raw = self.store.get(BRAND_DATA_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Ignoring malformed cached brand document: {}", e);
                None
            }
        }
    }

    fn write_session(&self, document: &BrandDocument) {
        let result = serde_json::to_string(document)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                self.store
                    .set(BRAND_DATA_KEY, raw)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!("Failed to cache brand document for this session: {}", e);
        }
    }

    fn set_phase(&self, phase: BrandPhase) {
        let previous = self.phase.send_replace(phase);
        debug!("Brand phase {} -> {}", previous, phase);
    }
}
