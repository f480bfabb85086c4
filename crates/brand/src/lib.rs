//! 品牌同步
//!
//! 每个会话最多向 `GET /brand` 请求一次品牌文档，结果写入会话缓存；
//! 请求失败时降级到内置文档。解析出的文档由 [`BrandApplier`]
//! 推送到调用方注册的展示目标。

pub mod applier;
pub mod client;
pub mod error;
pub mod source;
pub mod state;
pub mod store;

pub use applier::{
    BrandApplier, BrandField, MarkupPolicy, MemoryTarget, PresentationTarget, TargetRegistry,
    TargetUpdate, describe,
};
pub use client::{BrandClientConfig, BrandSyncClient};
pub use error::{NetworkFetchError, SessionStoreError};
pub use source::{BrandSource, DEFAULT_FETCH_TIMEOUT, HttpBrandSource};
pub use state::{BrandOrigin, BrandPhase, BrandState};
pub use store::{BRAND_DATA_KEY, MemorySessionStore, SessionStore};
