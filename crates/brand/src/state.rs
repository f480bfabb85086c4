//! 品牌同步状态
//!
//! 阶段、文档来源，以及一次解析得到的文档快照

use sfukit_common::types::BrandDocument;
use std::sync::Arc;

/// 品牌同步的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrandPhase {
    Uninitialized,
    /// 远程请求进行中
    Fetching,
    /// 文档来自远程或会话缓存
    Cached,
    /// 远程获取失败，使用内置文档
    Fallback,
    /// 文档已应用到展示目标
    Applied,
}

impl std::fmt::Display for BrandPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BrandPhase::Uninitialized => "UNINITIALIZED",
            BrandPhase::Fetching => "FETCHING",
            BrandPhase::Cached => "CACHED",
            BrandPhase::Fallback => "FALLBACK",
            BrandPhase::Applied => "APPLIED",
        };
        f.write_str(name)
    }
}

/// 文档的来源
///
/// 富文本的信任策略依赖它：内置文档可信，远程文档（含其会话缓存副本）不一定可信。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrandOrigin {
    /// 本次会话内从远程端点获取
    Remote,
    /// 从会话缓存读取（最初同样来自远程端点）
    SessionCache,
    /// 内置降级文档
    BuiltIn,
}

impl BrandOrigin {
    pub fn is_remote(&self) -> bool {
        !matches!(self, BrandOrigin::BuiltIn)
    }
}

/// 不可变的品牌状态值
///
/// 由 [`crate::BrandSyncClient::get_brand`] 产生，经 [`crate::BrandApplier::apply`]
/// 变为 `Applied`。两者都返回新值而不修改共享状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandState {
    phase: BrandPhase,
    origin: BrandOrigin,
    document: Arc<BrandDocument>,
}

impl BrandState {
    pub fn cached(document: Arc<BrandDocument>, origin: BrandOrigin) -> Self {
        Self {
            phase: BrandPhase::Cached,
            origin,
            document,
        }
    }

    pub fn fallback(document: Arc<BrandDocument>) -> Self {
        Self {
            phase: BrandPhase::Fallback,
            origin: BrandOrigin::BuiltIn,
            document,
        }
    }

    /// 同一文档的 `Applied` 状态
    pub fn applied(&self) -> Self {
        Self {
            phase: BrandPhase::Applied,
            origin: self.origin,
            document: Arc::clone(&self.document),
        }
    }

    pub fn phase(&self) -> BrandPhase {
        self.phase
    }

    pub fn origin(&self) -> BrandOrigin {
        self.origin
    }

    pub fn document(&self) -> &BrandDocument {
        &self.document
    }

    pub fn shared_document(&self) -> Arc<BrandDocument> {
        Arc::clone(&self.document)
    }
}
