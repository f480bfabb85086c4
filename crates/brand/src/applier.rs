//! 品牌应用器
//!
//! 把品牌文档中的字段推送到调用方注册的展示目标。未注册的目标和缺失的字段
//! 都静默跳过；同一文档重复应用不会改变结果。

use crate::state::{BrandOrigin, BrandState};
use sfukit_common::types::{BrandDocument, HtmlToggles};
use std::collections::BTreeMap;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

/// 可被品牌定制的逻辑字段
///
/// 字符串形式就是页面中对应元素的标识。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum BrandField {
    // site
    Title,
    Icon,
    AppleTouchIcon,
    NewRoomTitle,
    NewRoomDescription,
    // meta
    Description,
    Keywords,
    // app
    AppTitle,
    AppDescription,
    JoinDescription,
    JoinRoomButton,
    JoinLastLabel,
    // about
    AboutImage,
    AboutTitle,
    AboutHtml,
    // html 区块
    Features,
    Teams,
    TryEasier,
    PoweredBy,
    Sponsors,
    Advertisers,
    Footer,
}

impl BrandField {
    pub fn id(&self) -> &'static str {
        self.into()
    }

    /// 是否为可见性区块
    pub fn is_section(&self) -> bool {
        matches!(
            self,
            BrandField::Features
                | BrandField::Teams
                | BrandField::TryEasier
                | BrandField::PoweredBy
                | BrandField::Sponsors
                | BrandField::Advertisers
                | BrandField::Footer
        )
    }
}

impl std::fmt::Display for BrandField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// 推送给展示目标的单个更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetUpdate {
    /// 纯文本内容
    Text(String),
    /// 富文本内容，按标记渲染
    Markup(String),
    /// 链接地址（图标等）
    Link(String),
    /// 元标签内容
    MetaContent(String),
    Visibility(bool),
}

/// 展示目标
pub trait PresentationTarget {
    fn apply(&mut self, update: &TargetUpdate);
}

/// 无界面的展示目标，记录最近一次应用的值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTarget {
    pub text: Option<String>,
    pub markup: Option<String>,
    pub link: Option<String>,
    pub meta_content: Option<String>,
    pub visible: bool,
}

impl Default for MemoryTarget {
    fn default() -> Self {
        Self {
            text: None,
            markup: None,
            link: None,
            meta_content: None,
            visible: true,
        }
    }
}

impl PresentationTarget for MemoryTarget {
    fn apply(&mut self, update: &TargetUpdate) {
        match update {
            TargetUpdate::Text(text) => self.text = Some(text.clone()),
            TargetUpdate::Markup(markup) => self.markup = Some(markup.clone()),
            TargetUpdate::Link(link) => self.link = Some(link.clone()),
            TargetUpdate::MetaContent(content) => self.meta_content = Some(content.clone()),
            TargetUpdate::Visibility(visible) => self.visible = *visible,
        }
    }
}

/// 逻辑字段到展示目标的映射
#[derive(Debug, Clone)]
pub struct TargetRegistry<T> {
    targets: BTreeMap<BrandField, T>,
}

impl<T> Default for TargetRegistry<T> {
    fn default() -> Self {
        Self {
            targets: BTreeMap::new(),
        }
    }
}

impl<T> TargetRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: BrandField, target: T) -> Option<T> {
        self.targets.insert(field, target)
    }

    pub fn get(&self, field: BrandField) -> Option<&T> {
        self.targets.get(&field)
    }

    pub fn get_mut(&mut self, field: BrandField) -> Option<&mut T> {
        self.targets.get_mut(&field)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BrandField, &T)> {
        self.targets.iter()
    }
}

impl<T: Default> TargetRegistry<T> {
    /// 为每个逻辑字段注册一个默认目标
    pub fn with_all_fields() -> Self {
        Self {
            targets: BrandField::iter().map(|f| (f, T::default())).collect(),
        }
    }
}

/// 富文本的信任策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkupPolicy {
    /// 所有来源的富文本都按标记渲染
    TrustAll,
    /// 只有内置文档的富文本按标记渲染，远程来源降级为纯文本
    #[default]
    TrustBuiltIn,
    /// 富文本一律按纯文本渲染
    TrustNone,
}

impl MarkupPolicy {
    fn allows_markup(&self, origin: BrandOrigin) -> bool {
        match self {
            MarkupPolicy::TrustAll => true,
            MarkupPolicy::TrustBuiltIn => !origin.is_remote(),
            MarkupPolicy::TrustNone => false,
        }
    }
}

/// 品牌应用器
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandApplier {
    policy: MarkupPolicy,
}

impl BrandApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MarkupPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MarkupPolicy {
        self.policy
    }

    /// 计算文档对应的全部更新，不触碰任何目标
    pub fn updates(&self, state: &BrandState) -> Vec<(BrandField, TargetUpdate)> {
        let doc = state.document();
        let rich: fn(String) -> TargetUpdate = if self.policy.allows_markup(state.origin()) {
            TargetUpdate::Markup
        } else {
            TargetUpdate::Text
        };
        let text = TargetUpdate::Text;
        let link = TargetUpdate::Link;
        let meta = TargetUpdate::MetaContent;

        let mut updates = Vec::new();
        if let Some(site) = &doc.site {
            push_field(&mut updates, BrandField::Title, &site.title, text);
            push_field(&mut updates, BrandField::Icon, &site.icon, link);
            push_field(&mut updates, BrandField::AppleTouchIcon, &site.apple_touch_icon, link);
            push_field(&mut updates, BrandField::NewRoomTitle, &site.new_room_title, rich);
            push_field(
                &mut updates,
                BrandField::NewRoomDescription,
                &site.new_room_description,
                text,
            );
        }
        if let Some(tags) = &doc.meta {
            push_field(&mut updates, BrandField::Description, &tags.description, meta);
            push_field(&mut updates, BrandField::Keywords, &tags.keywords, meta);
        }
        if let Some(app) = &doc.app {
            push_field(&mut updates, BrandField::AppTitle, &app.title, rich);
            push_field(&mut updates, BrandField::AppDescription, &app.description, text);
            push_field(&mut updates, BrandField::JoinDescription, &app.join_description, rich);
            push_field(&mut updates, BrandField::JoinRoomButton, &app.join_button_label, text);
            push_field(&mut updates, BrandField::JoinLastLabel, &app.join_last_label, text);
        }
        if let Some(about) = &doc.about {
            push_field(&mut updates, BrandField::AboutImage, &about.image_url, link);
            push_field(&mut updates, BrandField::AboutTitle, &about.title, rich);
            push_field(&mut updates, BrandField::AboutHtml, &about.html, rich);
        }
        if let Some(html) = &doc.html {
            updates.extend(section_updates(html));
        }
        updates
    }

    /// 应用到已注册的目标，返回 `Applied` 状态
    pub fn apply<T: PresentationTarget>(
        &self,
        state: &BrandState,
        registry: &mut TargetRegistry<T>,
    ) -> BrandState {
        let mut applied = 0usize;
        for (field, update) in self.updates(state) {
            match registry.get_mut(field) {
                Some(target) => {
                    target.apply(&update);
                    applied += 1;
                }
                None => debug!("No target registered for brand field '{}'", field),
            }
        }
        debug!(
            "Applied {} brand updates from {:?} document",
            applied,
            state.origin()
        );
        state.applied()
    }
}

/// 空字符串与缺失同样跳过
fn push_field(
    updates: &mut Vec<(BrandField, TargetUpdate)>,
    field: BrandField,
    value: &Option<String>,
    make: fn(String) -> TargetUpdate,
) {
    if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
        updates.push((field, make(value.clone())));
    }
}

fn section_updates(html: &HtmlToggles) -> Vec<(BrandField, TargetUpdate)> {
    [
        (BrandField::Features, html.features),
        (BrandField::Teams, html.teams),
        (BrandField::TryEasier, html.try_easier),
        (BrandField::PoweredBy, html.powered_by),
        (BrandField::Sponsors, html.sponsors),
        (BrandField::Advertisers, html.advertisers),
        (BrandField::Footer, html.footer),
    ]
    .into_iter()
    .filter_map(|(field, toggle)| toggle.map(|v| (field, TargetUpdate::Visibility(v))))
    .collect()
}

/// 用于日志的简短摘要
pub fn describe(document: &BrandDocument) -> String {
    let name = document
        .app
        .as_ref()
        .and_then(|app| app.name.as_deref())
        .unwrap_or("-");
    let hidden: Vec<&str> = document
        .html
        .as_ref()
        .map(|html| {
            section_updates(html)
                .into_iter()
                .filter(|(_, update)| update == &TargetUpdate::Visibility(false))
                .map(|(field, _)| field.id())
                .collect()
        })
        .unwrap_or_default();
    format!("name={name}, hidden_sections={hidden:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfukit_common::types::{AboutBrand, AppBrand, MetaBrand, SiteBrand};
    use std::str::FromStr;
    use std::sync::Arc;

    fn remote(document: BrandDocument) -> BrandState {
        BrandState::cached(Arc::new(document), BrandOrigin::Remote)
    }

    fn builtin() -> BrandState {
        BrandState::fallback(Arc::new(BrandDocument::builtin()))
    }

    #[test]
    fn test_field_ids() {
        assert_eq!(BrandField::JoinRoomButton.id(), "joinRoomButton");
        assert_eq!(BrandField::AppleTouchIcon.to_string(), "appleTouchIcon");
        assert_eq!(BrandField::from_str("tryEasier").unwrap(), BrandField::TryEasier);
        assert!(BrandField::from_str("unknown").is_err());
        assert_eq!(BrandField::iter().count(), 22);
        assert_eq!(BrandField::iter().filter(|f| f.is_section()).count(), 7);
    }

    #[test]
    fn test_empty_document_changes_nothing() {
        let mut registry: TargetRegistry<MemoryTarget> = TargetRegistry::with_all_fields();
        let before = registry.clone();

        let state = BrandApplier::default().apply(&remote(BrandDocument::default()), &mut registry);

        assert_eq!(state.phase(), crate::state::BrandPhase::Applied);
        for (field, target) in registry.iter() {
            assert_eq!(Some(target), before.get(*field));
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let applier = BrandApplier::with_policy(MarkupPolicy::TrustAll);
        let state = builtin();

        let mut once: TargetRegistry<MemoryTarget> = TargetRegistry::with_all_fields();
        applier.apply(&state, &mut once);
        let mut twice = once.clone();
        applier.apply(&state, &mut twice);

        for (field, target) in once.iter() {
            assert_eq!(Some(target), twice.get(*field));
        }
    }

    #[test]
    fn test_unregistered_targets_are_skipped() {
        let mut registry = TargetRegistry::new();
        registry.insert(BrandField::Keywords, MemoryTarget::default());

        let doc = BrandDocument {
            meta: Some(MetaBrand {
                description: Some("desc".to_string()),
                keywords: Some("a, b".to_string()),
                ..Default::default()
            }),
            app: Some(AppBrand {
                join_button_label: Some("GO".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        BrandApplier::default().apply(&remote(doc), &mut registry);

        assert_eq!(registry.len(), 1);
        let keywords = registry.get(BrandField::Keywords).unwrap();
        assert_eq!(keywords.meta_content.as_deref(), Some("a, b"));
    }

    #[test]
    fn test_section_visibility() {
        let mut registry: TargetRegistry<MemoryTarget> = TargetRegistry::with_all_fields();
        registry.get_mut(BrandField::Teams).unwrap().visible = false;

        let doc = BrandDocument {
            html: Some(HtmlToggles {
                sponsors: Some(false),
                teams: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        BrandApplier::default().apply(&remote(doc), &mut registry);

        assert!(!registry.get(BrandField::Sponsors).unwrap().visible);
        assert!(registry.get(BrandField::Teams).unwrap().visible);
        // 缺省的区块保持显示
        assert!(registry.get(BrandField::Footer).unwrap().visible);
    }

    #[test]
    fn test_field_kinds() {
        let mut registry: TargetRegistry<MemoryTarget> = TargetRegistry::with_all_fields();
        let doc = BrandDocument {
            site: Some(SiteBrand {
                title: Some("Acme".to_string()),
                icon: Some("/favicon.png".to_string()),
                ..Default::default()
            }),
            about: Some(AboutBrand {
                image_url: Some("/about.png".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        BrandApplier::default().apply(&remote(doc), &mut registry);

        assert_eq!(registry.get(BrandField::Title).unwrap().text.as_deref(), Some("Acme"));
        assert_eq!(
            registry.get(BrandField::Icon).unwrap().link.as_deref(),
            Some("/favicon.png")
        );
        assert_eq!(
            registry.get(BrandField::AboutImage).unwrap().link.as_deref(),
            Some("/about.png")
        );
    }

    #[test]
    fn test_empty_strings_are_skipped() {
        let doc = BrandDocument {
            app: Some(AppBrand {
                title: Some(String::new()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(BrandApplier::default().updates(&remote(doc)).is_empty());
    }

    #[test]
    fn test_markup_policy() {
        let doc = BrandDocument {
            app: Some(AppBrand {
                title: Some("<b>Acme</b>".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let from_remote = remote(doc.clone());
        let from_session = BrandState::cached(Arc::new(doc.clone()), BrandOrigin::SessionCache);
        let from_builtin = BrandState::fallback(Arc::new(doc));

        let markup = TargetUpdate::Markup("<b>Acme</b>".to_string());
        let text = TargetUpdate::Text("<b>Acme</b>".to_string());
        let first = |applier: BrandApplier, state: &BrandState| applier.updates(state)[0].1.clone();

        let default = BrandApplier::default();
        assert_eq!(first(default, &from_builtin), markup);
        assert_eq!(first(default, &from_remote), text);
        assert_eq!(first(default, &from_session), text);

        let trust_all = BrandApplier::with_policy(MarkupPolicy::TrustAll);
        assert_eq!(first(trust_all, &from_remote), markup);

        let trust_none = BrandApplier::with_policy(MarkupPolicy::TrustNone);
        assert_eq!(first(trust_none, &from_builtin), text);
    }

    #[test]
    fn test_describe() {
        let doc = BrandDocument {
            app: Some(AppBrand {
                name: Some("Acme".to_string()),
                ..Default::default()
            }),
            html: Some(HtmlToggles {
                footer: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(describe(&doc), "name=Acme, hidden_sections=[\"footer\"]");
    }
}
