//! 品牌文档
//!
//! 服务端通过 `GET /brand` 下发、客户端应用到展示目标的定制数据。
//! 所有叶子字段都是可选的：缺失表示“不修改对应的展示目标”。
//! 线上格式使用 camelCase 键名。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 品牌文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<AppBrand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteBrand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaBrand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og: Option<OgBrand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<HtmlToggles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutBrand>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// 应用主界面文案
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppBrand {
    /// ISO 639 语言代码
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 富文本（可能包含标记）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 富文本（可能包含标记）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_button_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_last_label: Option<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// 站点元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteBrand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apple_touch_icon: Option<String>,
    /// 富文本（可能包含标记）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_room_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_room_description: Option<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// SEO 元标签
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaBrand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// Open Graph 分享元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgBrand {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// 可选页面区块的可见性开关
///
/// 区块默认显示；显式 `false` 隐藏。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlToggles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub try_easier: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powered_by: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertisers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<bool>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// “关于”对话框
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutBrand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// 富文本（可能包含标记）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// 富文本（可能包含标记）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// `GET /brand` 的响应体：`{ "message": BrandDocument }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEnvelope {
    #[serde(default)]
    pub message: Option<BrandDocument>,
}

impl BrandEnvelope {
    pub fn new(document: BrandDocument) -> Self {
        Self {
            message: Some(document),
        }
    }
}

impl BrandDocument {
    /// 所有字段都缺失
    pub fn is_empty(&self) -> bool {
        self == &BrandDocument::default()
    }

    /// 内置默认品牌文档
    ///
    /// 远程获取失败时客户端使用它，也是服务端 `ui.brand` 的默认值。
    pub fn builtin() -> Self {
        Self {
            app: Some(AppBrand {
                language: Some("en".to_string()),
                name: Some("sfukit".to_string()),
                title: Some(
                    "sfukit<br />Free browser based real-time video calls.<br />Simple, Secure, Fast."
                        .to_string(),
                ),
                description: Some(
                    "Start your next video call with a single click. No download, plug-in, or login is required."
                        .to_string(),
                ),
                join_description: Some("Pick a room name.<br />How about this one?".to_string()),
                join_button_label: Some("JOIN ROOM".to_string()),
                join_last_label: Some("Your recent room:".to_string()),
                extensions: Map::new(),
            }),
            site: Some(SiteBrand {
                title: Some("sfukit, Free Video Calls, Messaging and Screen Sharing".to_string()),
                icon: Some("../images/logo.svg".to_string()),
                apple_touch_icon: Some("../images/logo.svg".to_string()),
                new_room_title: Some(
                    "Pick name. <br />Share URL. <br />Start conference.".to_string(),
                ),
                new_room_description: Some(
                    "Each room has its disposable URL. Just pick a room name and share your custom URL."
                        .to_string(),
                ),
                extensions: Map::new(),
            }),
            meta: Some(MetaBrand {
                description: Some(
                    "sfukit powered by WebRTC and mediasoup, real-time video calls, messaging and screen sharing in the browser."
                        .to_string(),
                ),
                keywords: Some(
                    "webrtc, mediasoup, sfu, self hosted, voip, video conference, screen sharing"
                        .to_string(),
                ),
                extensions: Map::new(),
            }),
            og: Some(OgBrand {
                kind: Some("app-webrtc".to_string()),
                site_name: Some("sfukit".to_string()),
                title: Some("Click the link to make a call.".to_string()),
                description: Some(
                    "sfukit provides real-time video calls, messaging and screen sharing."
                        .to_string(),
                ),
                image: Some("../images/logo.svg".to_string()),
                url: Some("http://localhost:3010".to_string()),
                extensions: Map::new(),
            }),
            html: Some(HtmlToggles {
                features: Some(true),
                teams: Some(true),
                try_easier: Some(true),
                powered_by: Some(true),
                sponsors: Some(true),
                advertisers: Some(true),
                footer: Some(true),
                extensions: Map::new(),
            }),
            about: Some(AboutBrand {
                image_url: Some("../images/logo.svg".to_string()),
                title: Some("<strong>WebRTC SFU</strong>".to_string()),
                html: Some("<hr /><span>&copy; sfukit, all rights reserved</span><hr />".to_string()),
                extensions: Map::new(),
            }),
            extensions: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_document_parses() {
        let doc: BrandDocument = serde_json::from_value(json!({
            "app": { "joinButtonLabel": "GO" },
            "html": { "tryEasier": false }
        }))
        .unwrap();

        let app = doc.app.as_ref().unwrap();
        assert_eq!(app.join_button_label.as_deref(), Some("GO"));
        assert!(app.title.is_none());
        assert_eq!(doc.html.as_ref().unwrap().try_easier, Some(false));
        assert!(doc.site.is_none());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let doc = BrandDocument {
            meta: Some(MetaBrand {
                keywords: Some("a, b".to_string()),
                description: None,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "meta": { "keywords": "a, b" } })
        );
    }

    #[test]
    fn test_og_type_key() {
        let doc: BrandDocument =
            serde_json::from_value(json!({ "og": { "type": "website", "siteName": "x" } }))
                .unwrap();
        let og = doc.og.unwrap();
        assert_eq!(og.kind.as_deref(), Some("website"));
        assert_eq!(og.site_name.as_deref(), Some("x"));
    }

    #[test]
    fn test_envelope_without_message() {
        let envelope: BrandEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_builtin_is_complete() {
        let doc = BrandDocument::builtin();
        assert!(!doc.is_empty());
        assert!(BrandDocument::default().is_empty());
        let html = doc.html.unwrap();
        assert_eq!(html.footer, Some(true));
    }
}
