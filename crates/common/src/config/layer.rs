//! 配置层
//!
//! 一层即一棵 JSON 对象树。装配时按 默认值 < 环境 < 覆盖 的顺序逐叶合并：
//! 对象递归合并，标量和数组整体替换，`null` 不会清除下层的值。

use crate::config::RuntimeConfiguration;
use crate::environment::HostEnvironment;
use crate::error::ConfigurationAssemblyError;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    name: String,
    values: Map<String, Value>,
}

impl ConfigLayer {
    /// 空层（不提供任何值）
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Map::new(),
        }
    }

    /// 从 JSON 值构造，顶层必须是对象
    pub fn from_value(
        name: impl Into<String>,
        value: Value,
    ) -> Result<Self, ConfigurationAssemblyError> {
        let name = name.into();
        match value {
            Value::Object(values) => Ok(Self { name, values }),
            _ => Err(ConfigurationAssemblyError::NotATable { layer: name }),
        }
    }

    /// 由类型化配置生成默认层
    pub fn from_config(config: &RuntimeConfiguration) -> Result<Self, ConfigurationAssemblyError> {
        Self::from_value("defaults", config.to_value()?)
    }

    /// 解析 TOML 覆盖
    pub fn from_toml_str(
        name: impl Into<String>,
        content: &str,
    ) -> Result<Self, ConfigurationAssemblyError> {
        let table: toml::Table = toml::from_str(content)?;
        Self::from_value(name, serde_json::to_value(table)?)
    }

    /// 从 TOML 文件加载覆盖
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationAssemblyError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigurationAssemblyError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml_str(path.display().to_string(), &content)
    }

    /// 由主机事实生成环境层
    ///
    /// 只在 `PORT` 覆盖存在时写入监听端口，其余字段总是写入。
    pub fn from_host(host: &HostEnvironment) -> Self {
        let mut layer = Self::empty("environment")
            .with(
                "server.rtmp.ffmpeg_path",
                host.executable_path().display().to_string(),
            )
            .with("server.rtmp.platform", host.platform.id())
            .with("mediasoup.num_workers", host.num_workers)
            .with("mediasoup.announced_address", host.primary_ipv4.to_string());

        if let Some(port) = host.listen_port {
            layer = layer.with("server.listen.port", port);
        }
        layer
    }

    /// 按点分路径写入一个值，缺失的中间对象会被创建，非对象的中间值会被替换
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return self;
        };

        let mut cursor = &mut self.values;
        for segment in segments {
            let entry = cursor
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Some(next) = entry.as_object_mut() else {
                return self;
            };
            cursor = next;
        }
        cursor.insert(last.to_string(), value.into());
        self
    }

    /// 按点分路径读取
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.values.get(first)?, |value, segment| value.get(segment))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 把 `overlay` 合并到当前层之上
    pub fn merge(&mut self, overlay: &ConfigLayer) {
        merge_into(&mut self.values, &overlay.values);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

fn merge_into(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        if value.is_null() {
            continue;
        }
        if let (Some(Value::Object(base_obj)), Value::Object(overlay_obj)) =
            (base.get_mut(key), value)
        {
            merge_into(base_obj, overlay_obj);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}
