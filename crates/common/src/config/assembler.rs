//! 配置装配器
//!
//! 进程启动时运行一次：合并默认层、环境层和覆盖层，补全推导出的监听端点，
//! 校验结构后产出只读的 [`RuntimeConfiguration`]。任何失败都是致命的。

use crate::config::{ConfigLayer, RuntimeConfiguration};
use crate::environment::{HostEnvironment, UNSPECIFIED_IPV4};
use crate::error::ConfigurationAssemblyError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 配置装配器
///
/// 持有默认层和环境层，可以对不同的覆盖层重复装配。
#[derive(Debug, Clone)]
pub struct ConfigAssembler {
    defaults: ConfigLayer,
    environment: ConfigLayer,
}

impl ConfigAssembler {
    /// 使用内置默认值和给定主机事实创建装配器
    pub fn for_host(host: &HostEnvironment) -> Result<Self, ConfigurationAssemblyError> {
        Ok(Self {
            defaults: ConfigLayer::from_config(&RuntimeConfiguration::default())?,
            environment: ConfigLayer::from_host(host),
        })
    }

    /// 对给定覆盖层进行装配
    pub fn assemble_with(
        &self,
        overrides: &ConfigLayer,
    ) -> Result<Arc<RuntimeConfiguration>, ConfigurationAssemblyError> {
        Self::assemble(&self.defaults, &self.environment, overrides)
    }

    /// 探测主机，读取可选的 TOML 覆盖文件并装配
    pub fn load(
        overrides_path: Option<&Path>,
    ) -> Result<Arc<RuntimeConfiguration>, ConfigurationAssemblyError> {
        let overrides = match overrides_path {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::empty("overrides"),
        };
        Self::for_host(&HostEnvironment::detect())?.assemble_with(&overrides)
    }

    /// 三层合并：覆盖 > 环境 > 默认，逐叶生效
    ///
    /// 覆盖层中未识别的键被保留在 `extensions` 中。合并后先推导缺失的监听端点，
    /// 再做结构校验；端口范围倒置、容量不足或类型不匹配都会返回
    /// [`ConfigurationAssemblyError`]。
    pub fn assemble(
        defaults: &ConfigLayer,
        environment: &ConfigLayer,
        overrides: &ConfigLayer,
    ) -> Result<Arc<RuntimeConfiguration>, ConfigurationAssemblyError> {
        let mut merged = defaults.clone();
        for layer in [environment, overrides] {
            debug!("Merging configuration layer '{}'", layer.name());
            merged.merge(layer);
        }

        let mut config = RuntimeConfiguration::from_value(merged.into_value())?;
        config.mediasoup.derive_listen_infos()?;

        if let Err(problems) = config.validate() {
            return Err(ConfigurationAssemblyError::Invalid { problems });
        }

        if config.mediasoup.announced_address == UNSPECIFIED_IPV4.to_string() {
            warn!(
                "No external IPv4 address found, announcing {}; set mediasoup.announced_address for production",
                UNSPECIFIED_IPV4
            );
        }
        if !config.extensions.is_empty() {
            debug!(
                "Keeping unrecognized top-level keys: {:?}",
                config.extensions.keys().collect::<Vec<_>>()
            );
        }

        info!(
            "Configuration assembled: listen={}:{}, workers={}, announced={}, rtc_ports={}",
            config.server.listen.ip,
            config.server.listen.port,
            config.mediasoup.num_workers,
            config.mediasoup.announced_address,
            config.mediasoup.worker_port_range()
        );

        Ok(Arc::new(config))
    }
}
