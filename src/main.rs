//! sfukit 主程序
//!
//! 装配 SFU 运行时配置并输出网络摘要，或对运行中的服务端执行一次品牌同步

mod cli;
mod error;
mod observability;

use anyhow::Context;
use brand::{
    BrandApplier, BrandClientConfig, BrandSyncClient, MemorySessionStore, MemoryTarget,
    TargetRegistry, describe,
};
use clap::Parser;
use observability::{bootstrap_dispatch, init_command_logging, init_observability};
use sfukit_common::config::{ObservabilityConfig, RuntimeConfiguration};
use sfukit_common::ConfigAssembler;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

macro_rules! bootstrap_info {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

macro_rules! bootstrap_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

use cli::{Cli, Commands};
use error::{Error, Result};

/// Application launcher utilities
struct ApplicationLauncher;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { config_file }) => {
            let explicit = config_file.or(cli.config);
            ApplicationLauncher::check_config(explicit.as_deref())
        }
        Some(Commands::Show) => ApplicationLauncher::show_config(cli.config.as_deref()),
        Some(Commands::Brand {
            endpoint,
            timeout_ms,
        }) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(ApplicationLauncher::fetch_brand(
                &endpoint,
                Duration::from_millis(timeout_ms),
            ))
        }
        None => ApplicationLauncher::run_application(cli.config.as_deref()),
    }
}

impl ApplicationLauncher {
    /// Find the overrides file with fallback locations
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and a missing file means "no overrides".
    fn find_overrides_file(provided_path: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = provided_path {
            if path.exists() {
                bootstrap_info!("Using provided config file: {:?}", path);
                return Ok(Some(path.to_path_buf()));
            }
            bootstrap_error!("Provided config file not found: {:?}", path);
            return Err(Error::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let fallback_paths = [
            // 1. Current working directory
            PathBuf::from("config.toml"),
            // 2. System config directory
            PathBuf::from("/etc/sfukit/config.toml"),
        ];

        for path in &fallback_paths {
            if path.exists() {
                bootstrap_info!("Found config file: {:?}", path);
                return Ok(Some(path.clone()));
            }
        }

        bootstrap_info!("No config file found, using built-in defaults and host environment");
        Ok(None)
    }

    /// 装配配置，失败时逐条打印问题
    fn assemble(provided_path: Option<&Path>) -> Result<Arc<RuntimeConfiguration>> {
        let overrides = Self::find_overrides_file(provided_path)?;

        ConfigAssembler::load(overrides.as_deref()).map_err(|e| {
            let err = Error::from(e);
            if err.problems().is_empty() {
                bootstrap_error!("❌ 配置装配失败: {}", err);
            } else {
                bootstrap_error!("❌ 配置验证发现问题:");
                for (i, problem) in err.problems().iter().enumerate() {
                    bootstrap_error!("  {}. ❌ {}", i + 1, problem);
                }
            }
            err
        })
    }

    /// 检查配置是否可以装配
    fn check_config(provided_path: Option<&Path>) -> Result<()> {
        init_command_logging(&ObservabilityConfig::default());

        let config = Self::assemble(provided_path)?;
        info!("✅ 配置装配成功");
        Self::display_network_summary(&config);
        Ok(())
    }

    /// 打印装配结果
    fn show_config(provided_path: Option<&Path>) -> Result<()> {
        init_command_logging(&ObservabilityConfig {
            filter_level: "warn".to_string(),
            ..Default::default()
        });

        let config = Self::assemble(provided_path)?;
        let rendered = serde_json::to_string_pretty(&*config)?;
        println!("{rendered}");
        Ok(())
    }

    /// 对运行中的服务端执行一次品牌同步
    async fn fetch_brand(endpoint: &str, timeout: Duration) -> Result<()> {
        init_command_logging(&ObservabilityConfig::default());

        let client = BrandSyncClient::http(
            endpoint,
            Arc::new(MemorySessionStore::new()),
            BrandClientConfig {
                timeout,
                ..Default::default()
            },
        )?;

        let resolved = client.get_brand().await;
        println!("phase: {}", resolved.phase());
        println!("origin: {:?}", resolved.origin());
        let rendered = serde_json::to_string_pretty(resolved.document())
            .context("Failed to render brand document")?;
        println!("{rendered}");

        let mut targets: TargetRegistry<MemoryTarget> = TargetRegistry::with_all_fields();
        let applied = client.sync(&BrandApplier::default(), &mut targets).await;
        info!(
            "Brand {} ({})",
            applied.phase(),
            describe(applied.document())
        );
        Ok(())
    }

    /// 运行应用程序的主入口
    fn run_application(provided_path: Option<&Path>) -> Result<()> {
        // 配置装配完成前日志目标未知，先写 stderr
        let bootstrap = bootstrap_dispatch();
        let config =
            tracing::dispatcher::with_default(&bootstrap, || Self::assemble(provided_path))?;
        let _guard = init_observability(config.observability_config())?;

        info!("🚀 sfukit 配置已就绪");
        Self::display_network_summary(&config);
        Ok(())
    }

    fn display_network_summary(config: &RuntimeConfiguration) {
        let mediasoup = &config.mediasoup;

        info!("📋 网络配置摘要:");
        info!(
            "  - Listen: {}:{}",
            config.server.listen.ip, config.server.listen.port
        );
        info!("  - Host URL: {}", config.server.effective_host_url());
        info!(
            "  - Workers: {} (rtc ports {})",
            mediasoup.num_workers,
            mediasoup.worker_port_range()
        );
        info!("  - Announced address: {}", mediasoup.announced_address);
        for endpoint in &mediasoup.web_rtc_server_options.listen_infos {
            info!(
                "  - WebRTC server {:?} {} ports {}",
                endpoint.protocol, endpoint.ip, endpoint.port_range
            );
        }
        for endpoint in &mediasoup.web_rtc_transport.listen_infos {
            info!(
                "  - WebRTC transport {:?} {} ports {}",
                endpoint.protocol, endpoint.ip, endpoint.port_range
            );
        }
        info!("  - FFmpeg: {}", config.server.rtmp.ffmpeg_path);

        let enabled: Vec<&str> = config.integrations.enabled().collect();
        if !enabled.is_empty() {
            info!("  - Integrations: {}", enabled.join(", "));
        }
        if config.server.cors.allows_any_origin() {
            warn!("CORS allows any origin; restrict server.cors.origin for production");
        }
        info!("  - Brand: {}", describe(&config.ui.brand));
    }
}
