use crate::{
    auth::{AuthConfig, RateLimitConfig, RateLimitService},
    router::AppRouter,
    services::Services,
};
use anyhow::Context;
use axum::serve;
use database::Database;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use utils::AppConfig;

pub struct ApplicationServer;

impl ApplicationServer {
    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        // 日志初始化已经在主程序(userhub/src/main.rs)中完成

        let auth_config = AuthConfig::from_app_config(&config).context("🔴 Invalid auth configuration")?;

        let address = format!("{}:{}", config.app_host, config.app_port);
        let tcp_listener = tokio::net::TcpListener::bind(address)
            .await
            .context("🔴 Failed to bind TCP listener")?;

        let local_addr = tcp_listener.local_addr().context("🔴 Failed to get local address")?;

        let db = Database::new(config.clone()).await?;
        db.ping().await.context("🔴 MongoDB is not reachable")?;
        if let Err(e) = db.init_indexes().await {
            // 旧数据可能与唯一索引冲突，服务照常启动，由 fix-db-indexes 处理
            warn!("⚠️ 数据库索引初始化失败: {}", e);
        }

        let services = Services::new(db, &auth_config);

        let rate_limiter = RateLimitService::new(RateLimitConfig::from(config.as_ref()));
        rate_limiter.start_memory_cleanup();

        let router = AppRouter::new(services, config.clone(), rate_limiter);

        info!(
            "🟢 userhub server has launched on {local_addr} 🚀 (env: {})",
            config.cargo_env.as_str()
        );

        serve(tcp_listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .context("🔴 Failed to start server")?;

        Ok(())
    }

    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("🔴 Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("🔴 Failed to install signal handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        warn!("❌ Signal received, starting graceful shutdown...");
    }
}
