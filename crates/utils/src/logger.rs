use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{AppConfig, CargoEnv};

/// 默认日志过滤规则（`RUST_LOG` 未设置时使用）
const DEFAULT_FILTER: &str = "userhub=debug,server=debug,database=debug,utils=debug,tower_http=debug";

pub struct Logger;
impl Logger {
    /// 按应用配置初始化（`CARGO_ENV` / `LOG_DIR` / `RUST_LOG`）。
    ///
    /// 开发环境输出到控制台，生产环境按天滚动写入文件。
    /// 返回的 guard 必须在进程生命周期内持有，否则缓冲日志会丢失。
    pub fn init(config: &AppConfig) -> WorkerGuard {
        Self::build(
            config.cargo_env,
            config.log_dir.as_ref().map(PathBuf::from),
            config.rust_log.as_deref(),
        )
    }

    fn build(cargo_env: CargoEnv, log_dir: Option<PathBuf>, filter: Option<&str>) -> WorkerGuard {
        let (non_blocking, guard) = match cargo_env {
            CargoEnv::Development => tracing_appender::non_blocking(std::io::stdout()),
            CargoEnv::Production => {
                let mut log_directory = Self::get_log_directory(log_dir);

                // 确保日志目录存在
                if let Err(e) = std::fs::create_dir_all(&log_directory) {
                    eprintln!("⚠️ 无法创建日志目录 {:?}: {}，回退到 ./logs", log_directory, e);
                    log_directory = PathBuf::from("logs");
                    std::fs::create_dir_all(&log_directory).ok();
                }

                println!("✅ 日志将输出到目录: {:?}", log_directory);
                let file_logger = tracing_appender::rolling::daily(&log_directory, "userhub.log");
                tracing_appender::non_blocking(file_logger)
            }
        };

        let env_filter = match filter {
            Some(filter) => tracing_subscriber::EnvFilter::try_new(filter).unwrap_or_else(|e| {
                eprintln!("⚠️ RUST_LOG 无法解析 ({}): {}，使用默认规则", filter, e);
                DEFAULT_FILTER.into()
            }),
            None => tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(matches!(cargo_env, CargoEnv::Development))
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false),
            )
            .init();

        guard
    }

    fn get_log_directory(log_dir: Option<PathBuf>) -> PathBuf {
        // 1. 优先使用传入的参数
        if let Some(dir) = log_dir {
            return dir;
        }

        // 2. 检查环境变量 LOG_DIR
        if let Ok(log_dir_env) = std::env::var("LOG_DIR") {
            return PathBuf::from(log_dir_env);
        }

        // 3. 回退到当前工作目录
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("logs")
    }
}
