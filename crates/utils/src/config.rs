#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
#[clap(rename_all = "lowercase")]
pub enum CargoEnv {
    Development,
    Production,
}

impl CargoEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            CargoEnv::Development => "development",
            CargoEnv::Production => "production",
        }
    }
}

/// 环境配置加载器
pub struct EnvLoader;

impl EnvLoader {
    /// 根据 CARGO_ENV 加载对应的环境配置文件
    pub fn load_env_file() -> Result<(), Box<dyn std::error::Error>> {
        // 1. 获取环境变量 CARGO_ENV，默认 development
        let cargo_env = std::env::var("CARGO_ENV").unwrap_or_else(|_| "development".to_string());

        // 2. 构建配置文件路径
        let env_file = Self::env_file_for(&cargo_env);

        // 3. 检查文件是否存在
        if !std::path::Path::new(env_file).exists() {
            eprintln!("⚠️  配置文件 {} 不存在，尝试加载默认的 .env 文件", env_file);
            // 回退到默认的 .env 文件
            if std::path::Path::new(".env").exists() {
                dotenvy::from_filename(".env")?;
                println!("✅ 已加载默认配置文件: .env");
            } else {
                eprintln!("❌ 未找到任何配置文件，使用环境变量与默认配置");
            }
            return Ok(());
        }

        // 4. 加载指定的环境配置文件
        dotenvy::from_filename(env_file)?;
        println!("✅ 已加载环境配置文件: {} (CARGO_ENV={})", env_file, cargo_env);

        Ok(())
    }

    fn env_file_for(cargo_env: &str) -> &'static str {
        match cargo_env {
            "production" | "Production" | "prod" => ".env.production",
            "development" | "Development" | "dev" => ".env.development",
            "test" | "Test" => ".env.test",
            _ => {
                println!("⚠️  未知的 CARGO_ENV: {}，使用默认的 .env.development", cargo_env);
                ".env.development"
            }
        }
    }
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    #[clap(long, env, value_enum, default_value = "development")]
    pub cargo_env: CargoEnv,

    #[clap(long, env, default_value = "0.0.0.0")]
    pub app_host: String,

    #[clap(long, env, default_value = "3005")]
    pub app_port: u16,

    #[clap(long, env, default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    #[clap(long, env, default_value = "userhub")]
    pub mongo_db: String,

    /// 令牌签名密钥
    #[clap(long, env, hide_env_values = true)]
    pub jwt_secret: String,

    /// 令牌有效期，支持 `7d` / `12h` / `30m` / `45s` 或纯秒数
    #[clap(long, env, default_value = "7d")]
    pub jwt_expires_in: String,

    /// bcrypt 计算强度
    #[clap(long, env, default_value = "12")]
    pub bcrypt_cost: u32,

    /// 限流窗口长度（秒）
    #[clap(long, env, default_value = "900")]
    pub rate_limit_window_secs: u64,

    /// 每个IP在一个窗口内允许的请求数
    #[clap(long, env, default_value = "100")]
    pub rate_limit_max_requests: u32,

    #[clap(long, env, default_value = "10485760")]
    pub body_limit_bytes: usize,

    #[clap(long, env, default_value = "30")]
    pub http_timeout_secs: u64,

    /// 日志过滤规则，未设置时使用 [`crate::Logger`] 的默认规则
    #[clap(long, env)]
    pub rust_log: Option<String>,

    #[clap(long, env)]
    pub log_dir: Option<String>,
}

impl AppConfig {
    /// 手动创建配置实例（用于测试）
    pub fn new_for_test() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            app_host: "0.0.0.0".to_string(),
            app_port: 3765,
            mongo_uri: std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db: std::env::var("MONGO_DB").unwrap_or_else(|_| "userhub_test".to_string()),
            jwt_secret: "test_secret_key_for_jwt_testing_only".to_string(),
            jwt_expires_in: "7d".to_string(),
            // bcrypt 允许的最小强度，加快测试
            bcrypt_cost: 4,
            rate_limit_window_secs: 900,
            rate_limit_max_requests: 100,
            body_limit_bytes: 10 * 1024 * 1024,
            http_timeout_secs: 30,
            rust_log: None,
            log_dir: None,
        }
    }
}
