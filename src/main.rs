//! 待办服务主入口

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use todo_service::{
    auth::token::TokenService, config::AppConfig, db, handlers::health, middleware::AppState,
    routes, services::UserService, telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("todo-service {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env.development > .env
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    if let Ok(profile) = std::env::var("TODO_ENV") {
        dotenv::from_filename(format!(".env.{}", profile)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    // 设置应用启动时间
    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志与指标
    telemetry::init_telemetry(&config);
    telemetry::init_metrics();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Todo service starting...");

    // 3. 数据库连接池 + 迁移
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    tracing::info!("Database initialized");

    // 4. 构建应用状态
    // 签名密钥在这里加载一次，随后以引用传入签发/验证两侧
    let token_service = Arc::new(TokenService::from_config(&config)?);
    let user_service = Arc::new(UserService::new(
        db_pool.clone(),
        token_service.clone(),
        Arc::new(config.clone()),
    ));

    let app_state = Arc::new(AppState {
        config: config.clone(),
        db: db_pool.clone(),
        user_service,
        token_service,
    });

    // 5. 构建路由
    let app = routes::create_router(app_state.clone());

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        "Server listening"
    );

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    // 超时后强制退出，避免挂起的连接无限阻塞关闭流程
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("todo-service {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: todo-service [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过环境变量完成（前缀 TODO_）");
    println!("  必需: TODO_DATABASE__URL, TODO_SECURITY__JWT_SECRET");
}
