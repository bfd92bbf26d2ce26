//! # 示例应用程序
//!
//! 启动容器，依次分发命令行给出的请求 URI，并以 JSON 输出分发结果

mod demo;

use clap::Parser;
use mvc_common::ApplicationProperties;
use mvc_composition::{ApplicationBuilder, ApplicationContext, LoggingConfig};
use serde_json::json;
use std::path::PathBuf;
use tracing::{error, info};

const DEFAULT_SCAN_PACKAGE: &str = "example_app.demo";

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "mini-mvc 示例应用")]
struct Args {
    /// 配置文件路径（.properties / .toml / .json / .yaml）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 扫描包，覆盖配置文件中的 scanPackage
    #[arg(long)]
    scan_package: Option<String>,

    /// 类路径根目录，设置后按目录扫描组件
    #[arg(long)]
    classpath: Option<String>,

    /// 重复的 Bean 名称或路由视为启动错误
    #[arg(long)]
    strict: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 使用 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,

    /// 要分发的请求 URI
    uris: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig::default()
        .with_level_name(&args.log_level)?
        .with_json_format(args.json_logs);

    let mut builder = ApplicationBuilder::new().with_logging(logging);
    if let Some(config) = &args.config {
        builder = builder.add_config_file(config);
    }
    match (&args.scan_package, &args.config) {
        (Some(package), _) => builder = builder.with_property(ApplicationProperties::SCAN_PACKAGE, package.as_str()),
        (None, None) => builder = builder.with_property(ApplicationProperties::SCAN_PACKAGE, DEFAULT_SCAN_PACKAGE),
        (None, Some(_)) => {}
    }
    if let Some(classpath) = &args.classpath {
        builder = builder.with_property(ApplicationProperties::CLASSPATH, classpath.as_str());
    }
    if args.strict {
        builder = builder.with_property(ApplicationProperties::STRICT_MODE, "true");
    }

    let context = builder.build()?;
    info!("启动完成: {}", context.report());

    if args.uris.is_empty() {
        println!("{}", serde_json::to_string_pretty(context.report())?);
        return Ok(());
    }

    for uri in &args.uris {
        println!("{}", serde_json::to_string_pretty(&dispatch(&context, uri))?);
    }
    Ok(())
}

/// 分发单个请求，处理器错误转换为 JSON 结果
fn dispatch(context: &ApplicationContext, uri: &str) -> serde_json::Value {
    match context.dispatch_uri(uri) {
        Ok(outcome) => json!(outcome),
        Err(e) => {
            error!("请求处理失败: {} -> {}", uri, e);
            json!({ "status": "error", "uri": uri, "message": e.to_string() })
        }
    }
}
