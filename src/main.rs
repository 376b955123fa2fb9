use clap::{Parser, Subcommand};
use pugjsx::config::CodegenConfig;
use pugjsx::printer::JsPrinter;
use pugjsx::rewrite::PassThrough;
use pugjsx::runtime::Helper;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pugjsx", about = "模板节点树 → 带哨兵的 JavaScript 中间代码", version = long_version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 编译解析器输出的 JSON 节点树
    Compile {
        /// 节点树 JSON 文件
        input: PathBuf,

        /// 配置文件
        #[arg(short, long, default_value = "pugjsx.toml")]
        config: PathBuf,

        /// 输出文件（默认标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 只输出生成阶段的中间代码，不追加辅助函数声明
        #[arg(long)]
        intermediate: bool,
    },

    /// 打印运行时辅助函数的 JavaScript 源码
    Runtime {
        /// map / attr / class
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Compile { config, .. } => CodegenConfig::load(config)?,
        Commands::Runtime { .. } => CodegenConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .init();

    match cli.command {
        Commands::Compile {
            input,
            output,
            intermediate,
            ..
        } => {
            let json = std::fs::read_to_string(&input)
                .map_err(|e| anyhow::anyhow!("读取 {} 失败：{}", input.display(), e))?;
            let root = pugjsx::ast::parse(&json)?;

            let code = if intermediate {
                pugjsx::codegen::generate(&root, &config)?.intermediate_text()
            } else {
                pugjsx::compile(&root, &config, &mut PassThrough, &JsPrinter::default())?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, &code)
                        .map_err(|e| anyhow::anyhow!("写入 {} 失败：{}", path.display(), e))?;
                    tracing::info!("已编译 {} → {}", input.display(), path.display());
                }
                None => print!("{code}"),
            }
        }
        Commands::Runtime { name } => {
            let Some(helper) = Helper::from_name(&name) else {
                anyhow::bail!("未知的运行时辅助函数：{name}（可选 map / attr / class）");
            };
            // 作为独立模块文件使用时需要导出
            for dep in helper.requires() {
                println!("{}\n", dep.js_source());
            }
            println!("{}\nmodule.exports = {};", helper.js_source(), helper.ident());
        }
    }

    Ok(())
}

const fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\ncommit:  ",
        env!("PUGJSX_GIT_COMMIT"),
        "\nbuild:   ",
        env!("PUGJSX_BUILD_TIME"),
        "\ntarget:  ",
        env!("PUGJSX_BUILD_TARGET"),
        "\nprofile: ",
        env!("PUGJSX_BUILD_PROFILE"),
    )
}
