//! bel 命令行工具
//!
//! 用法：
//!   bel <input> ptr                                  # 显示当前写指针
//!   bel <input> dump [--boot N] [--count M] [--all]  # 输出记录（--sensors / --bits 展开更多内容）
//!   bel <input> list [--boot N] [--count M] [--all]  # 每次启动一行上下电时间
//!   bel --board c6100 <input> dump                   # 按 C6100 解码
//!
//! `<input>` 可以是闪存镜像文件，也可以是驱动导出的事件日志属性文件。

use anyhow::{Context, Result};
use bel::{Board, DumpOptions, EventLog, FileStorage};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "bel")]
#[command(about = "Decode FPGA board event log", long_about = None)]
struct Cli {
    /// 调试日志
    #[arg(short, long)]
    verbose: bool,

    /// 板卡类型
    #[arg(short, long, value_enum, default_value_t = Board::N6000)]
    board: Board,

    /// 事件日志文件
    input: String,

    #[command(subcommand)]
    command: Commands,
}

/// 启动范围
#[derive(Args, Debug)]
struct Range {
    /// 起始启动序号（0 为当前启动）
    #[arg(long, default_value_t = 0)]
    boot: u32,

    /// 输出的启动次数
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// 输出全部记录
    #[arg(long)]
    all: bool,
}

impl Range {
    fn options(&self) -> DumpOptions {
        if self.all {
            DumpOptions::all(self.boot)
        } else {
            DumpOptions::range(self.boot, self.count)
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 显示当前写指针
    Ptr,

    /// 输出记录
    Dump {
        #[command(flatten)]
        range: Range,

        /// 输出传感器快照
        #[arg(long)]
        sensors: bool,

        /// 展开寄存器位
        #[arg(long)]
        bits: bool,
    },

    /// 输出启动时间线
    List {
        #[command(flatten)]
        range: Range,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 日志输出到 stderr，报告输出到 stdout
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let storage = FileStorage::open(&cli.input)
        .with_context(|| format!("failed to open event log {}", cli.input))?;
    let mut log = EventLog::new(storage, cli.board);
    info!("Board: {}", log.profile().name);

    let mut out = String::new();
    let result = match cli.command {
        Commands::Ptr => log
            .pointer()
            .map(|ptr| out.push_str(&format!("{}\n", ptr)))
            .context("failed to read log pointer"),
        Commands::Dump {
            range,
            sensors,
            bits,
        } => {
            let opts = DumpOptions {
                sensors,
                bits,
                ..range.options()
            };
            log.dump(&mut out, &opts)
                .with_context(|| format!("failed to dump {}", cli.input))
        }
        Commands::List { range } => {
            let opts = DumpOptions {
                list: true,
                ..range.options()
            };
            log.dump(&mut out, &opts)
                .with_context(|| format!("failed to list {}", cli.input))
        }
    };

    // 出错前已解码的块照常输出
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(out.as_bytes())?;
    handle.flush()?;
    result
}
