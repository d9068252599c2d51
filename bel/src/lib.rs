//! bel - FPGA 板卡事件日志 (Board Event Log) 解码
//!
//! 特性：
//! - 环形存储：63 个 4KB 块加一个写指针，指针向前追溯历次启动
//! - 子记录：固定偏移，魔数匹配才解码，缺失不是错误
//! - 时间修正：上电时间戳叠加 TimeOfDay 偏移
//! - 板卡配置：N6000 / C6100 的传感器目录与寄存器位定义
//! - 时间线：每次启动一行上下电时间

pub mod bits;
pub mod board;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod event_log;
pub mod header;
pub mod record;
pub mod report;
pub mod ring;
pub mod storage;
pub mod timeline;

pub use board::{Board, BoardProfile};
pub use decoder::print_record;
pub use error::{BelError, Result};
pub use event_log::{DumpOptions, EventLog};
pub use record::{read_block, EventRecord};
pub use report::Report;
pub use ring::{block_count, current_pointer, predecessor};
pub use storage::{FileStorage, MemStorage, Storage, StorageError};
pub use timeline::timespan;
