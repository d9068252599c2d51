//! 事件日志遍历
//!
//! 从当前写指针向前追溯，按启动序号输出记录。序号 0 是当前启动，1 是上一次，依此类推。

use std::fmt::Write;

use tracing::{debug, info};

use crate::board::{Board, BoardProfile};
use crate::decoder::print_record;
use crate::error::{BelError, Result};
use crate::record::{read_block, EventRecord};
use crate::report::Report;
use crate::ring::{block_count, current_pointer, predecessor};
use crate::storage::Storage;
use crate::timeline::timespan;

/// 遍历选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// 第一个启动序号
    pub first: u32,
    /// 结束序号（不含）；等于 `first` 时输出全部块
    pub last: u32,
    /// 只输出时间线
    pub list: bool,
    /// 输出传感器快照
    pub sensors: bool,
    /// 展开寄存器位
    pub bits: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            first: 0,
            last: 1,
            list: false,
            sensors: false,
            bits: false,
        }
    }
}

impl DumpOptions {
    /// 从 `--boot`/`--count` 构造
    pub fn range(boot: u32, count: u32) -> Self {
        Self {
            first: boot,
            last: boot.saturating_add(count),
            ..Self::default()
        }
    }

    /// 从 `boot` 开始输出全部块
    pub fn all(boot: u32) -> Self {
        Self {
            first: boot,
            last: boot,
            ..Self::default()
        }
    }
}

/// 一块闪存上的事件日志
pub struct EventLog<S> {
    storage: S,
    profile: &'static BoardProfile,
}

impl<S: Storage> EventLog<S> {
    pub fn new(storage: S, board: Board) -> Self {
        Self {
            storage,
            profile: board.profile(),
        }
    }

    pub fn profile(&self) -> &'static BoardProfile {
        self.profile
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// 当前写指针
    pub fn pointer(&mut self) -> Result<u32> {
        Ok(current_pointer(&mut self.storage)?)
    }

    /// 读取块 `ptr`
    pub fn read(&mut self, ptr: u32) -> Result<EventRecord> {
        read_block(&mut self.storage, ptr)
    }

    /// 按选项输出记录
    ///
    /// 存储读取失败时立即返回，已经写入 `out` 的内容保留。
    pub fn dump<W: Write>(&mut self, out: &mut W, opts: &DumpOptions) -> Result<()> {
        if opts.first > block_count() {
            return Err(BelError::InvalidArgument {
                what: "boot",
                value: opts.first,
            });
        }
        if opts.last > block_count() {
            return Err(BelError::InvalidArgument {
                what: "boot + count",
                value: opts.last,
            });
        }

        let (mut index, count) = if opts.first == opts.last {
            (0, block_count())
        } else {
            (opts.first, opts.last)
        };

        let mut ptr = self.pointer()?;
        for _ in 0..opts.first {
            ptr = predecessor(ptr);
        }
        info!(
            "bel: {} dump from block {} boots {}..{}",
            self.profile.name, ptr, index, count
        );

        while index < count {
            let record = self.read(ptr)?;
            let mut report = Report::new();

            if opts.list {
                timespan(&mut report, &record, index);
            } else if record.is_empty() {
                report.line(&format!("Boot {}: Empty", index));
            } else {
                report.line(&format!("Boot {}", index));
                print_record(&mut report, &record, self.profile, opts.sensors, opts.bits);
            }
            debug!("bel: boot {} block {} -> {} bytes", index, ptr, report.as_str().len());
            out.write_str(report.as_str())?;

            ptr = predecessor(ptr);
            index += 1;
        }
        Ok(())
    }
}
