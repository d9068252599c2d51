//! 子记录头与时间戳
//!
//! 所有时间戳均为 64 位毫秒，拆成高低两个 32 位字存储。
//! 上电记录写入时 BMC 还没有拿到软件下发的日历时间，
//! 因此高 32 位为 0 的时间戳需要叠加 TimeOfDay 中的偏移量。

use chrono::DateTime;

/// 子记录头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub magic: u32,
    pub timestamp_low: u32,
    pub timestamp_high: u32,
}

impl Header {
    /// 从字序列解析（words[0..3]）
    pub fn from_words(words: &[u32]) -> Self {
        Self {
            magic: words[0],
            timestamp_low: words[1],
            timestamp_high: words[2],
        }
    }

    /// 毫秒时间戳
    pub fn millis(&self) -> u64 {
        ((self.timestamp_high as u64) << 32) | self.timestamp_low as u64
    }

    /// 不做偏移修正的秒数
    pub fn seconds(&self) -> u64 {
        self.millis() / 1000
    }
}

/// TimeOfDay 偏移量（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOffset {
    pub low: u32,
    pub high: u32,
}

impl TimeOffset {
    pub fn millis(&self) -> u64 {
        ((self.high as u64) << 32) + self.low as u64
    }
}

/// 计算修正后的秒数
///
/// 高 32 位为 0 时叠加偏移；毫秒到秒直接截断，不做四舍五入。
pub fn reconcile_timestamp(header: &Header, offset: Option<&TimeOffset>) -> u64 {
    let mut ms = header.millis();
    if header.timestamp_high == 0 {
        if let Some(offset) = offset {
            ms = ms.wrapping_add(offset.millis());
        }
    }
    ms / 1000
}

/// ctime 风格的 24 字符时间串 (UTC)，例如 `Thu Jan  1 00:00:15 1970`
pub fn format_ctime(seconds: u64) -> String {
    match i64::try_from(seconds)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
    {
        Some(dt) => dt.format("%a %b %e %H:%M:%S %Y").to_string(),
        None => format!("(invalid time {})", seconds),
    }
}
