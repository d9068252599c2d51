//! 启动时间线
//!
//! 每个块一行：上电时间 - 下电时间。

use crate::header::{format_ctime, reconcile_timestamp};
use crate::record::EventRecord;
use crate::report::Report;

const NOT_AVAILABLE: &str = "N/A";

/// 输出第 `boot_index` 次启动的时间范围，0 表示当前启动并带表头
///
/// 没有 TimeOfDay 时无法得到上电时间，不输出任何内容。
pub fn timespan(report: &mut Report, record: &EventRecord, boot_index: u32) {
    let Some(tod) = record.time_of_day() else {
        return;
    };

    let on = format_ctime(reconcile_timestamp(&tod.header, Some(&tod.offset)));
    let off = match record.power_off() {
        Some(status) => format_ctime(status.header.seconds()),
        None => NOT_AVAILABLE.to_string(),
    };

    if boot_index == 0 {
        report.line(&format!(
            "{:<15} : {:<25} : {:<25}",
            "Boot Index", "Power-ON Timestamp", "Power-OFF Timestamp"
        ));
        report.line(&"-".repeat(73));
        report.line(&format!("{:<15} - {:<20}  - {:<20}", "Current Boot", on, off));
    } else {
        report.line(&format!("Boot {:<10} - {:<20}  - {:<20}", boot_index, on, off));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    fn put(bytes: &mut [u8], offset: usize, words: &[u32]) {
        for (i, w) in words.iter().enumerate() {
            let at = offset + i * 4;
            bytes[at..at + 4].copy_from_slice(&w.to_le_bytes());
        }
    }

    #[test]
    fn test_no_time_of_day_no_output() {
        let mut bytes = vec![0xFFu8; RECORD_SIZE];
        put(&mut bytes, POWER_OFF_STATUS_OFFSET, &[MAGIC_POWER_OFF_STATUS, 0, 0]);
        let rec = EventRecord::from_bytes(&bytes);
        let mut r = Report::new();
        timespan(&mut r, &rec, 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_current_boot_header() {
        let mut bytes = vec![0xFFu8; RECORD_SIZE];
        put(&mut bytes, TIMEOF_DAY_OFFSET, &[MAGIC_TIMEOF_DAY_STATUS, 5000, 0, 10000, 0]);
        let rec = EventRecord::from_bytes(&bytes);
        let mut r = Report::new();
        timespan(&mut r, &rec, 0);
        let lines: Vec<&str> = r.as_str().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Boot Index      : Power-ON Timestamp"));
        assert_eq!(lines[1].len(), 73);
        assert_eq!(
            lines[2],
            "Current Boot    - Thu Jan  1 00:00:15 1970  - N/A                 "
        );
    }

    #[test]
    fn test_boot_row_with_power_off() {
        let mut bytes = vec![0xFFu8; RECORD_SIZE];
        put(&mut bytes, TIMEOF_DAY_OFFSET, &[MAGIC_TIMEOF_DAY_STATUS, 1000, 0, 0, 0]);
        put(&mut bytes, POWER_OFF_STATUS_OFFSET, &[MAGIC_POWER_OFF_STATUS, 61_000, 0]);
        let rec = EventRecord::from_bytes(&bytes);
        let mut r = Report::new();
        timespan(&mut r, &rec, 7);
        assert_eq!(
            r.as_str(),
            "Boot 7          - Thu Jan  1 00:00:01 1970  - Thu Jan  1 00:01:01 1970\n"
        );
    }
}
