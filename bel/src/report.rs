//! 文本报告
//!
//! 每一行都是 `标签 : 值`，标签左对齐到固定列宽：
//! ```text
//!   <时间戳标签, 50>   : Thu Jan  1 00:00:15 1970
//!     <寄存器标签, 48> : 0x00000000
//!       <位字段标签, 46> : 1
//! ```

use std::fmt;

use crate::bits::{self, BoolStyle};
use crate::constants::{BIT_LABEL_WIDTH, READING_NOT_AVAILABLE, TIME_LABEL_WIDTH, VALUE_LABEL_WIDTH};
use crate::header::format_ctime;

const RESERVED_LABEL: &str = "Reserved";

/// 行缓冲，解码器只往这里追加文本
#[derive(Debug, Default, Clone)]
pub struct Report {
    buf: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// 原样追加一行
    pub fn line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn labeled(&mut self, indent: usize, width: usize, label: &str, value: fmt::Arguments<'_>) {
        self.buf.push_str(&format!(
            "{:indent$}{:<width$} : {}\n",
            "",
            label,
            value,
            indent = indent,
            width = width
        ));
    }

    /// 时间戳行
    pub fn timestamp(&mut self, label: &str, seconds: u64) {
        self.labeled(2, TIME_LABEL_WIDTH, label, format_args!("{}", format_ctime(seconds)));
    }

    /// 32 位寄存器原值
    pub fn value(&mut self, label: &str, value: u32) {
        self.labeled(4, VALUE_LABEL_WIDTH, label, format_args!("0x{:08x}", value));
    }

    pub fn bool_bit(&mut self, label: &str, value: u32, offset: u32, style: BoolStyle) {
        let set = bits::bit(value, offset);
        self.labeled(6, BIT_LABEL_WIDTH, label, format_args!("{}", style.render(set)));
    }

    pub fn bit(&mut self, label: &str, value: u32, offset: u32) {
        self.bool_bit(label, value, offset, BoolStyle::Raw);
    }

    pub fn pass(&mut self, label: &str, value: u32, offset: u32) {
        self.bool_bit(label, value, offset, BoolStyle::Pass);
    }

    pub fn fail(&mut self, label: &str, value: u32, offset: u32) {
        self.bool_bit(label, value, offset, BoolStyle::Fail);
    }

    /// 从 `first` 开始的连续位，每个位一个标签
    pub fn bit_run(&mut self, value: u32, first: u32, labels: &[&str], style: BoolStyle) {
        for (i, label) in (first..).zip(labels) {
            self.bool_bit(label, value, i, style);
        }
    }

    /// 位段 [first, last)，十六进制
    pub fn field(&mut self, label: &str, value: u32, first: u32, last: u32) {
        let v = bits::field(value, first, last);
        self.labeled(6, BIT_LABEL_WIDTH, label, format_args!("0x{:x}", v));
    }

    /// 位段查码表
    pub fn code(&mut self, label: &str, value: u32, first: u32, last: u32, table: &[(u32, &'static str)]) {
        let v = bits::field(value, first, last);
        let text = bits::render_code(table, v);
        self.labeled(6, BIT_LABEL_WIDTH, label, format_args!("{}", text));
    }

    /// 保留位段非零时给出诊断行
    pub fn reserved_field(&mut self, value: u32, first: u32, last: u32) {
        let v = bits::field(value, first, last);
        if v != 0 {
            self.labeled(
                6,
                BIT_LABEL_WIDTH,
                RESERVED_LABEL,
                format_args!(
                    "*** RESERVED FIELD [{}:{}] IS NOT ZERO: 0x{:X}",
                    last.saturating_sub(1),
                    first,
                    v
                ),
            );
        }
    }

    /// 保留位非零时给出诊断行
    pub fn reserved_bit(&mut self, value: u32, offset: u32) {
        if bits::bit(value, offset) {
            self.labeled(
                6,
                BIT_LABEL_WIDTH,
                RESERVED_LABEL,
                format_args!("*** RESERVED BIT [{}] IS NOT ZERO: 1", offset),
            );
        }
    }

    /// 传感器读数
    pub fn sensor(&mut self, label: &str, reading: u32, resolution: u32, unit: &str) {
        if reading == READING_NOT_AVAILABLE {
            self.labeled(4, VALUE_LABEL_WIDTH, label, format_args!("{:>9}", "N/A"));
        } else {
            let scaled = reading / resolution.max(1);
            self.labeled(4, VALUE_LABEL_WIDTH, label, format_args!("{:6} {}", scaled, unit));
        }
    }

    /// PMBus 数值
    pub fn measurement(&mut self, label: &str, value: u32, unit: &str) {
        self.labeled(4, VALUE_LABEL_WIDTH, label, format_args!("{:7} {}", value, unit));
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_line() {
        let mut r = Report::new();
        r.value("Status (0x80)", 0x2000_0000);
        assert_eq!(
            r.as_str(),
            format!("    {:<48} : 0x20000000\n", "Status (0x80)")
        );
    }

    #[test]
    fn test_bit_lines() {
        let mut r = Report::new();
        r.bit("Flow Done", 1 << 5, 5);
        r.pass("board_temp", 0b10, 1);
        r.fail("Board Power", 0, 3);
        let lines: Vec<&str> = r.as_str().lines().collect();
        assert_eq!(lines[0], format!("      {:<46} : 1", "Flow Done"));
        assert_eq!(lines[1], format!("      {:<46} : No", "board_temp"));
        assert_eq!(lines[2], format!("      {:<46} : No", "Board Power"));
    }

    #[test]
    fn test_bit_run_offsets() {
        let mut r = Report::new();
        r.bit_run(0b0100_0000, 5, &["a", "b", "c"], BoolStyle::Raw);
        let values: Vec<&str> = r
            .as_str()
            .lines()
            .map(|l| l.rsplit(" : ").next().unwrap())
            .collect();
        assert_eq!(values, ["0", "1", "0"]);
    }

    #[test]
    fn test_reserved_diagnostics() {
        let mut r = Report::new();
        r.reserved_field(0, 6, 12);
        r.reserved_bit(0, 15);
        assert!(r.is_empty());

        r.reserved_field(0xFF, 0, 24);
        r.reserved_bit(u32::MAX, 22);
        let lines: Vec<&str> = r.as_str().lines().collect();
        assert_eq!(
            lines[0],
            format!("      {:<46} : *** RESERVED FIELD [23:0] IS NOT ZERO: 0xFF", "Reserved")
        );
        assert_eq!(
            lines[1],
            format!("      {:<46} : *** RESERVED BIT [22] IS NOT ZERO: 1", "Reserved")
        );
    }

    #[test]
    fn test_sensor_lines() {
        let mut r = Report::new();
        r.sensor("Board Power", READING_NOT_AVAILABLE, 2, "mW");
        r.sensor("FPGA E-TILE Max Temperature", 91, 2, "°C");
        let lines: Vec<&str> = r.as_str().lines().collect();
        assert_eq!(lines[0], format!("    {:<48} :       N/A", "Board Power"));
        assert_eq!(
            lines[1],
            format!("    {:<48} :     45 °C", "FPGA E-TILE Max Temperature")
        );
    }
}
