//! 位字段提取
//!
//! 所有寄存器解码统一走这里的 `bit`/`field`，位宽越界时返回 0 而不是 panic。

/// 提取单个位
pub fn bit(value: u32, offset: u32) -> bool {
    value.checked_shr(offset).unwrap_or(0) & 0x1 != 0
}

/// 提取位段 [first, last)
pub fn field(value: u32, first: u32, last: u32) -> u32 {
    let width = last.saturating_sub(first);
    if width == 0 {
        return 0;
    }
    let mask = u32::MAX.checked_shr(32 - width.min(32)).unwrap_or(0);
    value.checked_shr(first).unwrap_or(0) & mask
}

/// 布尔位的显示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolStyle {
    /// 原样显示 1/0
    Raw,
    /// 置位表示"未通过"：1 => No, 0 => Yes
    Pass,
    /// 置位表示故障：1 => Yes, 0 => No
    Fail,
}

impl BoolStyle {
    /// (置位, 清零) 时的显示文本
    pub fn labels(self) -> (&'static str, &'static str) {
        match self {
            BoolStyle::Raw => ("1", "0"),
            BoolStyle::Pass => ("No", "Yes"),
            BoolStyle::Fail => ("Yes", "No"),
        }
    }

    pub fn render(self, set: bool) -> &'static str {
        let (one, zero) = self.labels();
        if set {
            one
        } else {
            zero
        }
    }
}

/// 在码表中查找
pub fn enumerated_lookup(table: &[(u32, &'static str)], code: u32) -> Option<&'static str> {
    table.iter().find(|(v, _)| *v == code).map(|(_, s)| *s)
}

/// 渲染码值：`Success(0x2)` 或 `(reserved)0xc`
pub fn render_code(table: &[(u32, &'static str)], code: u32) -> String {
    match enumerated_lookup(table, code) {
        Some(s) => format!("{}(0x{:x})", s, code),
        None => format!("(reserved)0x{:x}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit() {
        assert!(bit(0b100, 2));
        assert!(!bit(0b100, 1));
        assert!(bit(0x8000_0000, 31));
        assert!(!bit(u32::MAX, 32));
        assert!(!bit(u32::MAX, 64));
    }

    #[test]
    fn test_field() {
        assert_eq!(field(0xABCD_1234, 0, 4), 0x4);
        assert_eq!(field(0xABCD_1234, 24, 28), 0xB);
        assert_eq!(field(0xABCD_1234, 28, 32), 0xA);
        assert_eq!(field(0xABCD_1234, 0, 32), 0xABCD_1234);
        assert_eq!(field(0xFF, 0, 24), 0xFF);
        assert_eq!(field(u32::MAX, 16, 30), 0x3FFF);
        assert_eq!(field(u32::MAX, 5, 5), 0);
    }

    #[test]
    fn test_bool_style() {
        assert_eq!(BoolStyle::Raw.render(true), "1");
        assert_eq!(BoolStyle::Pass.render(true), "No");
        assert_eq!(BoolStyle::Pass.render(false), "Yes");
        assert_eq!(BoolStyle::Fail.render(true), "Yes");
    }

    #[test]
    fn test_render_code() {
        let table = [(2, "Success"), (3, "Failed")];
        assert_eq!(render_code(&table, 2), "Success(0x2)");
        assert_eq!(render_code(&table, 0xc), "(reserved)0xc");
    }
}
