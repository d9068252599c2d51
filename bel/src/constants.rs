//! 常量定义
//!
//! BEL 闪存环形日志的几何参数、子记录魔数以及块内偏移

/// 单个块大小
pub const BLOCK_SIZE: u64 = 0x1000;
/// 环形缓冲区块数
pub const BLOCK_COUNT: u32 = 63;
/// 指针单元偏移（紧跟最后一个块）
pub const PTR_OFFSET: u64 = BLOCK_COUNT as u64 * BLOCK_SIZE;
/// 指针单元大小
pub const PTR_SIZE: usize = 4;
/// 未写入的闪存内容
pub const ERASED_WORD: u32 = u32::MAX;

/// 子记录头大小: magic(4) + timestamp_low(4) + timestamp_high(4)
pub const HEADER_SIZE: usize = 12;

/// 子记录魔数
pub const MAGIC_POWER_ON_STATUS: u32 = 0x53696C12;
pub const MAGIC_TIMEOF_DAY_STATUS: u32 = 0x53696CF0;
pub const MAGIC_MAX10_SEU_STATUS: u32 = 0x53696CBC;
pub const MAGIC_FPGA_SEU_STATUS: u32 = 0x53696CDE;
pub const MAGIC_POWER_OFF_STATUS: u32 = 0x53696C34;
pub const MAGIC_SENSORS_STATE: u32 = 0x53696C56;
pub const MAGIC_SENSORS_STATUS: u32 = 0x53696C78;
pub const MAGIC_PCI_ERROR_STATUS: u32 = 0x53696C9A;
pub const MAGIC_PCI_V1_ERROR_STATUS: u32 = 0x53696D12;

/// 块内子记录布局（字节偏移）:
/// ```text
///   0x000  PowerOnStatus    header + 6 words
///   0x040  TimeOfDay        header + offset_low/high
///   0x080  Max10Seu         header + 1 word
///   0x0C0  FpgaSeu          header + 1 word
///   0x100  PciErrorStatus   header + 2 words
///   0x140  PowerOffStatus   header + 9 words
///   0x180  SensorsStatus    header + 3 INA3221 + N * 6 ext words + ED8401
///   0x200  PciErrorV1       header + 11 words
///   0x400  SensorsState     header + 128 * {id, reading}
/// ```
pub const POWER_ON_STATUS_OFFSET: usize = 0x000;
pub const TIMEOF_DAY_OFFSET: usize = 0x040;
pub const MAX10_SEU_OFFSET: usize = 0x080;
pub const FPGA_SEU_OFFSET: usize = 0x0C0;
pub const PCI_ERROR_STATUS_OFFSET: usize = 0x100;
pub const POWER_OFF_STATUS_OFFSET: usize = 0x140;
pub const SENSORS_STATUS_OFFSET: usize = 0x180;
pub const PCI_V1_ERROR_STATUS_OFFSET: usize = 0x200;
pub const SENSORS_STATE_OFFSET: usize = 0x400;

/// SensorsState 中的传感器槽位数
pub const SENSOR_STATE_COUNT: usize = 128;
/// SensorsStatus 中最多容纳的 PMBus 稳压器数
pub const MAX_REGULATORS: usize = 3;
/// 每个稳压器扩展状态的字数 {word, vout, iout, input, temp, cml}
pub const EXT_STATUS_WORDS: usize = 6;

/// 一条事件记录的字节数（一次读取的长度）
pub const RECORD_SIZE: usize = 0x810;

/// 传感器读数"不可用"标记 (INT_MAX)
pub const READING_NOT_AVAILABLE: u32 = i32::MAX as u32;

/// 标签列宽: 位字段 / 寄存器值 / 时间戳
pub const BIT_LABEL_WIDTH: usize = 46;
pub const VALUE_LABEL_WIDTH: usize = 48;
pub const TIME_LABEL_WIDTH: usize = 50;
