//! 板卡配置
//!
//! 不同板卡共享记录格式，但传感器目录、PMBus 稳压器以及上下电寄存器的位定义各不相同。

use clap::ValueEnum;

use crate::record::{PowerOffStatus, PowerOnStatus};
use crate::report::Report;

pub mod c6100;
pub mod n6000;

/// 传感器目录条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorInfo {
    pub id: u32,
    pub label: &'static str,
    pub unit: &'static str,
    pub resolution: u32,
}

pub(crate) const fn sensor(
    id: u32,
    label: &'static str,
    unit: &'static str,
    resolution: u32,
) -> SensorInfo {
    SensorInfo {
        id,
        label,
        unit,
        resolution,
    }
}

/// PMBus 稳压器；`info_index` 指向 `regulator_info` 中连续四个数值标签的起点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regulator {
    pub label: &'static str,
    pub info_index: usize,
}

/// 上电寄存器 0x90/0x94/0x98 的解码
pub type SequencerDecoder = fn(&mut Report, &PowerOnStatus, bool);
/// 下电寄存器 0x84/0x88 的解码
pub type PowerGoodDecoder = fn(&mut Report, &PowerOffStatus, bool);
/// Sensor Failed (0x410) 的位解码
pub type SensorFailedDecoder = fn(&mut Report, u32);

/// 上电记录中随板卡变化的标签
#[derive(Debug, Clone, Copy)]
pub struct PowerOnLabels {
    /// 0x80 [27:24] 与 [31:28]
    pub codes: [&'static str; 2],
    pub fpga_status: &'static str,
    pub fpga_config_status: &'static str,
}

/// 一种板卡的全部静态描述
pub struct BoardProfile {
    pub name: &'static str,
    pub sensors: &'static [SensorInfo],
    pub regulator_info: &'static [SensorInfo],
    pub regulators: &'static [Regulator],
    pub ina3221_labels: [&'static str; 3],
    pub power_on_labels: PowerOnLabels,
    pub sequencer: SequencerDecoder,
    pub power_good: PowerGoodDecoder,
    pub sensor_failed: SensorFailedDecoder,
    /// Sensor Alert 1..3 展开时使用的目录起始下标
    pub alert_offsets: [usize; 3],
    /// 是否记录扩展 PCIe 错误
    pub pci_v1: bool,
}

impl std::fmt::Debug for BoardProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardProfile")
            .field("name", &self.name)
            .field("sensors", &self.sensors.len())
            .field("regulators", &self.regulators.len())
            .field("pci_v1", &self.pci_v1)
            .finish()
    }
}

/// 支持的板卡
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Board {
    #[default]
    N6000,
    C6100,
}

impl Board {
    pub fn profile(self) -> &'static BoardProfile {
        match self {
            Board::N6000 => &n6000::PROFILE,
            Board::C6100 => &c6100::PROFILE,
        }
    }
}

/// 0x80 中的上电结果码
pub const POWER_ON_CODES: &[(u32, &str)] = &[
    (0x0, "Default(not attempted)"),
    (0x1, "Under progress"),
    (0x2, "Success"),
    (0x3, "Failed"),
    (0x9, "Repower cycle under progress"),
    (0xa, "Repower cycle success"),
    (0xb, "Repower cycle failed"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_consistent() {
        for board in [Board::N6000, Board::C6100] {
            let profile = board.profile();
            assert!(!profile.sensors.iter().any(|s| s.id == 0 || s.resolution == 0));
            for reg in profile.regulators {
                assert!(reg.info_index + 4 <= profile.regulator_info.len());
            }
            for offset in profile.alert_offsets {
                assert!(offset < profile.sensors.len());
            }
        }
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(Board::N6000.profile().sensors.len(), 83);
        assert_eq!(Board::N6000.profile().regulators.len(), 3);
        assert_eq!(Board::C6100.profile().sensors.len(), 44);
        assert_eq!(Board::C6100.profile().regulators.len(), 2);
        assert!(Board::C6100.profile().pci_v1);
        assert!(!Board::N6000.profile().pci_v1);
        assert_eq!(Board::default(), Board::N6000);
    }
}
