//! 事件记录
//!
//! 一个块对应一次启动的全部子记录。子记录位于固定偏移，
//! 只有头部魔数与该槽位期望值一致时才视为存在。

use tracing::debug;

use crate::constants::*;
use crate::error::{BelError, Result};
use crate::header::{Header, TimeOffset};
use crate::ring::block_count;
use crate::storage::Storage;

const RECORD_WORDS: usize = RECORD_SIZE / 4;
const HEADER_WORDS: usize = HEADER_SIZE / 4;

/// 一个块的原始内容，已转换为主机字序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    words: Vec<u32>,
}

/// 读取块 `ptr`
pub fn read_block<S: Storage>(storage: &mut S, ptr: u32) -> Result<EventRecord> {
    if ptr >= block_count() {
        return Err(BelError::InvalidArgument {
            what: "block",
            value: ptr,
        });
    }

    let offset = ptr as u64 * BLOCK_SIZE;
    debug!("bel: read block {} at 0x{:x}", ptr, offset);
    let bytes = storage.read_bytes(offset, RECORD_SIZE)?;
    Ok(EventRecord::from_bytes(&bytes))
}

impl EventRecord {
    /// 按小端解析；第一个字保持原始字节序
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut words: Vec<u32> = bytes
            .chunks_exact(4)
            .take(RECORD_WORDS)
            .enumerate()
            .map(|(i, c)| {
                let raw = [c[0], c[1], c[2], c[3]];
                if i == 0 {
                    u32::from_ne_bytes(raw)
                } else {
                    u32::from_le_bytes(raw)
                }
            })
            .collect();
        words.resize(RECORD_WORDS, ERASED_WORD);
        Self { words }
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// 从未写入过的块
    pub fn is_empty(&self) -> bool {
        self.header_at(POWER_ON_STATUS_OFFSET).magic == ERASED_WORD
    }

    fn header_at(&self, offset: usize) -> Header {
        let start = offset / 4;
        Header::from_words(&self.words[start..start + HEADER_WORDS])
    }

    /// 槽位存在时返回 (头, 头之后的字)
    fn slot(&self, offset: usize, magic: u32) -> Option<(Header, &[u32])> {
        let header = self.header_at(offset);
        if header.magic != magic {
            return None;
        }
        let start = offset / 4 + HEADER_WORDS;
        Some((header, &self.words[start..]))
    }

    pub fn power_on(&self) -> Option<PowerOnStatus> {
        let (header, w) = self.slot(POWER_ON_STATUS_OFFSET, MAGIC_POWER_ON_STATUS)?;
        Some(PowerOnStatus {
            header,
            status: w[0],
            fpga_status: w[1],
            fpga_config_status: w[2],
            sequencer_status_1: w[3],
            sequencer_status_2: w[4],
            power_good_status: w[5],
        })
    }

    pub fn time_of_day(&self) -> Option<TimeOfDay> {
        let (header, w) = self.slot(TIMEOF_DAY_OFFSET, MAGIC_TIMEOF_DAY_STATUS)?;
        Some(TimeOfDay {
            header,
            offset: TimeOffset {
                low: w[0],
                high: w[1],
            },
        })
    }

    pub fn max10_seu(&self) -> Option<Max10Seu> {
        let (header, w) = self.slot(MAX10_SEU_OFFSET, MAGIC_MAX10_SEU_STATUS)?;
        Some(Max10Seu {
            header,
            max10_seu: w[0],
        })
    }

    pub fn fpga_seu(&self) -> Option<FpgaSeu> {
        let (header, w) = self.slot(FPGA_SEU_OFFSET, MAGIC_FPGA_SEU_STATUS)?;
        Some(FpgaSeu {
            header,
            fpga_seu: w[0],
        })
    }

    pub fn pci_error(&self) -> Option<PciErrorStatus> {
        let (header, w) = self.slot(PCI_ERROR_STATUS_OFFSET, MAGIC_PCI_ERROR_STATUS)?;
        Some(PciErrorStatus {
            header,
            link_status: w[0],
            uncorr_err: w[1],
        })
    }

    pub fn power_off(&self) -> Option<PowerOffStatus> {
        let (header, w) = self.slot(POWER_OFF_STATUS_OFFSET, MAGIC_POWER_OFF_STATUS)?;
        Some(PowerOffStatus {
            header,
            fpga_status: w[0],
            fpga_config_status: w[1],
            record_1: w[2],
            record_2: w[3],
            gpi_status: w[4],
            sensor_failed: w[5],
            sensor_alert: [w[6], w[7], w[8]],
        })
    }

    pub fn sensors_state(&self) -> Option<SensorsState> {
        let (header, w) = self.slot(SENSORS_STATE_OFFSET, MAGIC_SENSORS_STATE)?;
        let readings = w
            .chunks_exact(2)
            .take(SENSOR_STATE_COUNT)
            .map(|c| SensorReading {
                id: c[0],
                reading: c[1],
            })
            .collect();
        Some(SensorsState { header, readings })
    }

    /// PMBus 状态；`regulators` 为板卡实际装配的稳压器数，决定 ED8401 的位置
    pub fn sensors_status(&self, regulators: usize) -> Option<SensorsStatus> {
        let (header, w) = self.slot(SENSORS_STATUS_OFFSET, MAGIC_SENSORS_STATUS)?;
        let regulators = regulators.min(MAX_REGULATORS);
        let ext = &w[3..3 + regulators * EXT_STATUS_WORDS];
        let ext_status = ext
            .chunks_exact(EXT_STATUS_WORDS)
            .map(|c| ExtStatus {
                word: c[0],
                vout: c[1],
                iout: c[2],
                input: c[3],
                temp: c[4],
                cml: c[5],
            })
            .collect();
        Some(SensorsStatus {
            header,
            ina3221_mask_enable: [w[0], w[1], w[2]],
            ext_status,
            ed8401_status: w[3 + regulators * EXT_STATUS_WORDS],
        })
    }

    pub fn pci_error_v1(&self) -> Option<PciErrorV1> {
        let (header, w) = self.slot(PCI_V1_ERROR_STATUS_OFFSET, MAGIC_PCI_V1_ERROR_STATUS)?;
        Some(PciErrorV1 {
            header,
            link_status: w[0],
            uncorr_err: w[1],
            uncorr_err_mask: w[2],
            uncorr_err_severity: w[3],
            corr_err_status: w[4],
            corr_err_mask: w[5],
            cap_ctrl: w[6],
            header_log: [w[7], w[8], w[9], w[10]],
        })
    }
}

/// 上电状态 (寄存器 0x80/0xA0/0xA4/0x90/0x94/0x98)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerOnStatus {
    pub header: Header,
    pub status: u32,
    pub fpga_status: u32,
    pub fpga_config_status: u32,
    pub sequencer_status_1: u32,
    pub sequencer_status_2: u32,
    pub power_good_status: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub header: Header,
    pub offset: TimeOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Max10Seu {
    pub header: Header,
    pub max10_seu: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpgaSeu {
    pub header: Header,
    pub fpga_seu: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciErrorStatus {
    pub header: Header,
    pub link_status: u32,
    pub uncorr_err: u32,
}

/// 下电状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerOffStatus {
    pub header: Header,
    pub fpga_status: u32,
    pub fpga_config_status: u32,
    /// Power Good Record 1 (0x84)
    pub record_1: u32,
    /// Power Good Record 2 (0x88)
    pub record_2: u32,
    pub gpi_status: u32,
    pub sensor_failed: u32,
    pub sensor_alert: [u32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    pub id: u32,
    pub reading: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorsState {
    pub header: Header,
    pub readings: Vec<SensorReading>,
}

/// 单个 PMBus 稳压器的扩展状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtStatus {
    pub word: u32,
    pub vout: u32,
    pub iout: u32,
    pub input: u32,
    pub temp: u32,
    pub cml: u32,
}

impl ExtStatus {
    /// status word 与 CML 之间的四个数值，按存储顺序
    pub fn measurements(&self) -> [u32; 4] {
        [self.vout, self.iout, self.input, self.temp]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorsStatus {
    pub header: Header,
    pub ina3221_mask_enable: [u32; 3],
    pub ext_status: Vec<ExtStatus>,
    pub ed8401_status: u32,
}

/// C6100 的扩展 PCIe 错误记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciErrorV1 {
    pub header: Header,
    pub link_status: u32,
    pub uncorr_err: u32,
    pub uncorr_err_mask: u32,
    pub uncorr_err_severity: u32,
    pub corr_err_status: u32,
    pub corr_err_mask: u32,
    pub cap_ctrl: u32,
    pub header_log: [u32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(bytes: &mut [u8], offset: usize, words: &[u32]) {
        for (i, w) in words.iter().enumerate() {
            let at = offset + i * 4;
            bytes[at..at + 4].copy_from_slice(&w.to_le_bytes());
        }
    }

    #[test]
    fn test_short_buffer_padded_as_erased() {
        let record = EventRecord::from_bytes(&[0u8; 8]);
        assert_eq!(record.words().len(), RECORD_SIZE / 4);
        assert_eq!(record.words()[1], 0);
        assert_eq!(record.words()[2], ERASED_WORD);
    }

    #[test]
    fn test_sensors_status_layout_follows_regulator_count() {
        let mut bytes = vec![0u8; RECORD_SIZE];
        let mut words = vec![MAGIC_SENSORS_STATUS, 0, 0, 0xA, 0xB, 0xC];
        for r in 0..3u32 {
            words.extend((0..6).map(|k| r * 16 + k));
        }
        words.push(0xED);
        put(&mut bytes, SENSORS_STATUS_OFFSET, &words);
        let record = EventRecord::from_bytes(&bytes);

        let three = record.sensors_status(3).unwrap();
        assert_eq!(three.ina3221_mask_enable, [0xA, 0xB, 0xC]);
        assert_eq!(three.ext_status.len(), 3);
        assert_eq!(three.ext_status[1].word, 16);
        assert_eq!(three.ext_status[1].measurements(), [17, 18, 19, 20]);
        assert_eq!(three.ext_status[2].cml, 37);
        assert_eq!(three.ed8401_status, 0xED);

        // 两个稳压器时 ED8401 紧跟第二个块
        let two = record.sensors_status(2).unwrap();
        assert_eq!(two.ext_status.len(), 2);
        assert_eq!(two.ed8401_status, 32);
    }

    #[test]
    fn test_power_off_fields() {
        let mut bytes = vec![0u8; RECORD_SIZE];
        put(
            &mut bytes,
            POWER_OFF_STATUS_OFFSET,
            &[MAGIC_POWER_OFF_STATUS, 1000, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        );
        let record = EventRecord::from_bytes(&bytes);
        let off = record.power_off().unwrap();
        assert_eq!(off.header.timestamp_low, 1000);
        assert_eq!(off.fpga_status, 1);
        assert_eq!(off.sensor_failed, 6);
        assert_eq!(off.sensor_alert, [7, 8, 9]);
        assert!(record.power_on().is_none());
        assert!(!record.is_empty());
    }
}
