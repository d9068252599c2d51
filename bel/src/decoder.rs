//! 记录解码
//!
//! 每个子记录一个解码函数，子记录缺失时什么都不输出。
//! `print_bits` 控制是否展开寄存器的逐位含义，0xA0/0xA4 等始终展开。

use crate::bits::BoolStyle;
use crate::board::{BoardProfile, SensorInfo, POWER_ON_CODES};
use crate::header::reconcile_timestamp;
use crate::record::{
    EventRecord, ExtStatus, FpgaSeu, Max10Seu, PciErrorStatus, PciErrorV1, PowerOffStatus,
    PowerOnStatus, SensorsState, SensorsStatus, TimeOfDay,
};
use crate::report::Report;

const LINK_STATUS_BITS: [(&str, u32); 5] = [
    ("Link Training ", 11),
    ("Slot Clock Configuration", 12),
    ("Data link layer link active", 13),
    ("Link Bandwidth Management Status", 14),
    ("Link Autonomous Management Status", 15),
];

const UNCORR_ERR_BITS: [(&str, u32); 17] = [
    ("Data Link Protocol error Status", 4),
    ("Surprise down error Status", 5),
    ("Poisoned TLP received", 12),
    ("Flow Control Protocol Errors Status", 13),
    ("Completion Timeout Status", 14),
    ("Completer Abort error Status", 15),
    ("Unexpected Completion Status", 16),
    ("Receiver Overflow Status", 17),
    ("Malformed TLP Status", 18),
    ("ECRC Error Status", 19),
    ("Unsupported Request Error Status", 20),
    ("ACS Violation Status", 21),
    ("Uncorrectable Internal Error Status", 22),
    ("MC Blocked TLP Status", 23),
    ("AtomicOp Egress Blocked Status", 24),
    ("TLP Prefix Blocked Status", 25),
    ("Poisoned TLP Egress Blocked Status", 26),
];

const UNCORR_MASK_BITS: [(&str, u32); 17] = [
    ("Data Link Protocol error", 4),
    ("Surprise down error", 5),
    ("Poisoned TLP received", 12),
    ("Flow Control Protocol Errors", 13),
    ("Completion Timeout", 14),
    ("Completer Abort error", 15),
    ("Unexpected Completion", 16),
    ("Receiver Overflow", 17),
    ("Malformed TLP", 18),
    ("ECRC Error", 19),
    ("Unsupported Request Error", 20),
    ("ACS Violation", 21),
    ("Uncorrectable Internal Error", 22),
    ("MC Blocked TLP", 23),
    ("AtomicOp Egress Blocked", 24),
    ("TLP Prefix Blocked", 25),
    ("Poisoned TLP Egress Blocked", 26),
];

const UNCORR_SEVERITY_BITS: [(&str, u32); 11] = [
    ("Data Link Protocol error", 4),
    ("Surprise Down Error", 5),
    ("Poisoned TLP", 12),
    ("Flow Control protocol error", 13),
    ("Completion Timeout", 14),
    ("Completer Abort (CA) was transmitted", 15),
    ("Unexpected Completion was received", 16),
    ("Receiver Overflow", 17),
    ("Malformed TLP Received", 18),
    ("ECRC Error Detected", 19),
    ("Unsupported Request Received", 20),
];

const CORR_STATUS_BITS: [(&str, u32); 7] = [
    ("Receiver Error status", 0),
    ("Bad TLP status", 6),
    ("Bad DLLP status", 7),
    ("Replay Number Rollover status", 8),
    ("Replay timer Timeout status", 12),
    ("Advisory Non-Fatal Error status", 13),
    ("Corrected internal error status", 14),
];

const CORR_MASK_BITS: [(&str, u32); 7] = [
    ("Receiver Error", 0),
    ("Bad TLP", 6),
    ("Bad DLLP", 7),
    ("Replay Number Rollover", 8),
    ("Replay timer Timeout", 12),
    ("Advisory Non-Fatal Error", 13),
    ("Corrected internal error", 14),
];

const GPI_LOW: [&str; 14] = [
    "Board revision strap LSB, hard strap",
    "Board revision strap",
    "Power class 0 strap",
    "Power class 1 strap",
    "SM bus I2C address bit setting, hard strap",
    "CVL present indication, hard strap",
    "Alert indication from PM bus VRs",
    "FM61 SDM VID alertn output",
    "Output from ED8401",
    "Warning alert output from TMP464",
    "Output from INA3221",
    "Loss of input reference to SI53254",
    "Loss of lLock indication from Zarlink",
    "Loss of Lock Indication from Si5392",
];

const GPI_HIGH: [&str; 4] = [
    "Interrupt from IO Expander",
    "Output from INA3221",
    "QSFP-A module presence",
    "QSFP-B module presence",
];

/// PMBus STATUS_WORD
const STATUS_WORD_BITS: [&str; 16] = [
    "None/Unkown",
    "CML",
    "Temperature",
    "Vin Undervoltage",
    "Iout Overcurrent",
    "Vout Overvoltage",
    "Off",
    "Busy",
    "None/Unknown",
    "Other",
    "Fans",
    "Power Good",
    "Manufacturer Specific Fault",
    "Input",
    "Iout/Pout",
    "Vout",
];

/// PMBus STATUS_CML
const STATUS_CML_BITS: [(&str, u32); 7] = [
    ("Other Fault", 0),
    ("Communication Fault", 1),
    ("Processor Fault", 3),
    ("Memory Fault", 4),
    ("Packet Error Check Fault", 5),
    ("Invalid/Unsupported Data", 6),
    ("Invalid/Unsupported Command", 7),
];

fn bit_table(report: &mut Report, value: u32, table: &[(&str, u32)]) {
    for (label, offset) in table {
        report.bit(label, value, *offset);
    }
}

/// 寄存器 0xA0
fn fpga_status(report: &mut Report, label: &str, value: u32) {
    report.value(label, value);
    report.field("FPGA Page", value, 0, 3);
    report.bit("FPGA Configured Page", value, 3);
    report.bit("FPGA Config Timeline", value, 4);
    report.bit("Flow Done", value, 5);
    report.reserved_field(value, 6, 12);
    report.field("FSM State", value, 12, 16);
    report.field("Duration", value, 16, 30);
    report.reserved_field(value, 30, 32);
}

/// 寄存器 0xA4
fn fpga_config_status(report: &mut Report, label: &str, value: u32) {
    report.value(label, value);
    report.field("Config Status", value, 0, 4);
    report.bit("Config FW Seq Fail", value, 4);
    report.field("nStatus Stuck Low Restarts", value, 5, 8);
    report.field("Image Fail Recycle Count", value, 8, 10);
    report.field("1st Power On Page number", value, 10, 13);
    report.field("2nd Power On Page number", value, 13, 16);
    report.field("3nd Power On Page number", value, 16, 19);
    report.reserved_field(value, 19, 32);
}

/// 上电状态
///
/// 上电记录在软件下发日历时间之前写入，自身时间戳没有意义，
/// 有 TimeOfDay 时用其修正后的时间，否则退回记录头。
pub fn power_on(
    report: &mut Report,
    status: &PowerOnStatus,
    time_of_day: Option<&TimeOfDay>,
    profile: &BoardProfile,
    print_bits: bool,
) {
    let seconds = match time_of_day {
        Some(tod) => reconcile_timestamp(&tod.header, Some(&tod.offset)),
        None => status.header.seconds(),
    };
    report.timestamp("Power On Status Time", seconds);

    let labels = &profile.power_on_labels;
    report.value("Status (0x80)", status.status);
    report.reserved_field(status.status, 0, 24);
    // 对常量的检查，两行诊断总会出现
    report.reserved_field(0xFF, 0, 24);
    report.reserved_bit(!0, 22);
    report.code(labels.codes[0], status.status, 24, 28, POWER_ON_CODES);
    report.code(labels.codes[1], status.status, 28, 32, POWER_ON_CODES);

    fpga_status(report, labels.fpga_status, status.fpga_status);
    fpga_config_status(report, labels.fpga_config_status, status.fpga_config_status);

    (profile.sequencer)(report, status, print_bits);
}

pub fn time_of_day(report: &mut Report, tod: &TimeOfDay) {
    report.timestamp("Time of day", tod.header.seconds());
    report.timestamp(
        "Time of day offset",
        reconcile_timestamp(&tod.header, Some(&tod.offset)),
    );
    report.value("TimeOfDay offset low", tod.offset.low);
    report.value("TimeOfDay offset high", tod.offset.high);
}

pub fn max10_seu(report: &mut Report, seu: &Max10Seu) {
    report.timestamp("Max10 SEU Time", seu.header.seconds());
    report.bit("MAX10 SEU error status", seu.max10_seu, 0);
}

pub fn fpga_seu(report: &mut Report, seu: &FpgaSeu) {
    report.timestamp("FPGA SEU Time", seu.header.seconds());
    report.bit("FPGA SEU error status", seu.fpga_seu, 1);
}

fn pcie_link_and_uncorr(report: &mut Report, link: u32, uncorr: u32, print_bits: bool) {
    report.value("PCIe Link Status", link);
    if print_bits {
        report.field("Current Link Speed", link, 0, 3);
        report.field("Negotiated Link Speed", link, 4, 9);
        bit_table(report, link, &LINK_STATUS_BITS);
    }

    report.value("PCIe Uncorrectable Error", uncorr);
    if print_bits {
        bit_table(report, uncorr, &UNCORR_ERR_BITS);
    }
}

pub fn pci_error(report: &mut Report, pci: &PciErrorStatus, print_bits: bool) {
    report.timestamp("PCI Error Status Time", pci.header.seconds());
    pcie_link_and_uncorr(report, pci.link_status, pci.uncorr_err, print_bits);
}

/// 扩展 PCIe 错误
///
/// 两个 mask 寄存器的逐位展开读取对应的 status 寄存器，
/// Header Log 四行都显示 DW1。
pub fn pci_error_v1(report: &mut Report, pci: &PciErrorV1, print_bits: bool) {
    report.timestamp("PCI Error Status Time", pci.header.seconds());
    pcie_link_and_uncorr(report, pci.link_status, pci.uncorr_err, print_bits);

    report.value("PCIe Uncorrectable Err Mask", pci.uncorr_err_mask);
    if print_bits {
        bit_table(report, pci.uncorr_err, &UNCORR_MASK_BITS);
    }

    report.value("PCIe Uncorrectable Err Severity", pci.uncorr_err_severity);
    if print_bits {
        bit_table(report, pci.uncorr_err_severity, &UNCORR_SEVERITY_BITS);
    }

    report.value("PCIe Correctable Err Status", pci.corr_err_status);
    if print_bits {
        bit_table(report, pci.corr_err_status, &CORR_STATUS_BITS);
    }

    report.value("PCIe Correctable Err Mask", pci.corr_err_mask);
    if print_bits {
        bit_table(report, pci.corr_err_status, &CORR_MASK_BITS);
    }

    report.value("PCIe Cap And Ctrl", pci.cap_ctrl);

    let dw1 = pci.header_log[0];
    for label in [
        "PCIE Header Log DW1",
        "PCIE Header Log DW2",
        "PCIE Header Log DW3",
        "PCIE Header Log DW4",
    ] {
        report.value(label, dw1);
    }
}

/// 告警寄存器逐位对应传感器目录中从 `offset` 开始的条目
fn sensor_alert(report: &mut Report, sensors: &[SensorInfo], value: u32, offset: usize) {
    for (i, info) in (0u32..).zip(sensors.iter().skip(offset).take(32)) {
        report.fail(info.label, value, i);
    }
}

pub fn power_off(report: &mut Report, status: &PowerOffStatus, profile: &BoardProfile, print_bits: bool) {
    report.timestamp("Power Off Status Time", status.header.seconds());

    fpga_status(report, "FPGA_Status (0xA0)", status.fpga_status);
    fpga_config_status(report, "FPGA_Config Status (0xA4)", status.fpga_config_status);

    (profile.power_good)(report, status, print_bits);

    let gpi = status.gpi_status;
    report.value("GPI Status (0x50)", gpi);
    if print_bits {
        report.bit_run(gpi, 0, &GPI_LOW, BoolStyle::Raw);
        report.reserved_bit(gpi, 14);
        report.bit_run(gpi, 15, &GPI_HIGH, BoolStyle::Raw);
        report.reserved_field(gpi, 19, 32);
    }

    report.value("Sensor Failed (0x410)", status.sensor_failed);
    if print_bits {
        (profile.sensor_failed)(report, status.sensor_failed);
    }

    // 三个告警寄存器的展开都读取 Alert 1，只是目录起点不同
    let labels = [
        "Sensor Alert 1 (0x414)",
        "Sensor Alert 2 (0x418)",
        "Sensor Alert 3 (0x41C)",
    ];
    for ((label, value), offset) in labels
        .iter()
        .zip(status.sensor_alert)
        .zip(profile.alert_offsets)
    {
        report.value(label, value);
        if print_bits {
            sensor_alert(report, profile.sensors, status.sensor_alert[0], offset);
        }
    }
}

/// 在目录中查找 `id`，从上次命中位置的下一项开始环形查找，回到起点即停止
///
/// 读数数组按目录顺序排列，因此大多数情况下第一项就命中。
/// 未找到返回 `None`，调用方保持上次命中位置不变。
pub fn find_sensor(catalog: &[SensorInfo], last: Option<usize>, id: u32) -> Option<usize> {
    let len = catalog.len();
    if len == 0 {
        return None;
    }

    let (start, span) = match last {
        Some(last) => (last + 1, len - 1),
        None => (0, len),
    };
    (0..span)
        .map(|k| (start + k) % len)
        .find(|&idx| catalog[idx].id == id)
        .filter(|&idx| catalog[idx].id != 0)
}

pub fn sensors_state(report: &mut Report, state: &SensorsState, catalog: &[SensorInfo]) {
    report.timestamp("Sensor State Time", state.header.seconds());

    let mut last = None;
    for reading in &state.readings {
        if let Some(idx) = find_sensor(catalog, last, reading.id) {
            let info = &catalog[idx];
            report.sensor(info.label, reading.reading, info.resolution, info.unit);
            last = Some(idx);
        }
    }
}

fn ext_status(report: &mut Report, label: &str, ext: &ExtStatus, info: &[SensorInfo]) {
    report.value(&format!("{} Status Word", label), ext.word);
    report.bit_run(ext.word, 0, &STATUS_WORD_BITS, BoolStyle::Raw);

    for (info, value) in info.iter().zip(ext.measurements()) {
        report.measurement(info.label, value, info.unit);
    }

    report.value(&format!("{} Status CML", label), ext.cml);
    bit_table(report, ext.cml, &STATUS_CML_BITS);
}

pub fn sensors_status(report: &mut Report, status: &SensorsStatus, profile: &BoardProfile) {
    report.timestamp("Sensor Status Time", status.header.seconds());

    for (label, value) in profile.ina3221_labels.iter().zip(status.ina3221_mask_enable) {
        report.value(label, value);
    }
    for (reg, ext) in profile.regulators.iter().zip(&status.ext_status) {
        let info = profile
            .regulator_info
            .get(reg.info_index..)
            .unwrap_or_default();
        ext_status(report, reg.label, ext, info);
    }
    report.value("ED8401 Status", status.ed8401_status);
}

/// 按固定顺序输出一条记录中所有存在的子记录
pub fn print_record(
    report: &mut Report,
    record: &EventRecord,
    profile: &BoardProfile,
    print_sensors: bool,
    print_bits: bool,
) {
    let tod = record.time_of_day();

    if let Some(status) = record.power_on() {
        power_on(report, &status, tod.as_ref(), profile, print_bits);
    }
    if let Some(tod) = &tod {
        time_of_day(report, tod);
    }
    if let Some(seu) = record.max10_seu() {
        max10_seu(report, &seu);
    }
    if let Some(seu) = record.fpga_seu() {
        fpga_seu(report, &seu);
    }
    if let Some(pci) = record.pci_error() {
        pci_error(report, &pci, print_bits);
    }
    if let Some(status) = record.power_off() {
        power_off(report, &status, profile, print_bits);
    }
    if print_sensors {
        if let Some(state) = record.sensors_state() {
            sensors_state(report, &state, profile.sensors);
        }
        if let Some(status) = record.sensors_status(profile.regulators.len()) {
            sensors_status(report, &status, profile);
        }
    }
    if profile.pci_v1 {
        if let Some(pci) = record.pci_error_v1() {
            pci_error_v1(report, &pci, print_bits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::header::Header;
    use crate::record::SensorReading;

    fn catalog() -> Vec<SensorInfo> {
        Board::N6000.profile().sensors.to_vec()
    }

    #[test]
    fn test_find_sensor_sequential() {
        let catalog = catalog();
        assert_eq!(find_sensor(&catalog, None, 1), Some(0));
        assert_eq!(find_sensor(&catalog, Some(0), 2), Some(1));
        // 跳过的条目也能找到
        assert_eq!(find_sensor(&catalog, Some(1), 60), Some(16));
        // 回绕
        assert_eq!(find_sensor(&catalog, Some(20), 1), Some(0));
    }

    #[test]
    fn test_find_sensor_unknown_terminates() {
        let catalog = catalog();
        assert_eq!(find_sensor(&catalog, None, 9999), None);
        assert_eq!(find_sensor(&catalog, Some(5), 9999), None);
        assert_eq!(find_sensor(&[], None, 1), None);
    }

    #[test]
    fn test_find_sensor_same_id_twice_not_matched() {
        let catalog = catalog();
        assert_eq!(find_sensor(&catalog, Some(0), 1), None);
    }

    #[test]
    fn test_sensors_state_unknown_keeps_position() {
        let state = SensorsState {
            header: Header::default(),
            readings: vec![
                SensorReading { id: 1, reading: 100 },
                SensorReading { id: 4242, reading: 7 },
                SensorReading { id: 2, reading: i32::MAX as u32 },
            ],
        };
        let mut r = Report::new();
        sensors_state(&mut r, &state, &catalog());
        let lines: Vec<&str> = r.as_str().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            format!("    {:<48} :     50 °C", "FPGA E-TILE Max Temperature")
        );
        assert_eq!(
            lines[2],
            format!("    {:<48} :       N/A", "FPGA E-TILE Temperature#1")
        );
    }

    #[test]
    fn test_sensor_alert_offsets_clamped() {
        let profile = Board::C6100.profile();
        let mut r = Report::new();
        sensor_alert(&mut r, profile.sensors, 1, 40);
        // C6100 目录只有 44 项
        assert_eq!(r.as_str().lines().count(), 4);
        assert!(r
            .as_str()
            .starts_with(&format!("      {:<46} : Yes", "Virt FPGA Temperature")));

        let mut r = Report::new();
        sensor_alert(&mut r, profile.sensors, 0, 100);
        assert!(r.is_empty());
    }

    #[test]
    fn test_ext_status_labels() {
        let profile = Board::N6000.profile();
        let ext = ExtStatus {
            word: 0,
            vout: 900,
            iout: 12,
            input: 45,
            temp: 12000,
            cml: 0,
        };
        let mut r = Report::new();
        ext_status(&mut r, "IR38063", &ext, &profile.regulator_info[4..]);
        let text = r.as_str();
        assert!(text.contains(&format!("    {:<48} :     900 mV\n", "IR38063 Voltage")));
        assert!(text.contains(&format!("    {:<48} :      45 °C\n", "IR38063 Temperature")));
        assert!(text.contains(&format!("    {:<48} :   12000 mV\n", "IR38063 Input")));
        assert_eq!(text.lines().count(), 1 + 16 + 4 + 1 + 7);
    }
}
