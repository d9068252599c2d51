//! N6000 板卡
//!
//! FPGA 与 CVL 双电源序列，三个 PMBus 稳压器，不记录扩展 PCIe 错误。

use super::{sensor, BoardProfile, PowerOnLabels, Regulator, SensorInfo};
use crate::bits::BoolStyle;
use crate::record::{PowerOffStatus, PowerOnStatus};
use crate::report::Report;

pub static SENSORS: [SensorInfo; 83] = [
    sensor(1, "FPGA E-TILE Max Temperature", "°C", 2),
    sensor(2, "FPGA E-TILE Temperature#1", "°C", 2),
    sensor(3, "FPGA E-TILE Temperature#2", "°C", 2),
    sensor(4, "FPGA E-TILE Temperature#3", "°C", 2),
    sensor(5, "FPGA E-TILE Temperature#4", "°C", 2),
    sensor(6, "FPGA P-TILE Temperature", "°C", 2),
    sensor(7, "FPGA FABRIC Max Temperature", "°C", 2),
    sensor(8, "FPGA FABRIC DTS#1", "°C", 2),
    sensor(9, "FPGA FABRIC DTS#2", "°C", 2),
    sensor(10, "FPGA FABRIC DTS#3", "°C", 2),
    sensor(11, "FPGA FABRIC DTS#4", "°C", 2),
    sensor(12, "FPGA FABRIC DTS#5", "°C", 2),
    sensor(13, "FPGA FABRIC RDTS#1", "°C", 2),
    sensor(14, "FPGA FABRIC RDTS#2", "°C", 2),
    sensor(15, "FPGA FABRIC RDTS#3", "°C", 2),
    sensor(16, "FPGA FABRIC RDTS#4", "°C", 2),
    sensor(60, "Board Top Near FPGA", "°C", 2),
    sensor(61, "Board Bottom Near CVL", "°C", 2),
    sensor(62, "Board Top East Near VRs Temperature", "°C", 2),
    sensor(63, "Columbiaville Die Temperature", "°C", 2),
    sensor(64, "Board Rear Side Temperature", "°C", 2),
    sensor(65, "Board Front Side Temperature", "°C", 2),
    sensor(66, "QSFP1(Primary) Case Temperature", "°C", 2),
    sensor(67, "QSFP2(Secondary) Case Temperature", "°C", 2),
    sensor(68, "FPGA Core Voltage Phase 0 VR Temperature", "°C", 2),
    sensor(69, "FPGA Core Voltage Phase 1 VR Temperature", "°C", 2),
    sensor(70, "FPGA Core Voltage Phase 2 VR Temperature", "°C", 2),
    sensor(71, "FPGA Core Voltage VR Controller Temperature", "°C", 2),
    sensor(72, "FPGA VCCH VR Temperature", "°C", 2),
    sensor(73, "FPGA VCC_1V2 VR Temperature", "°C", 2),
    sensor(74, "FPGA VCCH & VCC_1V2 VR Controller Temperature", "°C", 2),
    sensor(75, "3V3 VR Temperature", "°C", 2),
    sensor(76, "CVL Core Voltage VR Temperature", "°C", 2),
    sensor(77, "FPGA P-Tile Temperature [Remote]", "°C", 2),
    sensor(78, "FPGA E-Tile Temperature [Remote]", "°C", 2),
    sensor(79, "FPGA Core Temperature [Remote]", "°C", 2),
    sensor(80, "FPGA Corner Temperature [Remote]", "°C", 2),
    sensor(100, "Inlet 12V PCIe Rail [Voltage]", "mV", 1),
    sensor(101, "Inlet 12V PCIe Rail [Current]", "mA", 1),
    sensor(102, "Inlet 12V Aux Rail [Voltage]", "mV", 1),
    sensor(103, "Inlet 12V Aux Rail [Current]", "mA", 1),
    sensor(104, "Inlet 3V3 PCIe Rail [Voltage]", "mV", 1),
    sensor(105, "Inlet 3V3 PCIe Rail [Current]", "mA", 1),
    sensor(108, "Board Power", "mW", 1),
    sensor(130, "FPGA Core Voltage Rail [Voltage]", "mV", 1),
    sensor(131, "FPGA Core Voltage Rail [Current]", "mA", 1),
    sensor(132, "FPGA VCCH Rail [Voltage]", "mV", 1),
    sensor(133, "FPGA VCCH Rail [Current]", "mA", 1),
    sensor(134, "FPGA VCC_1V2 Rail [Voltage]", "mV", 1),
    sensor(135, "FPGA VCC_1V2 Rail [Current]", "mA", 1),
    sensor(136, "FPGA VCCH_GXER_1V1 & VCCA_1V8 [Voltage]", "mV", 1),
    sensor(137, "FPGA VCCH_GXER_1V1 & VCCA_1V8 [Current]", "mA", 1),
    sensor(138, "FPGA VCCIO_1V2 [Voltage]", "mV", 1),
    sensor(139, "FPGA VCCIO_1V2 [Current]", "mA", 1),
    sensor(140, "CVL Non Core Rails Inlet [Voltage]", "mV", 1),
    sensor(141, "CVL Non Core Rails Inlet [Current]", "mA", 1),
    sensor(142, "MAX10 & Board CLK PWR 3V3 Inlet [Voltage]", "mV", 1),
    sensor(143, "MAX10 & Board CLK PWR 3V3 Inlet [Current]", "mA", 1),
    sensor(144, "CVL Core Voltage Rail [Voltage]", "mV", 1),
    sensor(145, "CVL Core Voltage Rail [Current]", "mA", 1),
    sensor(148, "Board 3V3 VR [Voltage]", "mV", 1),
    sensor(149, "Board 3V3 VR [Current]", "mA", 1),
    sensor(150, "QSFP 3V3 Rail [Voltage]", "mV", 1),
    sensor(151, "QSFP 3V3 Rail [Current]", "mA", 1),
    sensor(152, "QSFP (Primary) Supply Voltage Rail [Voltage]", "mV", 1),
    sensor(153, "QSFP (Secondary) Supply Voltage Rail [Voltage]", "mV", 1),
    sensor(180, "VCCCLK_GXER_2V5 Voltage", "mV", 1),
    sensor(181, "AVDDH_1V1_CVL Voltage", "mV", 1),
    sensor(182, "VDDH_1V8_CVL Voltage", "mV", 1),
    sensor(183, "VCCA_PLL Voltage", "mV", 1),
    sensor(184, "VCCRT_GXER_0V9 Voltage", "mV", 1),
    sensor(185, "VCCRT_GXPL_0V9 Voltage", "mV", 1),
    sensor(186, "VCCH_GXPL_1V8 Voltage", "mV", 1),
    sensor(187, "VCCPT_1V8 Voltage", "mV", 1),
    sensor(188, "VCC_3V3_M10 Voltage", "mV", 1),
    sensor(189, "VCC_1V8_M10 Voltage", "mV", 1),
    sensor(190, "VCC_1V2_EMIF1_2_3 Voltage", "mV", 1),
    sensor(191, "VCC_1V2_EMIF4_5 Voltage", "mV", 1),
    sensor(192, "VCCA_1V8 Voltage", "mV", 1),
    sensor(193, "VCCH_GXER_1V1 Voltage", "mV", 1),
    sensor(194, "AVDD_ETH_0V9_CVL Voltage", "mV", 1),
    sensor(195, "AVDD_PCIE_0V9_CVL Voltage", "mV", 1),
    sensor(32768, "Virt FPGA Temperature", "°C", 2),
];

/// 每个稳压器四项：电压、电流、温度、输入
pub static REGULATOR_INFO: [SensorInfo; 12] = [
    sensor(0, "IR38062 Voltage", "mV", 1),
    sensor(0, "IR38062 Current", "mA", 1),
    sensor(0, "IR38062 Temperature", "°C", 1),
    sensor(0, "IR38062 Input", "mV", 1),
    sensor(0, "IR38063 Voltage", "mV", 1),
    sensor(0, "IR38063 Current", "mA", 1),
    sensor(0, "IR38063 Temperature", "°C", 1),
    sensor(0, "IR38063 Input", "mV", 1),
    sensor(0, "ISL68220 Voltage", "mV", 1),
    sensor(0, "ISL68220 Current", "mA", 1),
    sensor(0, "ISL68220 Temperature", "°C", 1),
    sensor(0, "ISL68220 Input", "mV", 1),
];

pub static REGULATORS: [Regulator; 3] = [
    Regulator {
        label: "IR38062",
        info_index: 0,
    },
    Regulator {
        label: "IR38063",
        info_index: 4,
    },
    Regulator {
        label: "ISL68220",
        info_index: 8,
    },
];

pub static PROFILE: BoardProfile = BoardProfile {
    name: "n6000",
    sensors: &SENSORS,
    regulator_info: &REGULATOR_INFO,
    regulators: &REGULATORS,
    ina3221_labels: [
        "INA3221 1 Mask Enable",
        "INA3221 2 Mask Enable",
        "INA3221 3 Mask Enable",
    ],
    power_on_labels: PowerOnLabels {
        codes: ["Power On Code FPGA", "Power On Code CVL"],
        fpga_status: "FPGA_Status (0xA0)",
        fpga_config_status: "FPGA_Config Status (0xA4)",
    },
    sequencer,
    power_good,
    sensor_failed,
    alert_offsets: [0, 32, 64],
    pci_v1: false,
};

const SEQUENCER_FPGA: [&str; 13] = [
    "IDLE_ST",
    "PWR_CLS_DEC_FPGA_ST",
    "PG_3V3_5V_ST",
    "WAIT_10MS_FPGA_ST",
    "FPGA_GRP1_EN_ST",
    "FPGA_GRP2_EN_ST",
    "FPGA_GRP3_EN_ST",
    "PG_VTT_0V6_CHK_ST",
    "FPGA_GRP1_PWR_DWN_ST",
    "FPGA_GRP2_PWR_DWN_ST",
    "FPGA_GRP3_PWR_DWN_ST",
    "FPGA_PWR_ON_ST",
    "FPGA_PWR_OFF_ST",
];

const SEQUENCER_CVL: [&str; 16] = [
    "PWR_CLS_DEC_CVL_ST",
    "CVL_VCC_1V1_ST",
    "CVL_WAIT_100US_ST",
    "CVL_3V3_1V8_EN_ST",
    "CVL_VDD_0V8_EN_ST",
    "CVL_AVDD_ETH_EN_ST",
    "CVL_AVDD_PCIE_1V1_EN_ST",
    "CVL_SI5392_CHK_ST",
    "CVL_LAN_100US_WAIT_ST",
    "CVL_LAN_PG_ST",
    "CVL_PWR_ON_ST",
    "CVL_LAN_PWR_DWN_ST",
    "CVL_AVDD_PWR_DWN_ST",
    "CVL_VDD_0V8_PWR_DWN_ST",
    "CVL_3V3_1V8_PWR_DWN_ST",
    "CVL_PWR_OFF_ST",
];

const SEQUENCER_ENABLES: [&str; 15] = [
    "EN_VCCL_FPGA_VID",
    "EN_VCCL_SDM_0V8_VCCH_0V9",
    "EN_FPGA_GRP2",
    "EN_VPP_2V5",
    "EN_VCCIO_1V8_SDM_1V8",
    "EN_VCC_1V2",
    "EN_3V3_CVL",
    "EN_1V8_CVL",
    "EN_VDD_0V8_CVL",
    "EN_AVDD_ETH_0V9_CVL",
    "EN_AVDD_PCIE_0V9_CVL",
    "EN_AVDDH_1V1_CVL",
    "EN_PWR_QSFP0",
    "EN_PWR_QSFP1",
    "FLT_CFP_ISL",
];

const SEQUENCER_ALERTS: [&str; 9] = [
    "SI5392_LOL",
    "POWER_GOOD",
    "LAN_PWR_GOOD",
    "PM_ALERTN_3V3",
    "FPGA_VID_ALERTN",
    "VR_VID_ALERTN",
    "FPGA_THERM_ALERTN",
    "CVL_THERM_ALERTN",
    "EDGE_PWR_WARN",
];

/// 0x98 与 0x84 的低 21 位含义相同
const POWER_GOOD: [&str; 21] = [
    "pg_12v_aux_efuse",
    "pg_12v_pcie_efuse",
    "pg_vcc_5v",
    "pg_vcc_3v3",
    "pg_vccl_fpga_vid",
    "pg_vccl_sdm_0v8",
    "pg_vcch_0v9",
    "pg_vcch_gxer_1v1",
    "pg_vcca_1v8",
    "pg_vccclk_gxer_2v5",
    "pg_vpp_2v5",
    "pg_vccio_1v8",
    "pg_sdm_1v8",
    "pg_vcc_1v2",
    "pg_vtt_0v6",
    "pg_vcc_1v1_cvl",
    "pg_3v3_1v8_cvl",
    "pg_vdd_0v8_cvl",
    "pg_avdd_eth_0v9_cvl",
    "pg_avdd_pcie_0v9_cvl",
    "pg_avddh_1v1_cvl",
];

const POWER_GOOD_STATUS_HIGH: [&str; 11] = [
    "pg_pwr_qsfp0n",
    "pg_pwr_qsfp1n",
    "FPGA_THERM_SHDN",
    "EDGE_PWR_SHDN",
    "FPGA_NCATTRIP",
    "VCC_12V_AUX_UV",
    "VCC_12V_PCIE_UV",
    "VCC_3V3_PCIE_UV",
    "VCC_12V_3V3_IN_OV",
    "QSFPA_MODPRES",
    "QSFPB_MODPRES",
];

const RECORD_1_FAULTS: [&str; 8] = [
    "vcc_12v_aux_uv",
    "vcc_3v3_pcie_uv",
    "vcc_3v3_pcie_uv",
    "vcc_12v_3v3_in_ov",
    "fpga_therm_shdn",
    "edge_pwr_shdn",
    "fpga_ncattrip",
    "si5392_lol",
];

const RECORD_2_ALERTS: [&str; 5] = [
    "PM_ALERTN_3V3",
    "FPGA_VID_ALERTN",
    "VR_VID_ALERTN",
    "FPGA_THERM_ALERTN",
    "EDGE_PWR_WARN",
];

/// 0x410 低 21 位，C6100 在此基础上改动了部分位
pub(crate) const SENSOR_FAILED: [&str; 21] = [
    "fpga_remote_temp",
    "board_temp",
    "inlet_12v_pcie",
    "fpga_vcch_gxer",
    "max10_board_clk_pwr",
    "cvl_core_vol_temp",
    "board_3v3_vol_temp",
    "fpga_vcch",
    "fpga_core_vol_pwr_temp",
    "fpga_fab_tile_temp",
    "qsfp1_sts",
    "qsfp2_sts",
    "io_expander_sts",
    "qsfp1_controller_access",
    "qsfp1_module_plugged",
    "qsfp1_module_supported",
    "qsfp1_diag_data_avl",
    "qsfp2_controller_access",
    "qsfp2_module_plugged",
    "qsfp2_module_supported",
    "qsfp2_diag_data_avl",
];

fn sequencer(report: &mut Report, status: &PowerOnStatus, print_bits: bool) {
    let seq = status.sequencer_status_1;
    report.value("Sequencer Status 1 (0x90)", seq);
    if print_bits {
        report.bit_run(seq, 0, &SEQUENCER_FPGA, BoolStyle::Raw);
        report.reserved_field(seq, 13, 16);
        report.bit_run(seq, 16, &SEQUENCER_CVL, BoolStyle::Raw);
    }

    let seq = status.sequencer_status_2;
    report.value("Sequencer Status 2 (0x94)", seq);
    if print_bits {
        report.bit_run(seq, 0, &SEQUENCER_ENABLES, BoolStyle::Raw);
        report.reserved_bit(seq, 15);
        report.bit_run(seq, 16, &SEQUENCER_ALERTS, BoolStyle::Raw);
    }

    let pg = status.power_good_status;
    report.value("Power Good Status (0x98)", pg);
    if print_bits {
        report.bit_run(pg, 0, &POWER_GOOD, BoolStyle::Raw);
        report.bit_run(pg, 21, &POWER_GOOD_STATUS_HIGH, BoolStyle::Raw);
    }
}

fn power_good(report: &mut Report, status: &PowerOffStatus, print_bits: bool) {
    let rec = status.record_1;
    report.value("Power Good Record 1 (0x84)", rec);
    if print_bits {
        report.bit_run(rec, 0, &POWER_GOOD, BoolStyle::Raw);
        report.bit_run(rec, 21, &RECORD_1_FAULTS, BoolStyle::Raw);
        report.reserved_bit(rec, 29);
        report.reserved_bit(rec, 30);
        report.bit("user request", rec, 31);
    }

    let rec = status.record_2;
    report.value("Power Good Record 2 (0x88)", rec);
    if print_bits {
        report.bit_run(rec, 0, &RECORD_2_ALERTS, BoolStyle::Raw);
        report.reserved_field(rec, 5, 32);
    }
}

fn sensor_failed(report: &mut Report, failed: u32) {
    report.bit_run(failed, 0, &SENSOR_FAILED, BoolStyle::Pass);
    report.reserved_field(failed, 21, 31);
    report.pass("overall_devices", failed, 31);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;

    fn power_on(seq1: u32, seq2: u32, pg: u32) -> PowerOnStatus {
        PowerOnStatus {
            header: Header::default(),
            status: 0,
            fpga_status: 0,
            fpga_config_status: 0,
            sequencer_status_1: seq1,
            sequencer_status_2: seq2,
            power_good_status: pg,
        }
    }

    #[test]
    fn test_sequencer_bits_gated() {
        let mut r = Report::new();
        sequencer(&mut r, &power_on(1, 2, 3), false);
        assert_eq!(r.as_str().lines().count(), 3);

        let mut r = Report::new();
        sequencer(&mut r, &power_on(0, 0, 0), true);
        // 3 个寄存器值 + 13 + 16 + 15 + 9 + 21 + 11 个位
        assert_eq!(r.as_str().lines().count(), 3 + 13 + 16 + 15 + 9 + 21 + 11);
        assert!(!r.as_str().contains("RESERVED"));
    }

    #[test]
    fn test_sequencer_cvl_offsets() {
        let mut r = Report::new();
        sequencer(&mut r, &power_on((1 << 31) | (1 << 14), 0, 0), true);
        let text = r.as_str();
        assert!(text.contains(&format!("      {:<46} : 1\n", "CVL_PWR_OFF_ST")));
        assert!(text.contains(&format!("      {:<46} : 0\n", "PWR_CLS_DEC_CVL_ST")));
        assert!(text.contains("*** RESERVED FIELD [15:13] IS NOT ZERO: 0x2"));
    }

    #[test]
    fn test_sensor_failed_pass_style() {
        let mut r = Report::new();
        sensor_failed(&mut r, (1 << 1) | (1 << 31));
        let text = r.as_str();
        assert!(text.contains(&format!("      {:<46} : Yes\n", "fpga_remote_temp")));
        assert!(text.contains(&format!("      {:<46} : No\n", "board_temp")));
        assert!(text.contains(&format!("      {:<46} : No\n", "overall_devices")));
    }
}
