//! C6100 板卡
//!
//! FPGA 加 ICXD LCC SOC，两个 PMBus 稳压器，额外记录扩展 PCIe 错误。
//! 注意部分位展开读取的寄存器与所在标题不一致：0x90 读 0xA4，0x84 的保留位读 0xA0。

use super::n6000::SENSOR_FAILED;
use super::{sensor, BoardProfile, PowerOnLabels, Regulator, SensorInfo};
use crate::bits::BoolStyle;
use crate::record::{PowerOffStatus, PowerOnStatus};
use crate::report::Report;

pub static SENSORS: [SensorInfo; 44] = [
    sensor(1, "FPGA E-TILE Max Temperature", "°C", 2),
    sensor(2, "FPGA E-TILE Temperature#1", "°C", 2),
    sensor(3, "FPGA E-TILE Temperature#2", "°C", 2),
    sensor(4, "FPGA E-TILE Temperature#3", "°C", 2),
    sensor(5, "FPGA E-TILE Temperature#4", "°C", 2),
    sensor(6, "FPGA P-TILE Temperature", "°C", 2),
    sensor(7, "FPGA P-TILE DTS Temperature", "°C", 2),
    sensor(8, "FPGA P-TILE Max Temperature", "°C", 2),
    sensor(9, "FPGA FABRIC DTS#1", "°C", 2),
    sensor(10, "FPGA FABRIC DTS#2", "°C", 2),
    sensor(11, "FPGA FABRIC DTS#3", "°C", 2),
    sensor(12, "FPGA FABRIC DTS#4", "°C", 2),
    sensor(13, "FPGA FABRIC DTS#5", "°C", 2),
    sensor(14, "FPGA FABRIC RDTS#1", "°C", 2),
    sensor(15, "FPGA FABRIC RDTS#2", "°C", 2),
    sensor(16, "FPGA FABRIC RDTS#3", "°C", 2),
    sensor(17, "FPGA FABRIC RDTS#4", "°C", 2),
    sensor(18, "Board Bottom", "°C", 2),
    sensor(19, "FPGA Corner (SDM)Temperature", "°C", 2),
    sensor(20, "FPGA Core Fabric Temperature", "°C", 2),
    sensor(21, "FPGA P-Tile Temperature", "°C", 2),
    sensor(22, "FPGA E-Tile Temperature", "°C", 2),
    sensor(23, "Board Top Temperature", "°C", 2),
    sensor(24, "Board Rear Side Temperature", "°C", 2),
    sensor(25, "Board Front Side Temperature", "°C", 2),
    sensor(26, "FPGA Ambient Temperature", "°C", 2),
    sensor(27, "FPGA PTILE2 External Temperature", "°C", 2),
    sensor(28, "QSFP1(Primary) Case Temperature", "°C", 2),
    sensor(29, "QSFP2(Secondary) Case Temperature", "°C", 2),
    sensor(30, "Inlet 12V PCIe Rail [Voltage]", "mV", 1),
    sensor(31, "Inlet 12V PCIe Rail [Current]", "mA", 1),
    sensor(32, "Inlet 12V Aux Rail [Voltage]", "mV", 1),
    sensor(33, "Inlet 12V Aux Rail [Current]", "mA", 1),
    sensor(34, "Inlet 3V3 PCIe Rail [Voltage]", "mV", 1),
    sensor(35, "Inlet 3V3 PCIe Rail [Current]", "mA", 1),
    sensor(36, "Board Power", "mW", 1),
    sensor(37, "QSFP 3V3 Rail [Voltage]", "mV", 1),
    sensor(38, "QSFP 3V3 Rail [Current]", "mA", 1),
    sensor(39, "QSFP(Primary) Supply Voltage Rail[Voltage]", "mV", 1),
    sensor(40, "QSFP(Secondary) Supply Voltage Rail[Voltage]", "mV", 1),
    sensor(41, "Virt FPGA Temperature", "°C", 2),
    sensor(42, "SOC Package Power", "mW", 2),
    sensor(43, "SOC Package Temperature", "°C", 2),
    sensor(44, "FPGA Package Power", "mW", 2),
];

/// 每个稳压器四项：电压、电流、输入、温度
pub static REGULATOR_INFO: [SensorInfo; 8] = [
    sensor(0, "IR38063 Voltage", "mV", 1),
    sensor(0, "IR38063 Current", "mA", 1),
    sensor(0, "IR38063 Input", "mV", 1),
    sensor(0, "IR38063 Temperature", "°C", 1),
    sensor(0, "ISL68220 Voltage", "mV", 1),
    sensor(0, "ISL68220 Current", "mA", 1),
    sensor(0, "ISL68220 Input", "mV", 1),
    sensor(0, "ISL68220 Temperature", "°C", 1),
];

pub static REGULATORS: [Regulator; 2] = [
    Regulator {
        label: "PMBUS IR38063",
        info_index: 0,
    },
    Regulator {
        label: "PMBUS ISL68220",
        info_index: 4,
    },
];

pub static PROFILE: BoardProfile = BoardProfile {
    name: "c6100",
    sensors: &SENSORS,
    regulator_info: &REGULATOR_INFO,
    regulators: &REGULATORS,
    ina3221_labels: [
        "INA3221 Reg 0xF @i2c Addr 0x40 ",
        "INA3221 Reg 0xF @i2c Addr 0x41",
        "INA3221 Reg 0xF @i2c Addr 0x42",
    ],
    power_on_labels: PowerOnLabels {
        codes: ["Power On Code FPGA", "Power On Code ICXD"],
        fpga_status: "FPGA Config Status (0xA0)",
        fpga_config_status: "FPGA_Config Sts (0xA4)",
    },
    sequencer,
    power_good,
    sensor_failed,
    alert_offsets: [0, 32, 40],
    pci_v1: true,
};

/// 0x90 按字节划分的状态机状态
const SEQUENCER_STATES: [(&str, u32, u32); 4] = [
    ("FSM state of FPGA power sequencer state", 0, 8),
    ("FSM state of FPGA power sequencer (n-1) state", 8, 16),
    ("FSM state of ICXD LCC SOC power sequencer state", 16, 24),
    ("FSM state of FPGA power sequencer (n-1) state", 24, 32),
];

/// 0x94 [31:3]
const SEQUENCER_2: [&str; 29] = [
    "fm71_fatal_therm",
    "fpga_therm_shdn_n",
    "fpga_therm_alert_n",
    "board_therm_shdn_n",
    "board_therm_alert_n",
    "fpga_cattrip_n",
    "fpga_vid_alert_n",
    "edge_ina_pwr_shdn_n",
    "qsfpb_pg",
    "qsfpa_pg",
    "fpga_grp3_vccio_1v8_sdm_1v8_pg",
    "fpga_grp3_vcc_1v2_pg",
    "fpga_grp2_ddr4_vpp_2v5_pg",
    "fpga_grp2_vcca_1v8_pg",
    "fpga_grp2_vcch_gxer_1v1_pg",
    "fpga_grp2_vccclk_gxer_2v5_pg",
    "fpga_grp1_vcch_0v9_pg",
    "fpga_grp1_vccl_vid_pg",
    "vcc_5v_pg",
    "vcc_3v3_pg",
    "pcie_3v3_uv_n",
    "pcie_3v3_ov_n",
    "power_class",
    "aux_12v_uv_n",
    "aux_12v_ov_n",
    "aux_12v_efuse_pg",
    "pcie_12v_uv_n",
    "pcie_12v_ov_n",
    "pcie_12v_efuse_pg",
];

const SOC_POWER_GOOD: [&str; 15] = [
    "soc_icx_p1v8_cpu_pg",
    "soc_icx_pvnn_pch_pg",
    "soc_icx_pvccio_p1v05_pch_pg",
    "soc_icx_pvddq_abc_pg",
    "soc_ddr4_vtt_pg",
    "soc_icx_pvccana_cpu_pg",
    "soc_icx_pvccin_cpu_pg",
    "soc_ddr_dram_pwr_ok",
    "soc_pch_pwr_ok",
    "soc_pwrgood_pch_out",
    "soc_plt_rst_n",
    "soc_thermtrip_n",
    "soc_memtrip_n",
    "soc_caterr_n",
    "soc_sleep_s45_n",
];

/// 0x84 [24:3]
const RECORD_1_GOOD: [&str; 22] = [
    "qsfpb_pg",
    "qsfpa_pg",
    "fpga_grp3_vccio_1v8_sdm_1v8_pg",
    "fpga_grp3_vcc_1v2_pg",
    "fpga_grp2_ddr4_vpp_2v5_pg",
    "fpga_grp2_vcca_1v8_pg",
    "fpga_grp2_vcch_gxer_1v1_pg",
    "fpga_grp2_vccclk_gxer_2v5_pg",
    "fpga_grp1_vcch_0v9_pg",
    "fpga_grp1_vccl_vid_pg",
    "vcc_5v_pg",
    "pcie_3v3_uv_n",
    "pcie_3v3_ov_n",
    "vcc_3v3_pg",
    "aux_12v_uv_n",
    "aux_12v_ov_n",
    "pcie_12v_uv_n",
    "pcie_12v_ov_n",
    "aux_12v_efuse_pg",
    "pcie_12v_efuse_pg",
    "aux_12v_efuse_pg",
    "pcie_12v_efuse_pg",
];

/// 0x84 [31:27]
const RECORD_1_SHUTDOWN: [&str; 5] = [
    "fm71_fatal_therm",
    "fpga_cattrip_n",
    "edge_ina_pwr_shdn_n",
    "fpga_therm_shdn_n",
    "board_therm_shdn_n",
];

/// 0x88 [7:0]
const RECORD_2_SOC: [&str; 8] = [
    "soc_pchhot_n",
    "soc_memhot_out_n",
    "soc_memtrip_n",
    "soc_thermtrip_n",
    "soc_icx_pvccin_cpu_pg",
    "soc_icx_pvccana_cpu_pg",
    "soc_ddr4_vtt_pg",
    "soc_icx_pvddq_abc_pg",
];

/// 0x410 [9:0]，前三项都读 bit 2
const SENSOR_FAILED_LOW: [(&str, u32); 10] = [
    ("fpga_remote_temp", 2),
    ("board_temp", 2),
    ("inlet_12v_pcie", 2),
    ("fpga_vcch_gxer", 3),
    ("max10_board_clk_pwr", 4),
    ("icxd_voltage", 5),
    ("icxd_voltage", 6),
    ("fpga_vcch", 7),
    ("fpga_core_vol_pwr_temp", 8),
    ("fpga_fab_tile_temp", 9),
];

const SENSOR_FAILED_ICXD: [&str; 8] = [
    "ADS7128_I2C_SA15H",
    "ADS7128_I2C_SA16H",
    "ADS7128_I2C_SA17H",
    "ICXD_LCC_SMBUS_PECI",
    "ICXD_LCC_IR38163",
    "ICXD_LCC_IR38363",
    "PXE1410_ICXD_LCC",
    "PXM1310_ICXD_LCC",
];

fn sequencer(report: &mut Report, status: &PowerOnStatus, print_bits: bool) {
    report.value("Sequencer Status 1 (0x90)", status.sequencer_status_1);
    if print_bits {
        for (label, first, last) in SEQUENCER_STATES {
            report.field(label, status.fpga_config_status, first, last);
        }
    }

    let seq = status.sequencer_status_2;
    report.value("Sequencer Status 2 (0x94)", seq);
    if print_bits {
        report.reserved_field(seq, 0, 2);
        report.bit_run(seq, 3, &SEQUENCER_2, BoolStyle::Raw);
    }

    let pg = status.power_good_status;
    report.value("Power Good Status (0x98)", pg);
    if print_bits {
        report.bit_run(pg, 0, &SOC_POWER_GOOD, BoolStyle::Raw);
    }
}

fn power_good(report: &mut Report, status: &PowerOffStatus, print_bits: bool) {
    let rec = status.record_1;
    report.value("Power Good Record 1 (0x84)", rec);
    if print_bits {
        report.reserved_field(status.fpga_status, 0, 2);
        report.bit_run(rec, 3, &RECORD_1_GOOD, BoolStyle::Raw);
        report.reserved_field(status.fpga_status, 24, 25);
        report.bit_run(rec, 27, &RECORD_1_SHUTDOWN, BoolStyle::Raw);
    }

    let rec = status.record_2;
    report.value("Power Good Record 2 (0x88)", rec);
    if print_bits {
        report.bit_run(rec, 0, &RECORD_2_SOC, BoolStyle::Raw);
        report.bit("soc_icx_pvnn_pch_pg", rec, 9);
        report.bit("soc_icx_p1v8_cpu_pg", rec, 10);
        report.reserved_field(rec, 11, 32);
    }
}

fn sensor_failed(report: &mut Report, failed: u32) {
    for (label, offset) in SENSOR_FAILED_LOW {
        report.pass(label, failed, offset);
    }
    report.bit_run(failed, 10, &SENSOR_FAILED[10..], BoolStyle::Pass);
    report.bit_run(failed, 21, &SENSOR_FAILED_ICXD, BoolStyle::Pass);
    report.reserved_field(failed, 29, 30);
    report.pass("overall_devices", failed, 31);
}
