//! 解码器错误
//!
//! 真正的错误只有存储读取失败和参数越界，外加写报告时的格式化失败。
//! 保留位非零、未知码值、未知传感器、缺失的子记录都只是报告里的诊断文本。

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum BelError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid {what} value: {value}")]
    InvalidArgument { what: &'static str, value: u32 },
    #[error("output error: {0}")]
    Output(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, BelError>;
