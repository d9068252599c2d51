//! 存储访问
//!
//! 事件日志所在的闪存由外部对象提供，这里只约定按偏移读取字节的接口。
//! 每次调用都直接读存储，不做缓存。

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// 存储读取错误
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("read of {len} bytes at 0x{offset:x} is outside storage of {size} bytes")]
    OutOfRange { offset: u64, len: usize, size: u64 },
    #[error("short read: {len} bytes at 0x{offset:x}")]
    ShortRead { offset: u64, len: usize },
}

/// 按字节范围读取的存储对象
pub trait Storage {
    /// 从 `offset` 读取 `len` 字节
    fn read_bytes(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, StorageError>;

    /// 读取一个小端 u64
    fn read_u64(&mut self, offset: u64) -> Result<u64, StorageError> {
        let buf = self.read_bytes(offset, 8)?;
        let mut word = [0u8; 8];
        word.copy_from_slice(&buf[..8]);
        Ok(u64::from_le_bytes(word))
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn read_bytes(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, StorageError> {
        (**self).read_bytes(offset, len)
    }
}

/// 文件存储：闪存镜像文件或内核导出的原始事件日志属性
pub struct FileStorage {
    file: File,
}

impl FileStorage {
    /// 只读打开
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(Self { file })
    }
}

impl Storage for FileStorage {
    fn read_bytes(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, StorageError> {
        debug!("bel: file read {} bytes at 0x{:x}", len, offset);
        self.file.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; len];
        match self.file.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(StorageError::ShortRead { offset, len })
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// 内存存储：已抓取的完整镜像
#[derive(Debug, Clone, Default)]
pub struct MemStorage {
    data: Vec<u8>,
}

impl MemStorage {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Storage for MemStorage {
    fn read_bytes(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, StorageError> {
        let size = self.data.len() as u64;
        let end = offset.checked_add(len as u64);
        match end {
            Some(end) if end <= size => {
                let start = offset as usize;
                Ok(self.data[start..start + len].to_vec())
            }
            _ => Err(StorageError::OutOfRange { offset, len, size }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mem_read_in_range() {
        let mut storage = MemStorage::new((0u8..16).collect());
        assert_eq!(storage.read_bytes(4, 3).unwrap(), vec![4, 5, 6]);
        assert_eq!(
            storage.read_u64(8).unwrap(),
            u64::from_le_bytes([8, 9, 10, 11, 12, 13, 14, 15])
        );
    }

    #[test]
    fn test_mem_read_out_of_range() {
        let mut storage = MemStorage::new(vec![0; 8]);
        let err = storage.read_bytes(6, 4).unwrap_err();
        assert!(matches!(
            err,
            StorageError::OutOfRange {
                offset: 6,
                len: 4,
                size: 8
            }
        ));
        assert!(storage.read_bytes(u64::MAX, 1).is_err());
    }

    #[test]
    fn test_file_short_read() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0xAB; 10]).unwrap();
        tmp.flush().unwrap();

        let mut storage = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(storage.read_bytes(2, 4).unwrap(), vec![0xAB; 4]);
        let err = storage.read_bytes(8, 4).unwrap_err();
        assert!(matches!(err, StorageError::ShortRead { offset: 8, len: 4 }));
    }
}
