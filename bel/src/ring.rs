//! 环形指针
//!
//! 指针单元记录最近一次写入的块号，向前追溯历史启动记录时按块号递减并回绕。

use tracing::debug;

use crate::constants::{BLOCK_COUNT, ERASED_WORD, PTR_OFFSET, PTR_SIZE};
use crate::storage::{Storage, StorageError};

/// 环形缓冲区块数
pub fn block_count() -> u32 {
    BLOCK_COUNT
}

/// 上一个（更早的）块号，调用方保证 `ptr < block_count()`
pub fn predecessor(ptr: u32) -> u32 {
    if ptr == 0 {
        block_count() - 1
    } else {
        ptr - 1
    }
}

/// 读取当前写指针；从未写入过（全 0xFF）时视为 0
pub fn current_pointer<S: Storage>(storage: &mut S) -> Result<u32, StorageError> {
    let raw = storage.read_bytes(PTR_OFFSET, PTR_SIZE)?;
    let data = u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]);

    let ptr = if data == ERASED_WORD {
        0
    } else {
        u32::from_le(data)
    };
    debug!("bel: log pointer raw=0x{:08x} ptr={}", data, ptr);
    Ok(ptr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BLOCK_SIZE;
    use crate::storage::MemStorage;

    fn image_with_pointer(cell: [u8; 4]) -> MemStorage {
        let mut data = vec![0xFFu8; (BLOCK_COUNT as u64 * BLOCK_SIZE) as usize];
        data.extend_from_slice(&cell);
        MemStorage::new(data)
    }

    #[test]
    fn test_predecessor_wraps() {
        assert_eq!(predecessor(0), 62);
        for k in 1..block_count() {
            assert_eq!(predecessor(k), k - 1);
        }
    }

    #[test]
    fn test_predecessor_single_cycle() {
        for start in 0..block_count() {
            let mut ptr = start;
            let mut seen = vec![false; block_count() as usize];
            for _ in 0..block_count() {
                assert!(!seen[ptr as usize]);
                seen[ptr as usize] = true;
                ptr = predecessor(ptr);
            }
            assert_eq!(ptr, start);
        }
    }

    #[test]
    fn test_pointer_erased_is_zero() {
        let mut storage = image_with_pointer([0xFF; 4]);
        assert_eq!(current_pointer(&mut storage).unwrap(), 0);
    }

    #[test]
    fn test_pointer_little_endian() {
        let mut storage = image_with_pointer(17u32.to_le_bytes());
        assert_eq!(current_pointer(&mut storage).unwrap(), 17);
    }

    #[test]
    fn test_pointer_io_error_propagates() {
        let mut storage = MemStorage::new(vec![0; 16]);
        assert!(matches!(
            current_pointer(&mut storage),
            Err(StorageError::OutOfRange { .. })
        ));
    }
}
