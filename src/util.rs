//! Assorted utility functions and structures shared across the core.

use std::{cell::RefCell, rc::Rc, sync::Arc, sync::Mutex};

/// Shared mutable type able to be passed between types
/// allowing for circular referencing and interior mutability.
pub type SharedMut<T> = Rc<RefCell<T>>;

/// Shared thread type able to be passed between threads.
///
/// Significant performance overhead compared to `SharedMut`, reserved
/// for state that genuinely needs to cross a thread boundary.
pub type SharedThread<T> = Arc<Mutex<T>>;

/// Capitalizes the first character in the provided string.
pub fn capitalize(string: &str) -> String {
    let mut chars = string.chars();
    match chars.next() {
        None => String::new(),
        Some(chr) => chr.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Copies the contents of the source slice into the destination slice.
///
/// Optimized for performance, used on the OAM DMA and HDMA/GDMA copy
/// paths where the source and destination never overlap.
pub fn copy_fast(src: &[u8], dst: &mut [u8], count: usize) {
    assert!(src.len() >= count);
    assert!(dst.len() >= count);

    unsafe {
        let src_ptr = src.as_ptr();
        let dst_ptr = dst.as_mut_ptr();
        std::ptr::copy_nonoverlapping(src_ptr, dst_ptr, count);
    }
}

/// Returns the number of seconds elapsed since the Unix epoch, used to
/// seed the MBC3 real-time clock from the host's wall-clock time.
pub fn timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now();
    now.duration_since(UNIX_EPOCH).unwrap().as_secs()
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn test_capitalize_empty_string() {
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_capitalize_single_character() {
        assert_eq!(capitalize("a"), "A");
    }

    #[test]
    fn test_capitalize_multiple_characters() {
        assert_eq!(capitalize("hello, world!"), "Hello, world!");
    }
}
