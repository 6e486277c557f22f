//! Population count with a strategy resolved once per process.
//!
//! The first call picks the hardware instruction when the running CPU has one and
//! falls back to a portable bit-clearing loop otherwise. Both strategies agree on
//! every input.

use std::sync::OnceLock;

use log::debug;

type PopcountFn = fn(u64) -> u32;

static POPCOUNT: OnceLock<PopcountFn> = OnceLock::new();

/// Returns the number of set bits in `x`.
#[inline]
pub fn popcount(x: u64) -> u32 {
    POPCOUNT.get_or_init(select)(x)
}

fn select() -> PopcountFn {
    if has_native_popcount() {
        debug!("popcount: using native instruction");
        popcount_native
    } else {
        debug!("popcount: using portable fallback");
        popcount_portable
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn has_native_popcount() -> bool {
    std::arch::is_x86_feature_detected!("popcnt")
}

#[cfg(target_arch = "aarch64")]
fn has_native_popcount() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn has_native_popcount() -> bool {
    false
}

fn popcount_native(x: u64) -> u32 {
    x.count_ones()
}

/// Kernighan's loop: one iteration per set bit.
pub fn popcount_portable(mut x: u64) -> u32 {
    let mut count = 0;
    while x != 0 {
        x &= x - 1;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_popcount_small() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(1), 1);
        assert_eq!(popcount(0b1011), 3);
        assert_eq!(popcount(u64::MAX), 64);
    }

    #[test]
    fn test_strategies_agree() {
        for x in (0..4096u64).chain([u64::MAX, 1 << 63, 0xdead_beef_cafe_babe]) {
            assert_eq!(popcount_portable(x), popcount_native(x), "x = {:#x}", x);
            assert_eq!(popcount(x), x.count_ones());
        }
    }
}
