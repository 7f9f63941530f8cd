use core::arch::aarch64::*;
use core::mem::transmute;

/// Element of GF(2^128), using modulus 1 + z + z^2 + z^7 + z^128.
#[derive(Clone, Copy)]
pub struct GFb128(uint64x2_t);

impl GFb128 {

    // IMPLEMENTATION NOTES
    // --------------------
    //
    // The value is kept in a NEON register, low lane first. Carryless
    // products use the PMULL opcode (vmull_p64() for the low lanes,
    // vmull_high_p64() for the high lanes); lanes are moved around with
    // vextq_u64().

    /// Create a constant GF(2^128) value from its 128-bit representation
    /// (x0 is the low 64 bits, x1 the high 64 bits). This is for
    /// hardcoding constants evaluated at compile-time.
    pub const fn w64le(x0: u64, x1: u64) -> Self {
        unsafe { Self(transmute([ x0, x1 ])) }
    }

    /// Make a value out of two 64-bit lanes (least significant lane first).
    #[inline(always)]
    pub fn from_lanes(x0: u64, x1: u64) -> Self {
        unsafe { Self(vcombine_u64(vcreate_u64(x0), vcreate_u64(x1))) }
    }

    /// Get the two 64-bit lanes of this value (least significant lane
    /// first).
    #[inline(always)]
    pub fn to_lanes(self) -> (u64, u64) {
        unsafe { (vgetq_lane_u64(self.0, 0), vgetq_lane_u64(self.0, 1)) }
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        unsafe {
            self.0 = veorq_u64(self.0, rhs.0);
        }
    }

    // Subtraction is the same thing as addition in binary fields.

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        unsafe {
            let a = self.0;
            let b = rhs.0;
            let (a0, a1) = (vgetq_lane_u64(a, 0), vgetq_lane_u64(a, 1));
            let (b0, b1) = (vgetq_lane_u64(b, 0), vgetq_lane_u64(b, 1));

            // t0 = a0*b0
            // t2 = a1*b1
            let t0 = clmul64(a0, b0);
            let t2 = vreinterpretq_u64_p128(vmull_high_p64(
                vreinterpretq_p64_u64(a), vreinterpretq_p64_u64(b)));

            // Karatsuba: t1 = (a0 + a1)*(b0 + b1) + t0 + t2
            let t1 = veorq_u64(clmul64(a0 ^ a1, b0 ^ b1), veorq_u64(t0, t2));

            // a*b = t0 + (t1 + t2*z^64)*z^64
            let u = reduce_fold(t1, t2);
            self.0 = reduce_fold(t0, u);
        }
    }
}

gfb128_common!(GFb128);

// Carryless 64x64->128 product.
#[inline(always)]
unsafe fn clmul64(x: u64, y: u64) -> uint64x2_t {
    vreinterpretq_u64_p128(vmull_p64(x, y))
}

// Given t0 and t1, return t0 + t1*z^64, reduced. vextq_u64(z, t1, 1)
// is (0, lo(t1)), i.e. the low half of t1 shifted by 64 bits; the high
// half of t1 (at z^128) is multiplied by z^7 + z^2 + z + 1.
#[inline(always)]
unsafe fn reduce_fold(t0: uint64x2_t, t1: uint64x2_t) -> uint64x2_t {
    let z = vdupq_n_u64(0);
    let t0 = veorq_u64(t0, vextq_u64(z, t1, 1));
    veorq_u64(t0, clmul64(vgetq_lane_u64(t1, 1), 0x87))
}
