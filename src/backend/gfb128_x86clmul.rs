use core::arch::x86_64::*;

/// Element of GF(2^128), using modulus 1 + z + z^2 + z^7 + z^128.
#[derive(Clone, Copy)]
pub struct GFb128(__m128i);

impl GFb128 {

    // IMPLEMENTATION NOTES
    // --------------------
    //
    // The value is kept in an SSE2 register, low lane first. Carryless
    // products use pclmulqdq; the immediate operand selects the 64-bit
    // halves of the operands (bit 0 for the first operand, bit 4 for the
    // second, 0 meaning the low half).

    /// Create a constant GF(2^128) value from its 128-bit representation
    /// (x0 is the low 64 bits, x1 the high 64 bits). This is for
    /// hardcoding constants evaluated at compile-time.
    pub const fn w64le(x0: u64, x1: u64) -> Self {
        unsafe { Self(core::mem::transmute([ x0, x1 ])) }
    }

    /// Make a value out of two 64-bit lanes (least significant lane first).
    #[inline(always)]
    pub fn from_lanes(x0: u64, x1: u64) -> Self {
        unsafe { Self(_mm_set_epi64x(x1 as i64, x0 as i64)) }
    }

    /// Get the two 64-bit lanes of this value (least significant lane
    /// first).
    #[inline(always)]
    pub fn to_lanes(self) -> (u64, u64) {
        unsafe {
            (_mm_cvtsi128_si64(self.0) as u64,
             _mm_cvtsi128_si64(_mm_bsrli_si128(self.0, 8)) as u64)
        }
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        unsafe {
            self.0 = _mm_xor_si128(self.0, rhs.0);
        }
    }

    // Subtraction is the same thing as addition in binary fields.

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        unsafe {
            let a = self.0;
            let b = rhs.0;

            // t0 = a0*b0
            // t2 = a1*b1
            let t0 = _mm_clmulepi64_si128(a, b, 0x00);
            let t2 = _mm_clmulepi64_si128(a, b, 0x11);

            // Karatsuba: t1 = (a0 + a1)*(b0 + b1) + t0 + t2
            // The low lanes of ax and bx are a0 + a1 and b0 + b1.
            let ax = _mm_xor_si128(a, _mm_bsrli_si128(a, 8));
            let bx = _mm_xor_si128(b, _mm_bsrli_si128(b, 8));
            let t1 = _mm_xor_si128(
                _mm_clmulepi64_si128(ax, bx, 0x00),
                _mm_xor_si128(t0, t2));

            // a*b = t0 + (t1 + t2*z^64)*z^64
            let u = reduce_fold(t1, t2);
            self.0 = reduce_fold(t0, u);
        }
    }
}

gfb128_common!(GFb128);

// Given t0 and t1, return t0 + t1*z^64, reduced: the low half of t1 is
// moved to the high half of t0, and the high half of t1 (at z^128) is
// multiplied by z^7 + z^2 + z + 1.
#[inline(always)]
unsafe fn reduce_fold(t0: __m128i, t1: __m128i) -> __m128i {
    let poly = _mm_cvtsi64_si128(0x87);
    let t0 = _mm_xor_si128(t0, _mm_bslli_si128(t1, 8));
    _mm_xor_si128(t0, _mm_clmulepi64_si128(t1, poly, 0x01))
}

// Carryless 64x64->128 product, returned as (lo, hi).
#[cfg(test)]
fn clmul64(x: u64, y: u64) -> (u64, u64) {
    unsafe {
        let r = _mm_clmulepi64_si128(
            _mm_cvtsi64_si128(x as i64), _mm_cvtsi64_si128(y as i64), 0x00);
        GFb128(r).to_lanes()
    }
}
