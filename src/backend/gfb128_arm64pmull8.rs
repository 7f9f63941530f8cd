use core::arch::aarch64::*;
use core::mem::transmute;

/// Element of GF(2^128), using modulus 1 + z + z^2 + z^7 + z^128.
#[derive(Clone, Copy)]
pub struct GFb128(uint64x2_t);

impl GFb128 {

    // IMPLEMENTATION NOTES
    // --------------------
    //
    // This backend is for aarch64 systems with NEON but without the
    // crypto extension: the only carryless multiplication opcode is
    // vmull_p8(), which computes eight 8x8->16 products in parallel.
    // A 64x64->128 product is assembled from eight of these (one per
    // byte of the second operand), with the high bytes of each step
    // carried into the next one. The overall structure of set_mul() and
    // of the reduction is otherwise the same as with PMULL.

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
            // t1 = (a0 + a1)*(b0 + b1) + t0 + t2   (Karatsuba)
            let t0 = pmul64x64(a0, b0);
            let t2 = pmul64x64(a1, b1);
            let t1 = veorq_u64(pmul64x64(a0 ^ a1, b0 ^ b1), veorq_u64(t0, t2));

            // a*b = t0 + (t1 + t2*z^64)*z^64
            let u = reduce_fold(t1, t2);
            self.0 = reduce_fold(t0, u);
        }
    }
}

gfb128_common!(GFb128);

// Multiply-accumulate of a 64-bit value x by an 8-bit value y, with
// input carry c. The 72-bit product x*y + c is returned as two byte
// vectors (lo, hi), with only the low 8 bytes of each being non-zero:
// byte i of lo is the low byte of x_i*y (plus byte i of c), byte i of hi
// is the high byte of x_i*y. The value is then lo + hi*z^8.
//
// vmull_p8() yields eight 16-bit lanes; viewed as bytes, the low bytes
// are at even indices and the high bytes at odd indices, which
// vuzpq_p8() separates.
#[inline(always)]
unsafe fn pmac64x8(c: poly8x16_t, x: poly8x8_t, y: u8)
    -> (poly8x16_t, poly8x16_t)
{
    let prod = vreinterpretq_p8_p16(vmull_p8(x, vdup_n_p8(y)));
    let uzp = vuzpq_p8(prod, vdupq_n_p8(0));
    (vaddq_p8(uzp.0, c), uzp.1)
}

// Carryless 64x8->72 product, returned over 16 bytes.
#[inline(always)]
unsafe fn pmul64x8(x: poly8x8_t, y: u8) -> poly8x16_t {
    let (lo, hi) = pmac64x8(vdupq_n_p8(0), x, y);

    // vextq_p8(v, v, 15) rotates v up by one byte; since the top byte of
    // hi is zero, this is a shift by z^8.
    vaddq_p8(lo, vextq_p8(hi, hi, 15))
}

// Carryless 64x64->128 product.
//
// Step k (0 to 7) multiplies x by byte k of y; the result must be added
// at z^(8*k). The high bytes of step k-1 are at z^(8*k) too, so they are
// passed as the input carry of step k, and the sum is added to r with a
// rotation by k bytes (vextq_p8(v, v, 16 - k)). The high bytes of the
// last step go to z^64.
//
// vaddq_p8() is a XOR (polynomial addition).
#[inline(always)]
unsafe fn pmul64x64_p8(x: u64, y: u64) -> poly8x16_t {
    let xv = vcreate_p8(x);

    let (r, c) = pmac64x8(vdupq_n_p8(0), xv, y as u8);

    let (s, c) = pmac64x8(c, xv, (y >> 8) as u8);
    let r = vaddq_p8(r, vextq_p8(s, s, 15));

    let (s, c) = pmac64x8(c, xv, (y >> 16) as u8);
    let r = vaddq_p8(r, vextq_p8(s, s, 14));

    let (s, c) = pmac64x8(c, xv, (y >> 24) as u8);
    let r = vaddq_p8(r, vextq_p8(s, s, 13));

    let (s, c) = pmac64x8(c, xv, (y >> 32) as u8);
    let r = vaddq_p8(r, vextq_p8(s, s, 12));

    let (s, c) = pmac64x8(c, xv, (y >> 40) as u8);
    let r = vaddq_p8(r, vextq_p8(s, s, 11));

    let (s, c) = pmac64x8(c, xv, (y >> 48) as u8);
    let r = vaddq_p8(r, vextq_p8(s, s, 10));

    let (s, c) = pmac64x8(c, xv, (y >> 56) as u8);
    let r = vaddq_p8(r, vextq_p8(s, s, 9));

    vaddq_p8(r, vextq_p8(c, c, 8))
}

#[inline(always)]
unsafe fn pmul64x64(x: u64, y: u64) -> uint64x2_t {
    vreinterpretq_u64_p8(pmul64x64_p8(x, y))
}

// Given t0 and t1, return t0 + t1*z^64, reduced. The high half of t1
// (at z^128) is multiplied by 0x87 = z^7 + z^2 + z + 1 with a single
// 64x8 product.
#[inline(always)]
unsafe fn reduce_fold(t0: uint64x2_t, t1: uint64x2_t) -> uint64x2_t {
    let z = vdupq_n_u64(0);
    let t0 = veorq_u64(t0, vextq_u64(z, t1, 1));
    let e = vcreate_p8(vgetq_lane_u64(t1, 1));
    veorq_u64(t0, vreinterpretq_u64_p8(pmul64x8(e, 0x87)))
}
