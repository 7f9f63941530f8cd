/// Element of GF(2^128), using modulus 1 + z + z^2 + z^7 + z^128.
#[derive(Clone, Copy)]
pub struct GFb128([u64; 2]);

impl GFb128 {

    // IMPLEMENTATION NOTES
    // --------------------
    //
    // This is the portable implementation: the only multiplication opcode
    // assumed is a 64x64->64 integer multiplication. Carryless products
    // are computed with Kronecker substitution: operand bits are spread
    // four positions apart, so that the carries of an integer product stay
    // within the unused bits, and the carryless result is then obtained
    // by masking.

    /// Create a constant GF(2^128) value from its 128-bit representation
    /// (x0 is the low 64 bits, x1 the high 64 bits). This is for
    /// hardcoding constants evaluated at compile-time.
    pub const fn w64le(x0: u64, x1: u64) -> Self {
        Self([ x0, x1 ])
    }

    /// Make a value out of two 64-bit lanes (least significant lane first).
    #[inline(always)]
    pub fn from_lanes(x0: u64, x1: u64) -> Self {
        Self([ x0, x1 ])
    }

    /// Get the two 64-bit lanes of this value (least significant lane
    /// first).
    #[inline(always)]
    pub fn to_lanes(self) -> (u64, u64) {
        (self.0[0], self.0[1])
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        self.0[0] ^= rhs.0[0];
        self.0[1] ^= rhs.0[1];
    }

    // Subtraction is the same thing as addition in binary fields.

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        let (a0, a1) = (self.0[0], self.0[1]);
        let (b0, b1) = (rhs.0[0], rhs.0[1]);

        // Karatsuba: a*b = t0 + t1*z^64 + t2*z^128 with
        //   t0 = a0*b0
        //   t2 = a1*b1
        //   t1 = (a0 + a1)*(b0 + b1) + t0 + t2
        let t0 = clmul64(a0, b0);
        let t2 = clmul64(a1, b1);
        let tx = clmul64(a0 ^ a1, b0 ^ b1);
        let t1 = (tx.0 ^ t0.0 ^ t2.0, tx.1 ^ t0.1 ^ t2.1);

        // a*b = t0 + (t1 + t2*z^64)*z^64
        let u = reduce_fold(t1, t2);
        let r = reduce_fold(t0, u);
        self.0[0] = r.0;
        self.0[1] = r.1;
    }
}

gfb128_common!(GFb128);

// Carryless product of two 64-bit values; output is truncated to its
// low 64 bits.
//
// Each operand is split into four interleaved planes (bits at indices
// equal to 0, 1, 2 and 3 modulo 4). Each plane has 16 bits, so a given
// integer product puts at most 15 contributions in any 4-bit slot that
// starts below z^60, and no carry leaves the slot. Slots with 16
// contributions start at z^60 or above; their carry goes beyond z^63
// and is truncated away.
#[inline(always)]
fn clmul64_lo(x: u64, y: u64) -> u64 {
    const M0: u64 = 0x1111111111111111;
    const M1: u64 = 0x2222222222222222;
    const M2: u64 = 0x4444444444444444;
    const M3: u64 = 0x8888888888888888;

    let (x0, x1, x2, x3) = (x & M0, x & M1, x & M2, x & M3);
    let (y0, y1, y2, y3) = (y & M0, y & M1, y & M2, y & M3);
    let z0 = x0.wrapping_mul(y0) ^ x1.wrapping_mul(y3)
           ^ x2.wrapping_mul(y2) ^ x3.wrapping_mul(y1);
    let z1 = x0.wrapping_mul(y1) ^ x1.wrapping_mul(y0)
           ^ x2.wrapping_mul(y3) ^ x3.wrapping_mul(y2);
    let z2 = x0.wrapping_mul(y2) ^ x1.wrapping_mul(y1)
           ^ x2.wrapping_mul(y0) ^ x3.wrapping_mul(y3);
    let z3 = x0.wrapping_mul(y3) ^ x1.wrapping_mul(y2)
           ^ x2.wrapping_mul(y1) ^ x3.wrapping_mul(y0);
    (z0 & M0) | (z1 & M1) | (z2 & M2) | (z3 & M3)
}

// Carryless product of two 64-bit values; high 64 bits of the output
// (the top bit is always zero).
//
// If rev_n() is the bit-reversal over n bits, then:
//    clmul(rev_64(x), rev_64(y)) = rev_127(clmul(x, y))
// so the low half of the product of the reversed operands is the
// reversed high part of the product.
#[inline(always)]
fn clmul64_hi(x: u64, y: u64) -> u64 {
    clmul64_lo(x.reverse_bits(), y.reverse_bits()).reverse_bits() >> 1
}

// Carryless 64x64->128 product, returned as (lo, hi).
#[inline(always)]
pub(crate) fn clmul64(x: u64, y: u64) -> (u64, u64) {
    (clmul64_lo(x, y), clmul64_hi(x, y))
}

// Given t0 and t1 (128 bits each, as (lo, hi)), return t0 + t1*z^64,
// reduced. The low half of t1 goes into the high half of t0; the high
// half e of t1 is at z^128 = 1 + z + z^2 + z^7, and since len(e) <= 64,
// e*(1 + z + z^2 + z^7) fits on 71 bits and needs no further reduction.
#[inline(always)]
fn reduce_fold(t0: (u64, u64), t1: (u64, u64)) -> (u64, u64) {
    let e = t1.1;
    let d0 = t0.0 ^ e ^ (e << 1) ^ (e << 2) ^ (e << 7);
    let d1 = t0.1 ^ t1.0 ^ (e >> 63) ^ (e >> 62) ^ (e >> 57);
    (d0, d1)
}
