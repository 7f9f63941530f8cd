//! Gf2k is the GF(2^128) arithmetic kernel of a zero-knowledge proof
//! toolkit.
//!
//! The field is GF(2)\[z\]/(z^128 + z^7 + z^2 + z + 1). Elements are
//! represented by the `GFb128` type (see the `field` module); they are
//! created from, and read back as, a pair of 64-bit lanes (low lane first,
//! bit `i` of the low lane being the coefficient of z^i). Addition is a
//! plain XOR; multiplication is a carry-less 128x128 product (three
//! 64x64 products, with Karatsuba) followed by two reduction folds by the
//! constant 0x87.
//!
//! # Backends
//!
//! The 64x64->128 carry-less product is implemented in four ways, and
//! exactly one is compiled in, depending on the target and the enabled
//! features (see the `backend` module):
//!
//!  - `x86clmul`: x86_64 with the PCLMULQDQ opcode.
//!  - `arm64pmull`: aarch64 with the PMULL opcode (crypto extension).
//!  - `arm64pmull8`: aarch64 with plain NEON; the 64-bit product is
//!    assembled from 8x8->16 polynomial multiplies.
//!  - `m64`: portable code, using only integer multiplications
//!    (Kronecker substitution).
//!
//! All backends compute exactly the same values. Note that the hardware
//! backends are selected only if the relevant target features are enabled
//! at compile-time (e.g. with `-C target-cpu=native`); there is no runtime
//! detection.
//!
//! # Conventions
//!
//! All functions are constant-time. As in other crypto-oriented field
//! implementations, `Eq` and `PartialEq` are not implemented; comparisons
//! use `equals()` and `iszero()`, which return 0xFFFFFFFF for "true" and
//! 0x00000000 for "false". Functions named `set_*()` modify the instance
//! in place, while the corresponding function without the prefix returns
//! a new value.
//!
//! Division and inversion are not provided.

#![no_std]

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

pub mod backend;
pub mod field;
