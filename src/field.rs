//! Finite fields.
//!
//! This module exposes GF(2^128), as implemented by the backend that was
//! selected at compile-time. Callers should only rely on the lane-pair
//! conversions (`from_lanes()`, `to_lanes()`, `w64le()`) and on the
//! arithmetic operators; the internal representation differs between
//! backends.

pub use crate::backend::GFb128;
