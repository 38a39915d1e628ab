extern crate nalgebra as na;

pub mod error;
pub mod numerics;
pub mod sensors;
pub mod sfm;
pub mod linear;

pub use error::{Error, Result};

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f64);

/**
 * Identifier of a pose variable (body pose or extrinsic pose) in the surrounding graph
 */
pub type Key = u64;

/**
 * Packs a character and an index into a key, e.g. symbol('x',3) for the third body pose
 */
pub fn symbol(chr: char, index: u64) -> Key {
    const INDEX_BITS: u64 = 56;
    ((chr as u64) << INDEX_BITS) | (index & ((1u64 << INDEX_BITS) - 1))
}
