extern crate nalgebra as na;
extern crate num_traits;

use na::{Vector,Dim,storage::Storage};
use num_traits::Float as NumFloat;
use crate::Float;

pub mod lie;
pub mod pose;
pub mod noise_model;
pub mod symmetric_block_matrix;

pub fn max_norm<D,S>(vector: &Vector<Float,D,S>) -> Float where D: Dim, S: Storage<Float,D> {

    vector.iter().fold(0.0,|max,v|
        match v.abs() {
            v_abs if v_abs > max => v_abs,
            _ => max
        }
    )

}

/**
 * Indices of the components that carry the invalid (NaN) sentinel
 */
pub fn invalid_components<D,S>(vector: &Vector<Float,D,S>) -> Vec<usize> where D: Dim, S: Storage<Float,D> {
    vector.iter().enumerate().filter(|(_,v)| NumFloat::is_nan(**v)).map(|(i,_)| i).collect()
}
