extern crate nalgebra as na;

use std::collections::HashMap;
use na::{DMatrix,DVector,Vector6};
use crate::numerics::symmetric_block_matrix::SymmetricBlockMatrix;
use crate::{Key,Float};

pub const POSE_DIM: usize = 6;

/**
 * Quadratic factor over 6 dimensional pose variables stored as the augmented information matrix
 *  [ G  g ]
 *  [ g' f ]
 * whose error at a tangent space perturbation x is 0.5*(f - 2*x'g + x'Gx).
 */
#[derive(Debug,Clone,PartialEq)]
pub struct HessianFactor {
    keys: Vec<Key>,
    info: SymmetricBlockMatrix
}

impl HessianFactor {

    pub fn new(keys: Vec<Key>, info: SymmetricBlockMatrix) -> HessianFactor {
        assert_eq!(keys.len()+1, info.n_blocks(), "HessianFactor: one block per key plus the augmented block expected");
        HessianFactor{keys, info}
    }

    /**
     * Factor that contributes no information and no gradient
     */
    pub fn zero(keys: Vec<Key>) -> HessianFactor {
        let info = SymmetricBlockMatrix::zeros(&Self::augmented_dims(keys.len()));
        HessianFactor{keys, info}
    }

    pub fn augmented_dims(n_keys: usize) -> Vec<usize> {
        let mut dims = vec![POSE_DIM; n_keys];
        dims.push(1);
        dims
    }

    pub fn keys(&self) -> &Vec<Key> {
        &self.keys
    }

    /**
     * Block widths: 6 per key followed by the augmented scalar block
     */
    pub fn dims(&self) -> &Vec<usize> {
        self.info.dims()
    }

    pub fn info(&self) -> &SymmetricBlockMatrix {
        &self.info
    }

    pub fn augmented_information(&self) -> DMatrix<Float> {
        self.info.self_adjoint_view()
    }

    pub fn information(&self) -> DMatrix<Float> {
        let n = POSE_DIM*self.keys.len();
        self.augmented_information().view((0,0),(n,n)).into_owned()
    }

    pub fn linear_term(&self) -> DVector<Float> {
        let n = POSE_DIM*self.keys.len();
        self.augmented_information().view((0,n),(n,1)).column(0).into_owned()
    }

    pub fn constant_term(&self) -> Float {
        let n = POSE_DIM*self.keys.len();
        self.augmented_information()[(n,n)]
    }

    pub fn is_zero(&self) -> bool {
        self.info.is_zero()
    }

    /**
     * Missing keys in delta are treated as zero perturbations
     */
    #[allow(non_snake_case)]
    pub fn error(&self, delta: &HashMap<Key, Vector6<Float>>) -> Float {
        let mut x = DVector::<Float>::zeros(POSE_DIM*self.keys.len());
        for (i,key) in self.keys.iter().enumerate() {
            if let Some(d) = delta.get(key) {
                x.fixed_rows_mut::<POSE_DIM>(POSE_DIM*i).copy_from(d);
            }
        }
        let x_g = x.dot(&self.linear_term());
        let x_G_x = (x.transpose()*self.information()*&x)[0];
        0.5*(self.constant_term() - 2.0*x_g + x_G_x)
    }

}
