extern crate nalgebra as na;

use std::fmt::{Display,Formatter};
use serde::{Serialize, Deserialize};
use na::{DMatrix,DVector,SMatrix,SVector,Matrix,Dim,storage::StorageMut};
use crate::{Error,Result,Float};

/**
 * Measurement noise of a single view. Stacked systems are whitened block-wise, one measurement at a time.
 */
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum NoiseModel {
    Unit,
    Isotropic { sigma: Float },
    Diagonal { sigmas: Vec<Float> }
}

impl NoiseModel {

    pub fn isotropic(sigma: Float) -> NoiseModel {
        NoiseModel::Isotropic{sigma}
    }

    pub fn diagonal(sigmas: &[Float]) -> NoiseModel {
        NoiseModel::Diagonal{sigmas: sigmas.to_vec()}
    }

    pub fn name(&self) -> &str {
        match self {
            NoiseModel::Unit => "Unit",
            NoiseModel::Isotropic{..} => "Isotropic",
            NoiseModel::Diagonal{..} => "Diagonal"
        }
    }

    pub fn validate(&self, measurement_dim: usize) -> Result<()> {
        match self {
            NoiseModel::Unit => Ok(()),
            NoiseModel::Isotropic{sigma} if *sigma > 0.0 => Ok(()),
            NoiseModel::Isotropic{sigma} => Err(Error::InvalidNoiseModel(format!("sigma has to be positive, got {}", sigma))),
            NoiseModel::Diagonal{sigmas} if sigmas.len() != measurement_dim =>
                Err(Error::InvalidNoiseModel(format!("expected {} sigmas, got {}", measurement_dim, sigmas.len()))),
            NoiseModel::Diagonal{sigmas} => match sigmas.iter().all(|s| *s > 0.0) {
                true => Ok(()),
                false => Err(Error::InvalidNoiseModel(format!("sigmas have to be positive, got {:?}", sigmas)))
            }
        }
    }

    /**
     * Square root information weight of measurement row `row` (modulo the measurement dimension)
     */
    pub fn row_weight(&self, row: usize) -> Float {
        match self {
            NoiseModel::Unit => 1.0,
            NoiseModel::Isotropic{sigma} => 1.0/sigma,
            NoiseModel::Diagonal{sigmas} => 1.0/sigmas[row % sigmas.len()]
        }
    }

    fn whiten_rows_in_place<R,C,S>(&self, matrix: &mut Matrix<Float,R,C,S>) -> () where R: Dim, C: Dim, S: StorageMut<Float,R,C> {
        for i in 0..matrix.nrows() {
            let w = self.row_weight(i);
            matrix.row_mut(i).scale_mut(w);
        }
    }

    /**
     * Whitens the stacked landmark jacobian E and the stacked residual b in place
     */
    pub fn whiten_system(&self, e: &mut DMatrix<Float>, b: &mut DVector<Float>) -> () {
        assert_eq!(e.nrows(), b.nrows());
        self.whiten_rows_in_place(e);
        self.whiten_rows_in_place(b);
    }

    /**
     * Whitens a residual stacked over several views
     */
    pub fn whiten_stacked(&self, b: &DVector<Float>) -> DVector<Float> {
        let mut whitened = b.clone();
        self.whiten_rows_in_place(&mut whitened);
        whitened
    }

    pub fn whiten<const Z: usize, const C: usize>(&self, block: &SMatrix<Float,Z,C>) -> SMatrix<Float,Z,C> {
        let mut whitened = block.clone();
        self.whiten_rows_in_place(&mut whitened);
        whitened
    }

    pub fn whiten_vector<const Z: usize>(&self, v: &SVector<Float,Z>) -> SVector<Float,Z> {
        let mut whitened = v.clone();
        self.whiten_rows_in_place(&mut whitened);
        whitened
    }

    /**
     * 0.5*|W*r|^2
     */
    pub fn loss<const Z: usize>(&self, residual: &SVector<Float,Z>) -> Float {
        0.5*self.whiten_vector(residual).norm_squared()
    }

}

impl Display for NoiseModel {

    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            NoiseModel::Unit => write!(f, "{}", self.name()),
            NoiseModel::Isotropic{sigma} => write!(f, "{}_s_{:+e}", self.name(), sigma),
            NoiseModel::Diagonal{sigmas} => {
                let mut display = String::from(self.name());
                for s in sigmas {
                    display.push_str(format!("_s_{:+e}",s).as_str());
                }
                write!(f, "{}", display)
            }
        }
    }

}
