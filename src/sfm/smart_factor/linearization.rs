use log::{debug,warn};
use crate::linear::hessian_factor::HessianFactor;
use crate::sensors::camera::Calibration;
use crate::sfm::{values::Values,triangulation::TriangulationResult};
use crate::sfm::smart_factor::{SmartProjectionFactor,params::LinearizationMode,schur::{compute_point_covariance,schur_complement},packing::pack_unique_keys};
use crate::{Error,Result,Float};

/**
 * Builds the linear factor of a smart factor at the given values with damping lambda and the diagonal damping flag
 */
pub type LinearizationStrategy<C, const Z: usize> = fn(&SmartProjectionFactor<C,Z>, &Values, Float, bool) -> Result<HessianFactor>;

impl LinearizationMode {
    pub fn strategy<C, const Z: usize>(self) -> Result<LinearizationStrategy<C,Z>> where C: Calibration<Z> {
        match self {
            LinearizationMode::Hessian => Ok(create_hessian_factor::<C,Z> as LinearizationStrategy<C,Z>),
            mode => Err(Error::UnsupportedLinearizationMode(mode))
        }
    }
}

pub fn create_hessian_factor<C, const Z: usize>(factor: &SmartProjectionFactor<C,Z>, values: &Values, lambda: Float, diagonal_damping: bool) -> Result<HessianFactor> where C: Calibration<Z> {
    let cameras = factor.cameras(values)?;

    let point = match factor.triangulate_cameras(&cameras) {
        TriangulationResult::Valid(point) => point,
        result => {
            debug!("create_hessian_factor: triangulation {}, returning zero factor on {} keys", result, factor.keys().len());
            return Ok(HessianFactor::zero(factor.keys().clone()));
        }
    };

    let mut linearized = factor.compute_jacobians(values, Some(&point))?;
    let noise_model = factor.noise_model();
    noise_model.whiten_system(&mut linearized.e, &mut linearized.b);
    let fs = linearized.fs.iter().map(|f| noise_model.whiten(f)).collect::<Vec<_>>();

    let p = match compute_point_covariance(&linearized.e, lambda, diagonal_damping) {
        Some(p) => p,
        None => {
            warn!("create_hessian_factor: singular point covariance, returning zero factor");
            return Ok(HessianFactor::zero(factor.keys().clone()));
        }
    };

    let augmented = schur_complement(&fs, &linearized.e, &p, &linearized.b);
    let packed = pack_unique_keys(augmented, &factor.nonunique_keys(), factor.keys());
    Ok(HessianFactor::new(factor.keys().clone(), packed))
}
