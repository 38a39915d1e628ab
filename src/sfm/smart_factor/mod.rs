extern crate nalgebra as na;

use log::debug;
use na::{SVector,Vector3,Isometry3};
use crate::numerics::noise_model::NoiseModel;
use crate::sensors::camera::{Calibration,SharedCalibration,pinhole::Pinhole,stereo::StereoCalibration};
use crate::sfm::values::Values;
use crate::sfm::triangulation::{triangulate_views,TriangulationResult};
use crate::linear::hessian_factor::HessianFactor;
use crate::{Error,Result,Key,Float};

pub mod params;
pub mod views;
pub mod jacobians;
pub mod schur;
pub mod packing;
pub mod linearization;

use params::{SmartFactorParams,DegeneracyMode};
use views::{View,ViewRegistry};
use jacobians::{LinearizedViews,camera_pose,compute_jacobians_and_correct_for_missing_measurements,compute_residuals};

/**
 * Constraint over body poses and extrinsics that observe a single landmark.
 * The landmark is never a variable: it is triangulated from the current values and marginalized on every linearization.
 */
#[derive(Debug,Clone)]
pub struct SmartProjectionFactor<C, const Z: usize> {
    registry: ViewRegistry<C,Z>,
    noise_model: NoiseModel,
    params: SmartFactorParams
}

pub type SmartStereoProjectionFactor = SmartProjectionFactor<StereoCalibration,3>;
pub type SmartMonoProjectionFactor = SmartProjectionFactor<Pinhole,2>;

impl<C, const Z: usize> SmartProjectionFactor<C,Z> where C: Calibration<Z> {

    pub fn new(noise_model: NoiseModel, params: SmartFactorParams) -> Result<SmartProjectionFactor<C,Z>> {
        noise_model.validate(Z)?;
        match params.degeneracy_mode {
            DegeneracyMode::HandleInfinity => Err(Error::UnsupportedDegeneracyMode(params.degeneracy_mode)),
            _ => Ok(SmartProjectionFactor{registry: ViewRegistry::new(), noise_model, params})
        }
    }

    pub fn add(&mut self, measurement: SVector<Float,Z>, body_key: Key, extrinsic_key: Key, calibration: SharedCalibration<C>) -> () {
        self.registry.add(measurement, body_key, extrinsic_key, calibration);
    }

    pub fn add_batch(&mut self, measurements: &[SVector<Float,Z>], body_keys: &[Key], extrinsic_keys: &[Key], calibrations: &[SharedCalibration<C>]) -> Result<()> {
        self.registry.add_batch(measurements, body_keys, extrinsic_keys, calibrations)
    }

    /**
     * All views of the batch reference the same calibration
     */
    pub fn add_batch_shared(&mut self, measurements: &[SVector<Float,Z>], body_keys: &[Key], extrinsic_keys: &[Key], calibration: &SharedCalibration<C>) -> Result<()> {
        self.registry.add_batch_shared(measurements, body_keys, extrinsic_keys, calibration)
    }

    /**
     * Unique keys in order of first appearance. This is the block layout of the linearized factor.
     */
    pub fn keys(&self) -> &Vec<Key> {
        self.registry.keys()
    }

    pub fn body_keys(&self) -> Vec<Key> {
        self.registry.body_keys()
    }

    pub fn extrinsic_keys(&self) -> Vec<Key> {
        self.registry.extrinsic_keys()
    }

    pub fn nonunique_keys(&self) -> Vec<Key> {
        self.registry.nonunique_keys()
    }

    pub fn measured(&self) -> Vec<SVector<Float,Z>> {
        self.views().iter().map(|v| v.measurement).collect()
    }

    pub fn calibrations(&self) -> Vec<SharedCalibration<C>> {
        self.views().iter().map(|v| v.calibration.clone()).collect()
    }

    pub fn views(&self) -> &Vec<View<C,Z>> {
        self.registry.views()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn params(&self) -> &SmartFactorParams {
        &self.params
    }

    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    /**
     * Camera poses body*extrinsic, one per view
     */
    pub fn cameras(&self, values: &Values) -> Result<Vec<Isometry3<Float>>> {
        self.views().iter().map(|v| camera_pose(v,values)).collect()
    }

    pub fn triangulate_cameras(&self, cameras: &[Isometry3<Float>]) -> TriangulationResult {
        let calibrations = self.views().iter().map(|v| v.calibration.as_ref()).collect::<Vec<&C>>();
        let measurements = self.measured();
        triangulate_views::<C,Z>(cameras, &calibrations, &measurements, &self.params.triangulation)
    }

    pub fn triangulate(&self, values: &Values) -> Result<TriangulationResult> {
        let cameras = self.cameras(values)?;
        Ok(self.triangulate_cameras(&cameras))
    }

    pub fn point(&self, values: &Values) -> Result<Option<Vector3<Float>>> {
        Ok(self.triangulate(values)?.point().copied())
    }

    pub fn compute_jacobians(&self, values: &Values, point: Option<&Vector3<Float>>) -> Result<LinearizedViews<Z>> {
        compute_jacobians_and_correct_for_missing_measurements(self.views(), values, point)
    }

    /**
     * Whitened reprojection error 0.5*|W*r|^2 at the triangulated landmark.
     * Zero if the landmark can not be triangulated.
     */
    pub fn error(&self, values: &Values) -> Result<Float> {
        let point = match self.triangulate(values)? {
            TriangulationResult::Valid(point) => point,
            result => {
                debug!("error: triangulation {}, factor contributes no error", result);
                return Ok(0.0);
            }
        };
        let b = compute_residuals(self.views(), values, &point)?;
        Ok(0.5*self.noise_model.whiten_stacked(&b).norm_squared())
    }

    pub fn linearize(&self, values: &Values) -> Result<HessianFactor> {
        self.linearize_damped(values, 0.0, false)
    }

    /**
     * Linearizes with the Levenberg-Marquardt damping lambda applied to the landmark covariance
     */
    pub fn linearize_damped(&self, values: &Values, lambda: Float, diagonal_damping: bool) -> Result<HessianFactor> {
        let strategy = self.params.linearization_mode.strategy::<C,Z>()?;
        strategy(self, values, lambda, diagonal_damping)
    }

    pub fn equals(&self, other: &SmartProjectionFactor<C,Z>, tol: Float) -> bool {
        self.noise_model == other.noise_model
            && self.params == other.params
            && self.keys() == other.keys()
            && self.len() == other.len()
            && self.views().iter().zip(other.views().iter()).all(|(a,b)|
                a.body_key == b.body_key
                && a.extrinsic_key == b.extrinsic_key
                && measurements_equal(&a.measurement, &b.measurement, tol)
                && a.calibration.equals(&b.calibration, tol))
    }
}

fn measurements_equal<const Z: usize>(a: &SVector<Float,Z>, b: &SVector<Float,Z>, tol: Float) -> bool {
    a.iter().zip(b.iter()).all(|(x,y)| match (x.is_nan(), y.is_nan()) {
        (true,true) => true,
        (false,false) => (x - y).abs() <= tol,
        _ => false
    })
}

