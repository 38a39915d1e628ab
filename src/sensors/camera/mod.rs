extern crate nalgebra as na;

use std::fmt::Debug;
use std::sync::Arc;
use na::{Vector2,Vector3,SVector,SMatrix,Isometry3};
use crate::numerics::pose::transform_to_with_derivatives;
use crate::Float;

pub mod pinhole;
pub mod stereo;

use pinhole::Pinhole;

/**
 * Calibration objects are shared between views. Equality compares by value.
 */
pub type SharedCalibration<C> = Arc<C>;

/**
 * Intrinsic model mapping a point in the camera frame to a Z dimensional measurement
 */
pub trait Calibration<const Z: usize>: Debug + PartialEq + Send + Sync {
    fn project(&self, position: &Vector3<Float>) -> Option<SVector<Float,Z>>;
    fn get_jacobian_with_respect_to_position_in_camera_frame(&self, position: &Vector3<Float>) -> Option<SMatrix<Float,Z,3>>;
    /**
     * Monocular camera used for triangulation
     */
    fn intrinsics(&self) -> &Pinhole;
    fn monocular_measurement(measurement: &SVector<Float,Z>) -> Vector2<Float>;
    /**
     * Monocular cameras and their measurements that a view of this model contributes to triangulation.
     * Only channels with finite values are returned.
     */
    fn monocular_cameras(&self, camera_pose: &Isometry3<Float>, measurement: &SVector<Float,Z>) -> Vec<(Isometry3<Float>, Vector2<Float>)> {
        let monocular = Self::monocular_measurement(measurement);
        match monocular.iter().all(|m| m.is_finite()) {
            true => vec![(*camera_pose, monocular)],
            false => vec![]
        }
    }
    fn equals(&self, other: &Self, tol: Float) -> bool;
}

pub fn project<C, const Z: usize>(calibration: &C, camera_pose: &Isometry3<Float>, point: &Vector3<Float>) -> Option<SVector<Float,Z>> where C: Calibration<Z> {
    let position = camera_pose.inverse_transform_point(&(*point).into()).coords;
    calibration.project(&position)
}

/**
 * Projects a world point through a camera.
 * Returns the measurement with its derivatives w.r.t. the camera pose (Z x 6) and the point (Z x 3),
 * or None if the point does not lie in front of the camera.
 */
pub fn project_with_derivatives<C, const Z: usize>(calibration: &C, camera_pose: &Isometry3<Float>, point: &Vector3<Float>) -> Option<(SVector<Float,Z>, SMatrix<Float,Z,6>, SMatrix<Float,Z,3>)> where C: Calibration<Z> {
    let (position, d_position_d_pose, d_position_d_point) = transform_to_with_derivatives(camera_pose, point);
    let measurement = calibration.project(&position)?;
    let d_projection = calibration.get_jacobian_with_respect_to_position_in_camera_frame(&position)?;
    Some((measurement, d_projection*d_position_d_pose, d_projection*d_position_d_point))
}
