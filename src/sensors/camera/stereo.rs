extern crate nalgebra as na;

use serde::{Serialize, Deserialize};
use na::{Vector2,Vector3,Matrix3,Isometry3,Translation3,UnitQuaternion};
use crate::sensors::camera::{Calibration,pinhole::Pinhole};
use crate::Float;

/**
 * Rectified stereo rig: the left camera's intrinsics plus the baseline to the right camera.
 * Measurements are ordered (u_left, u_right, v).
 */
#[derive(Debug,Copy,Clone,PartialEq,Serialize,Deserialize)]
pub struct StereoCalibration {
    pinhole: Pinhole,
    baseline: Float
}

impl StereoCalibration {
    pub fn new(fx: Float, fy: Float, s: Float, cx: Float, cy: Float, baseline: Float) -> StereoCalibration {
        StereoCalibration{pinhole: Pinhole::new(fx,fy,s,cx,cy), baseline}
    }

    pub fn get_baseline(&self) -> Float {
        self.baseline
    }
}

impl Calibration<3> for StereoCalibration {

    fn project(&self, position: &Vector3<Float>) -> Option<Vector3<Float>> {
        let left = self.pinhole.project(position)?;
        let disparity = self.pinhole.get_fx()*self.baseline/position[2];
        Some(Vector3::<Float>::new(left[0], left[0] - disparity, left[1]))
    }

    fn get_jacobian_with_respect_to_position_in_camera_frame(&self, position: &Vector3<Float>) -> Option<Matrix3<Float>> {
        let left = self.pinhole.get_jacobian_with_respect_to_position_in_camera_frame(position)?;
        let z = position[2];
        let mut jacobian = Matrix3::<Float>::zeros();
        jacobian.fixed_view_mut::<1,3>(0,0).copy_from(&left.fixed_view::<1,3>(0,0));
        jacobian.fixed_view_mut::<1,3>(1,0).copy_from(&left.fixed_view::<1,3>(0,0));
        jacobian[(1,2)] += self.pinhole.get_fx()*self.baseline/z.powi(2);
        jacobian.fixed_view_mut::<1,3>(2,0).copy_from(&left.fixed_view::<1,3>(1,0));
        Some(jacobian)
    }

    fn intrinsics(&self) -> &Pinhole {
        &self.pinhole
    }

    fn monocular_measurement(measurement: &Vector3<Float>) -> Vector2<Float> {
        Vector2::<Float>::new(measurement[0], measurement[2])
    }

    /**
     * The left camera observes (uL, v). The right camera sits at the baseline along the left camera's x axis and observes (uR, v).
     */
    fn monocular_cameras(&self, camera_pose: &Isometry3<Float>, measurement: &Vector3<Float>) -> Vec<(Isometry3<Float>, Vector2<Float>)> {
        let (u_left, u_right, v) = (measurement[0], measurement[1], measurement[2]);
        if !v.is_finite() {
            return vec![];
        }
        let mut cameras = Vec::<(Isometry3<Float>, Vector2<Float>)>::with_capacity(2);
        if u_left.is_finite() {
            cameras.push((*camera_pose, Vector2::<Float>::new(u_left, v)));
        }
        if u_right.is_finite() {
            let right_pose = camera_pose*Isometry3::<Float>::from_parts(Translation3::<Float>::new(self.baseline, 0.0, 0.0), UnitQuaternion::identity());
            cameras.push((right_pose, Vector2::<Float>::new(u_right, v)));
        }
        cameras
    }

    fn equals(&self, other: &StereoCalibration, tol: Float) -> bool {
        self.pinhole.equals(&other.pinhole, tol) && (self.baseline - other.baseline).abs() <= tol
    }
}
