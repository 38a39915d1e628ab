extern crate nalgebra as na;

use na::{Vector3,Vector6,Matrix3,Matrix6,Matrix3x6,Isometry3,Translation3,UnitQuaternion};
use crate::numerics::lie::{adjoint,exp_se3,skew_symmetric};
use crate::Float;

pub fn from_parts(t: &Vector3<Float>, quat: &UnitQuaternion<Float>) -> Isometry3<Float> {
    Isometry3::<Float>::from_parts(Translation3::from(*t), *quat)
}

pub fn decomp(pose:&Isometry3<Float>) -> (Vector3<Float>,Matrix3<Float>) {
    (pose.translation.vector,pose.rotation.to_rotation_matrix().matrix().into_owned())
}

/**
 * Right perturbation: pose*exp(xi) with xi = [u,w]
 */
pub fn retract(pose: &Isometry3<Float>, xi: &Vector6<Float>) -> Isometry3<Float> {
    pose*exp_se3(xi)
}

/**
 * Composes the body pose with the body-to-camera extrinsic.
 * Returns the camera pose together with its derivatives w.r.t. the body pose and the extrinsic.
 */
pub fn compose_with_derivatives(body: &Isometry3<Float>, extrinsic: &Isometry3<Float>) -> (Isometry3<Float>, Matrix6<Float>, Matrix6<Float>) {
    let camera = body*extrinsic;
    (camera, adjoint(&extrinsic.inverse()), Matrix6::<Float>::identity())
}

/**
 * Expresses a world point in the frame of pose.
 * Returns the local point with its derivatives w.r.t. the pose and the world point.
 */
#[allow(non_snake_case)]
pub fn transform_to_with_derivatives(pose: &Isometry3<Float>, point: &Vector3<Float>) -> (Vector3<Float>, Matrix3x6<Float>, Matrix3<Float>) {
    let (t,R) = decomp(pose);
    let R_t = R.transpose();
    let q = R_t*(point - t);
    let mut d_pose = Matrix3x6::<Float>::zeros();
    d_pose.fixed_view_mut::<3,3>(0,0).copy_from(&(-Matrix3::<Float>::identity()));
    d_pose.fixed_view_mut::<3,3>(0,3).copy_from(&skew_symmetric(&q));
    (q, d_pose, R_t)
}

pub fn transform_to(pose: &Isometry3<Float>, point: &Vector3<Float>) -> Vector3<Float> {
    pose.inverse_transform_vector(&(point - pose.translation.vector))
}
