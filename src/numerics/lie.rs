extern crate nalgebra as na;

use na::{Vector,Vector3,Vector6,Matrix3,Matrix6,Isometry3,Translation3,UnitQuaternion,U3,U1,base::storage::Storage};
use crate::Float;

const SMALL_ANGLE_EPS: Float = 1e-8;

pub fn skew_symmetric<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1>  {
    Matrix3::<Float>::new(0.0, -w[2], w[1],
                          w[2], 0.0, -w[0],
                          -w[1], w[0], 0.0)
}

pub fn vector_from_skew_symmetric(w_x: &Matrix3<Float>) -> Vector3<Float> {
    Vector3::<Float>::new(w_x[(2,1)],w_x[(0,2)],w_x[(1,0)])
}

/**
 * Coefficients A = sin(θ)/θ, B = (1-cos(θ))/θ², C = (1-A)/θ² of the SO3/SE3 exponential.
 * Falls back to the Taylor series close to the identity.
 */
#[allow(non_snake_case)]
fn exp_coefficients(omega: Float) -> (Float,Float,Float) {
    let omega_sqr = omega.powi(2);
    match omega {
        o if o < SMALL_ANGLE_EPS.sqrt() => (1.0 - omega_sqr/6.0, 0.5 - omega_sqr/24.0, 1.0/6.0 - omega_sqr/120.0),
        _ => {
            let A = omega.sin()/omega;
            let B = (1.0 - omega.cos())/omega_sqr;
            let C = (1.0 - A)/omega_sqr;
            (A,B,C)
        }
    }
}

pub fn exp_r<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1> {
    let omega = w.norm();
    let (a,b,_) = exp_coefficients(omega);
    let w_x = skew_symmetric(w);
    Matrix3::<Float>::identity() + a*w_x + b*w_x*w_x
}

/**
 * Exponential map of se3 with tangent ordered as [u,w]: translation first, rotation second
 */
#[allow(non_snake_case)]
pub fn exp<T>(u: &Vector<Float,U3,T>, w: &Vector<Float,U3,T>) -> Isometry3<Float> where T: Storage<Float,U3,U1> {
    let omega = w.norm();
    let (_,B,C) = exp_coefficients(omega);
    let w_x = skew_symmetric(w);
    let V = Matrix3::<Float>::identity() + B*w_x + C*w_x*w_x;
    let t = V*u;
    Isometry3::<Float>::from_parts(Translation3::from(t), UnitQuaternion::<Float>::from_scaled_axis(w.clone_owned()))
}

pub fn exp_se3(xi: &Vector6<Float>) -> Isometry3<Float> {
    exp(&xi.fixed_rows::<3>(0).into_owned(), &xi.fixed_rows::<3>(3).into_owned())
}

/**
 * Adjoint of a pose for the [u,w] tangent ordering: T*exp(xi)*T^-1 = exp(Ad_T*xi)
 */
#[allow(non_snake_case)]
pub fn adjoint(pose: &Isometry3<Float>) -> Matrix6<Float> {
    let R = pose.rotation.to_rotation_matrix().into_inner();
    let t_x = skew_symmetric(&pose.translation.vector);
    let mut Ad = Matrix6::<Float>::zeros();
    Ad.fixed_view_mut::<3,3>(0,0).copy_from(&R);
    Ad.fixed_view_mut::<3,3>(0,3).copy_from(&(t_x*R));
    Ad.fixed_view_mut::<3,3>(3,3).copy_from(&R);
    Ad
}
