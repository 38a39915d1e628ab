#![allow(dead_code)]
extern crate nalgebra as na;

use std::sync::Arc;
use std::collections::HashSet;
use rand::{SeedableRng,rngs::StdRng};
use rand_distr::{Distribution,Normal};
use na::{Vector3,Isometry3,UnitQuaternion};
use smart_factor::{Float,Key,symbol};
use smart_factor::numerics::{noise_model::NoiseModel,pose::from_parts};
use smart_factor::sensors::camera::{project,pinhole::Pinhole,stereo::StereoCalibration};
use smart_factor::sfm::values::Values;
use smart_factor::sfm::smart_factor::{SmartStereoProjectionFactor,SmartMonoProjectionFactor,params::SmartFactorParams};

pub fn stereo_calibration() -> Arc<StereoCalibration> {
    Arc::new(StereoCalibration::new(500.0, 500.0, 0.0, 320.0, 240.0, 0.2))
}

pub fn pinhole() -> Arc<Pinhole> {
    Arc::new(Pinhole::new(500.0, 500.0, 0.0, 320.0, 240.0))
}

pub fn landmark() -> Vector3<Float> {
    Vector3::<Float>::new(0.3, -0.2, 6.0)
}

pub fn body_key(i: u64) -> Key {
    symbol('x', i)
}

pub fn extrinsic_key(i: u64) -> Key {
    symbol('e', i)
}

pub fn body_pose(i: u64) -> Isometry3<Float> {
    let s = i as Float;
    from_parts(&Vector3::<Float>::new(0.5*s, 0.1*s, -0.2*s), &UnitQuaternion::from_euler_angles(0.01*s, 0.03*s, -0.02*s))
}

pub fn extrinsic_pose(i: u64) -> Isometry3<Float> {
    let s = i as Float;
    from_parts(&Vector3::<Float>::new(0.05 + 0.3*s, 0.02, 0.1*s), &UnitQuaternion::from_euler_angles(-0.01*s, 0.02, 0.01*s))
}

/**
 * Values holding every body and extrinsic pose referenced by the (body, extrinsic) index pairs
 */
pub fn values_for(views: &[(u64,u64)]) -> Values {
    let mut values = Values::new();
    let bodies = views.iter().map(|(b,_)| *b).collect::<HashSet<u64>>();
    let extrinsics = views.iter().map(|(_,e)| *e).collect::<HashSet<u64>>();
    for b in bodies {
        values.insert(body_key(b), body_pose(b));
    }
    for e in extrinsics {
        values.insert(extrinsic_key(e), extrinsic_pose(e));
    }
    values
}

pub fn stereo_factor(views: &[(u64,u64)], noise_model: NoiseModel, pixel_sigma: Float, seed: u64) -> (SmartStereoProjectionFactor, Values) {
    let values = values_for(views);
    let calibration = stereo_calibration();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut factor = SmartStereoProjectionFactor::new(noise_model, SmartFactorParams::default()).expect("valid factor");
    for &(b,e) in views {
        let camera = body_pose(b)*extrinsic_pose(e);
        let mut measurement = project::<_,3>(calibration.as_ref(), &camera, &landmark()).expect("landmark in front of camera");
        if pixel_sigma > 0.0 {
            let normal = Normal::new(0.0, pixel_sigma).expect("valid sigma");
            for i in 0..3 {
                measurement[i] += normal.sample(&mut rng);
            }
        }
        factor.add(measurement, body_key(b), extrinsic_key(e), calibration.clone());
    }
    (factor, values)
}

pub fn mono_factor(views: &[(u64,u64)], point: &Vector3<Float>) -> (SmartMonoProjectionFactor, Values) {
    let values = values_for(views);
    let calibration = pinhole();
    let mut factor = SmartMonoProjectionFactor::new(NoiseModel::Unit, SmartFactorParams::default()).expect("valid factor");
    for &(b,e) in views {
        let camera = body_pose(b)*extrinsic_pose(e);
        let measurement = project::<_,2>(calibration.as_ref(), &camera, point).expect("landmark in front of camera");
        factor.add(measurement, body_key(b), extrinsic_key(e), calibration.clone());
    }
    (factor, values)
}
