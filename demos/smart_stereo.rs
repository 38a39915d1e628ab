extern crate nalgebra as na;

use std::sync::Arc;
use color_eyre::eyre::Result;
use log::info;
use rand::{SeedableRng,rngs::StdRng};
use rand_distr::{Distribution,Normal};
use na::{Vector3,Isometry3,UnitQuaternion,Translation3};
use smart_factor::{Float,symbol};
use smart_factor::numerics::noise_model::NoiseModel;
use smart_factor::sensors::camera::{project,stereo::StereoCalibration};
use smart_factor::sfm::values::Values;
use smart_factor::sfm::smart_factor::{SmartStereoProjectionFactor,params::SmartFactorParams};

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let pixel_noise = Normal::new(0.0, 0.5)?;
    let calibration = Arc::new(StereoCalibration::new(500.0, 500.0, 0.0, 320.0, 240.0, 0.2));
    let landmark = Vector3::<Float>::new(0.3, -0.2, 6.0);

    // rig mounted with a small offset on the body, shared by all views
    let extrinsic_key = symbol('e', 0);
    let extrinsic = Isometry3::<Float>::from_parts(Translation3::new(0.05, 0.0, 0.1), UnitQuaternion::identity());

    let mut values = Values::new();
    values.insert(extrinsic_key, extrinsic);

    let mut factor = SmartStereoProjectionFactor::new(NoiseModel::isotropic(1.0), SmartFactorParams::default())?;
    for i in 0..4 {
        let body_key = symbol('x', i);
        let body = Isometry3::<Float>::from_parts(
            Translation3::new(0.4*i as Float, 0.05*i as Float, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.02*i as Float, 0.0));
        values.insert(body_key, body);

        let clean = match project::<_,3>(calibration.as_ref(), &(body*extrinsic), &landmark) {
            Some(m) => m,
            None => continue
        };
        let mut measurement = clean;
        let noise_u = pixel_noise.sample(&mut rng);
        let noise_v = pixel_noise.sample(&mut rng);
        measurement[0] += noise_u;
        measurement[1] += noise_u;
        measurement[2] += noise_v;
        if i == 3 {
            // right image lost the feature
            measurement[1] = Float::NAN;
        }
        factor.add(measurement, body_key, extrinsic_key, calibration.clone());
    }

    info!("factor with {} views over {} keys", factor.len(), factor.keys().len());
    println!("triangulated: {}", factor.triangulate(&values)?);
    println!("error: {}", factor.error(&values)?);

    let linear = factor.linearize(&values)?;
    println!("block dims: {:?}", linear.dims());
    println!("constant term: {}", linear.constant_term());
    println!("information diagonal: {}", linear.information().diagonal().transpose());

    let damped = factor.linearize_damped(&values, 1.0, true)?;
    println!("damped constant term: {}", damped.constant_term());

    Ok(())
}
