extern crate nalgebra as na;

mod common;

use std::collections::HashMap;
use approx::assert_relative_eq;
use na::{Matrix3,Vector3,Vector6};
use smart_factor::{Error,Float,symbol};
use smart_factor::numerics::pose::{decomp,retract};
use smart_factor::sensors::camera::{pinhole::Pinhole,stereo::StereoCalibration,Calibration};
use common::{body_key,body_pose,extrinsic_key,extrinsic_pose,values_for};

#[test]
fn retract_only_moves_perturbed_variables() {
    let values = values_for(&[(0,0),(1,0)]);
    assert_eq!(values.len(), 3);
    assert!(values.contains(body_key(1)));
    assert!(!values.contains(body_key(2)));
    assert!(!values.is_empty());

    let xi = Vector6::<Float>::new(0.1,0.0,-0.1,0.01,0.0,0.02);
    let mut deltas = HashMap::new();
    deltas.insert(body_key(1), xi);
    let retracted = values.retract(&deltas);

    assert_eq!(retracted.keys(), values.keys());
    assert_eq!(retracted.at(body_key(0)).unwrap(), &body_pose(0));
    assert_eq!(retracted.at(extrinsic_key(0)).unwrap(), &extrinsic_pose(0));
    assert_relative_eq!(retracted.at(body_key(1)).unwrap().to_homogeneous(), retract(&body_pose(1),&xi).to_homogeneous(), epsilon = 1e-15);
    assert!(matches!(values.at(body_key(7)), Err(Error::MissingVariable(_))));
}

#[test]
fn symbols_separate_characters_and_indices() {
    assert_ne!(symbol('x',1), symbol('e',1));
    assert_ne!(symbol('x',1), symbol('x',2));
    assert_eq!(symbol('x',3) & 0xff, 3);
}

#[test]
fn decomposition_of_a_pose() {
    let pose = body_pose(2);
    let (t, r) = decomp(&pose);
    assert_eq!(t, pose.translation.vector);
    assert_relative_eq!(r*r.transpose(), Matrix3::<Float>::identity(), epsilon = 1e-12);
}

#[test]
fn calibrations_compare_within_tolerance() {
    let k = Matrix3::<Float>::new(500.0, 0.5, 320.0, 0.0, 510.0, 240.0, 0.0, 0.0, 1.0);
    let pinhole = Pinhole::from_matrix(&k);
    assert_eq!(pinhole.get_projection(), k);
    assert_eq!((pinhole.get_fx(),pinhole.get_fy(),pinhole.get_s()), (500.0,510.0,0.5));
    assert_eq!((pinhole.get_cx(),pinhole.get_cy()), (320.0,240.0));

    let stereo = StereoCalibration::new(500.0, 510.0, 0.5, 320.0, 240.0, 0.12);
    let wider = StereoCalibration::new(500.0, 510.0, 0.5, 320.0, 240.0, 0.13);
    assert_eq!(stereo.get_baseline(), 0.12);
    assert_eq!(stereo.intrinsics(), &pinhole);
    assert!(stereo.equals(&stereo, 1e-12));
    assert!(!stereo.equals(&wider, 1e-3));
    assert!(stereo.equals(&wider, 0.1));
    assert!(stereo.project(&Vector3::<Float>::new(0.0,0.0,2.0)).is_some());
}
