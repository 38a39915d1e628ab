extern crate nalgebra as na;

use log::{debug,trace};
use na::{Vector2,Vector3,Matrix3,Matrix3x4,MatrixXx4,RowVector4,Isometry3};
use crate::numerics::{max_norm,pose::transform_to};
use crate::sensors::camera::{Calibration,project,project_with_derivatives,pinhole::Pinhole};
use crate::Float;

pub mod parameters;

pub use parameters::{TriangulationParameters,TriangulationResult};

const REFINEMENT_STEP_EPS: Float = 1e-10;
const SVD_MAX_ITERATIONS: usize = 100;

/**
 * World to image projection K*[R^T | -R^T*t] of a camera with world pose (R,t)
 */
#[allow(non_snake_case)]
pub fn projection_matrix(pose: &Isometry3<Float>, intrinsics: &Pinhole) -> Matrix3x4<Float> {
    let world_to_cam = pose.inverse().to_homogeneous();
    intrinsics.get_projection()*world_to_cam.fixed_view::<3,4>(0,0)
}

/**
 * Linear Triangulation, see Triangulation by Hartley et al.
 * Returns None if the homogeneous system has rank < 3, is not finite, the SVD does not converge or the solution lies at infinity.
 */
#[allow(non_snake_case)]
pub fn triangulate_dlt(poses: &[Isometry3<Float>], intrinsics: &[&Pinhole], measurements: &[Vector2<Float>], rank_tolerance: Float) -> Option<Vector3<Float>> {
    assert_eq!(poses.len(),measurements.len());
    assert_eq!(poses.len(),intrinsics.len());
    let n_cams = poses.len();
    let mut A = MatrixXx4::<Float>::zeros(2*n_cams);
    for j in 0..n_cams {
        let P = projection_matrix(&poses[j],intrinsics[j]);
        let u = measurements[j][0];
        let v = measurements[j][1];
        let row_u: RowVector4<Float> = u*P.row(2) - P.row(0);
        let row_v: RowVector4<Float> = v*P.row(2) - P.row(1);
        A.fixed_rows_mut::<1>(2*j).copy_from(&row_u);
        A.fixed_rows_mut::<1>(2*j+1).copy_from(&row_v);
    }

    if !A.iter().all(|a| a.is_finite()) {
        trace!("triangulate_dlt: non finite system");
        return None;
    }

    let svd = A.try_svd(false,true,Float::EPSILON,SVD_MAX_ITERATIONS)?;
    let rank = svd.singular_values.iter().filter(|&&s| s > rank_tolerance).count();
    if rank < 3 {
        trace!("triangulate_dlt: rank {} below 3", rank);
        return None;
    }

    let v_t = svd.v_t?;
    let (min_idx,_) = svd.singular_values.iter().enumerate().fold((0,Float::MAX), |(idx,min),(i,&s)| match s < min {
        true => (i,s),
        false => (idx,min)
    });
    let p = v_t.row(min_idx);
    match p[3] {
        w if w.abs() > Float::EPSILON => Some(Vector3::<Float>::new(p[0]/w,p[1]/w,p[2]/w)),
        _ => None
    }
}

/**
 * Gauss-Newton refinement of a point over the monocular reprojection error. Bounded by max_iterations.
 */
#[allow(non_snake_case)]
pub fn refine_point(poses: &[Isometry3<Float>], intrinsics: &[&Pinhole], measurements: &[Vector2<Float>], initial: &Vector3<Float>, max_iterations: usize) -> Vector3<Float> {
    let mut point = initial.clone();
    for it in 0..max_iterations {
        let mut H = Matrix3::<Float>::zeros();
        let mut g = Vector3::<Float>::zeros();
        for j in 0..poses.len() {
            match project_with_derivatives::<_,2>(intrinsics[j], &poses[j], &point) {
                Some((estimated, _, E)) => {
                    let residual = measurements[j] - estimated;
                    H += E.transpose()*E;
                    g += E.transpose()*residual;
                },
                None => return point
            };
        }
        let delta = match H.cholesky() {
            Some(chol) => chol.solve(&g),
            None => return point
        };
        point += delta;
        if max_norm(&delta) < REFINEMENT_STEP_EPS {
            trace!("refine_point: converged after {} iterations", it+1);
            break;
        }
    }
    point
}

/**
 * Triangulates and classifies the estimate. Fewer than two views, a rank deficient system, points behind a camera,
 * far points and outliers (as configured by the parameters) are reported instead of returned.
 */
pub fn triangulate_safe(poses: &[Isometry3<Float>], intrinsics: &[&Pinhole], measurements: &[Vector2<Float>], params: &TriangulationParameters) -> TriangulationResult {
    if poses.len() < 2 {
        return TriangulationResult::Degenerate;
    }

    let linear = match triangulate_dlt(poses,intrinsics,measurements,params.rank_tolerance) {
        Some(p) => p,
        None => return TriangulationResult::Degenerate
    };
    let point = match params.enable_epi {
        true => refine_point(poses,intrinsics,measurements,&linear,params.max_refinement_iterations),
        false => linear
    };

    let mut max_reprojection_error: Float = 0.0;
    for j in 0..poses.len() {
        let pose = &poses[j];
        if params.landmark_distance_threshold > 0.0 && (pose.translation.vector - point).norm() > params.landmark_distance_threshold {
            return TriangulationResult::FarPoint;
        }
        if transform_to(pose,&point)[2] <= 0.0 {
            return TriangulationResult::BehindCamera;
        }
        if params.dynamic_outlier_rejection_threshold > 0.0 {
            let reprojection_error = match project::<_,2>(intrinsics[j],pose,&point) {
                Some(estimated) => (estimated - measurements[j]).norm(),
                None => return TriangulationResult::BehindCamera
            };
            max_reprojection_error = max_reprojection_error.max(reprojection_error);
        }
    }

    if params.dynamic_outlier_rejection_threshold > 0.0 && max_reprojection_error > params.dynamic_outlier_rejection_threshold {
        debug!("triangulate_safe: max reprojection error {} exceeds {}", max_reprojection_error, params.dynamic_outlier_rejection_threshold);
        return TriangulationResult::Outlier;
    }

    TriangulationResult::Valid(point)
}

/**
 * Triangulates from views of any calibration model through the monocular cameras each view provides.
 * Channels that are missing in a measurement do not take part.
 */
pub fn triangulate_views<C, const Z: usize>(poses: &[Isometry3<Float>], calibrations: &[&C], measurements: &[na::SVector<Float,Z>], params: &TriangulationParameters) -> TriangulationResult where C: Calibration<Z> {
    assert_eq!(poses.len(),measurements.len());
    assert_eq!(poses.len(),calibrations.len());
    let mut mono_poses = Vec::<Isometry3<Float>>::with_capacity(2*poses.len());
    let mut intrinsics = Vec::<&Pinhole>::with_capacity(2*poses.len());
    let mut monocular = Vec::<Vector2<Float>>::with_capacity(2*poses.len());
    for j in 0..poses.len() {
        for (pose, measurement) in calibrations[j].monocular_cameras(&poses[j], &measurements[j]) {
            mono_poses.push(pose);
            intrinsics.push(calibrations[j].intrinsics());
            monocular.push(measurement);
        }
    }
    trace!("triangulate_views: {} monocular cameras from {} views", mono_poses.len(), poses.len());
    triangulate_safe(&mono_poses,&intrinsics,&monocular,params)
}
