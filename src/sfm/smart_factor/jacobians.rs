extern crate nalgebra as na;

use na::{DMatrix,DVector,SMatrix,SVector,Vector3,Isometry3};
use crate::numerics::{invalid_components,pose::compose_with_derivatives};
use crate::sensors::camera::{Calibration,project,project_with_derivatives};
use crate::sfm::{values::Values,smart_factor::views::View};
use crate::{Error,Result,Float};

/**
 * Body pose block followed by extrinsic block
 */
pub const VIEW_PARAM_SIZE: usize = 12;
pub const POINT_PARAM_SIZE: usize = 3;

/**
 * Per view jacobians w.r.t. (body, extrinsic), the stacked landmark jacobian E and the stacked negative residual b
 */
#[derive(Debug,Clone)]
pub struct LinearizedViews<const Z: usize> {
    pub fs: Vec<SMatrix<Float,Z,VIEW_PARAM_SIZE>>,
    pub e: DMatrix<Float>,
    pub b: DVector<Float>
}

pub fn camera_pose<C, const Z: usize>(view: &View<C,Z>, values: &Values) -> Result<Isometry3<Float>> {
    let body = values.at(view.body_key)?;
    let extrinsic = values.at(view.extrinsic_key)?;
    Ok(body*extrinsic)
}

/**
 * Channels of the measurement marked as NaN carry no information: their rows and residual are zeroed
 */
fn correct_for_missing_measurement<const Z: usize>(measurement: &SVector<Float,Z>, f: &mut SMatrix<Float,Z,VIEW_PARAM_SIZE>, e: &mut SMatrix<Float,Z,POINT_PARAM_SIZE>, reprojection_error: &mut SVector<Float,Z>) -> () {
    for row in invalid_components(measurement) {
        f.row_mut(row).fill(0.0);
        e.row_mut(row).fill(0.0);
        reprojection_error[row] = 0.0;
    }
}

pub fn compute_jacobians_and_correct_for_missing_measurements<C, const Z: usize>(views: &[View<C,Z>], values: &Values, point: Option<&Vector3<Float>>) -> Result<LinearizedViews<Z>> where C: Calibration<Z> {
    let point = point.ok_or(Error::MissingLandmark)?;
    let n_views = views.len();
    let mut fs = Vec::<SMatrix<Float,Z,VIEW_PARAM_SIZE>>::with_capacity(n_views);
    let mut e = DMatrix::<Float>::zeros(Z*n_views,POINT_PARAM_SIZE);
    let mut b = DVector::<Float>::zeros(Z*n_views);

    for (i,view) in views.iter().enumerate() {
        let body = values.at(view.body_key)?;
        let extrinsic = values.at(view.extrinsic_key)?;
        let (camera, d_camera_d_body, d_camera_d_extrinsic) = compose_with_derivatives(body,extrinsic);
        let (estimated, d_projection_d_camera, mut e_i) = project_with_derivatives::<C,Z>(view.calibration.as_ref(), &camera, point).ok_or(Error::ProjectionFailed{view: i})?;
        let mut reprojection_error = estimated - view.measurement;

        let mut f_i = SMatrix::<Float,Z,VIEW_PARAM_SIZE>::zeros();
        f_i.fixed_view_mut::<Z,6>(0,0).copy_from(&(d_projection_d_camera*d_camera_d_body));
        f_i.fixed_view_mut::<Z,6>(0,6).copy_from(&(d_projection_d_camera*d_camera_d_extrinsic));
        correct_for_missing_measurement(&view.measurement, &mut f_i, &mut e_i, &mut reprojection_error);

        fs.push(f_i);
        b.fixed_rows_mut::<Z>(Z*i).copy_from(&(-reprojection_error));
        e.fixed_view_mut::<Z,POINT_PARAM_SIZE>(Z*i,0).copy_from(&e_i);
    }

    Ok(LinearizedViews{fs,e,b})
}

/**
 * Stacked negative residual without jacobians. Missing channels are zeroed as in the jacobian assembly.
 */
pub fn compute_residuals<C, const Z: usize>(views: &[View<C,Z>], values: &Values, point: &Vector3<Float>) -> Result<DVector<Float>> where C: Calibration<Z> {
    let mut b = DVector::<Float>::zeros(Z*views.len());
    for (i,view) in views.iter().enumerate() {
        let camera = camera_pose(view,values)?;
        let estimated = project::<C,Z>(view.calibration.as_ref(), &camera, point).ok_or(Error::ProjectionFailed{view: i})?;
        let mut reprojection_error = estimated - view.measurement;
        for row in invalid_components(&view.measurement) {
            reprojection_error[row] = 0.0;
        }
        b.fixed_rows_mut::<Z>(Z*i).copy_from(&(-reprojection_error));
    }
    Ok(b)
}
