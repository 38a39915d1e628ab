extern crate nalgebra as na;

use na::{DMatrix,DVector,Matrix3,SMatrix,SVector,Vector3};
use crate::numerics::symmetric_block_matrix::SymmetricBlockMatrix;
use crate::linear::hessian_factor::{HessianFactor,POSE_DIM};
use crate::sfm::smart_factor::jacobians::{VIEW_PARAM_SIZE,POINT_PARAM_SIZE};
use crate::Float;

/**
 * Covariance of the marginalized landmark P = (E'E + lambda*D)^-1, with D = diag(E'E) for diagonal damping and I otherwise.
 * None if the damped system is singular.
 */
pub fn compute_point_covariance(e: &DMatrix<Float>, lambda: Float, diagonal_damping: bool) -> Option<Matrix3<Float>> {
    let ete: Matrix3<Float> = (e.transpose()*e).fixed_view::<POINT_PARAM_SIZE,POINT_PARAM_SIZE>(0,0).into_owned();
    let damping = match diagonal_damping {
        true => Matrix3::<Float>::from_diagonal(&ete.diagonal()),
        false => Matrix3::<Float>::identity()
    };
    (ete + damping*lambda).try_inverse()
}

/**
 * Eliminates the landmark from the normal equations of [F | E] x = b.
 * The result is indexed by the per view slots [body_0, extrinsic_0, body_1, ...] followed by the augmented scalar slot:
 *  H = F'F - F'E P E'F
 *  g = F'b - F'E P E'b
 *  f = b'b - b'E P E'b
 */
#[allow(non_snake_case)]
pub fn schur_complement<const Z: usize>(fs: &[SMatrix<Float,Z,VIEW_PARAM_SIZE>], e: &DMatrix<Float>, p: &Matrix3<Float>, b: &DVector<Float>) -> SymmetricBlockMatrix {
    let n_views = fs.len();
    let n_slots = 2*n_views;
    let mut augmented = SymmetricBlockMatrix::zeros(&HessianFactor::augmented_dims(n_slots));

    let d: Vector3<Float> = (e.transpose()*b).fixed_rows::<POINT_PARAM_SIZE>(0).into_owned();
    let e_block = |i: usize| -> SMatrix<Float,Z,POINT_PARAM_SIZE> { e.fixed_view::<Z,POINT_PARAM_SIZE>(Z*i,0).into_owned() };

    for i in 0..n_views {
        let F_i = &fs[i];
        let E_i = e_block(i);
        let E_i_P = E_i*p;
        let b_i: SVector<Float,Z> = b.fixed_rows::<Z>(Z*i).into_owned();

        let g_i = F_i.transpose()*(b_i - E_i_P*d);
        augmented.set_off_diagonal_block(2*i, n_slots, &g_i.fixed_rows::<POSE_DIM>(0));
        augmented.set_off_diagonal_block(2*i+1, n_slots, &g_i.fixed_rows::<POSE_DIM>(POSE_DIM));

        let H_ii = F_i.transpose()*(F_i - E_i_P*(E_i.transpose()*F_i));
        augmented.set_diagonal_block(2*i, &H_ii.fixed_view::<POSE_DIM,POSE_DIM>(0,0));
        augmented.set_off_diagonal_block(2*i, 2*i+1, &H_ii.fixed_view::<POSE_DIM,POSE_DIM>(0,POSE_DIM));
        augmented.set_diagonal_block(2*i+1, &H_ii.fixed_view::<POSE_DIM,POSE_DIM>(POSE_DIM,POSE_DIM));

        for j in (i+1)..n_views {
            let F_j = &fs[j];
            let E_j = e_block(j);
            let H_ij = -F_i.transpose()*(E_i_P*(E_j.transpose()*F_j));
            for &(r,c) in [(0usize,0usize),(0,1),(1,0),(1,1)].iter() {
                augmented.set_off_diagonal_block(2*i+r, 2*j+c, &H_ij.fixed_view::<POSE_DIM,POSE_DIM>(POSE_DIM*r,POSE_DIM*c));
            }
        }
    }

    let f = b.norm_squared() - d.dot(&(p*d));
    augmented.set_diagonal_block(n_slots, &DMatrix::<Float>::from_element(1,1,f));
    augmented
}
