extern crate nalgebra as na;

use std::collections::HashMap;
use approx::assert_relative_eq;
use rand::{Rng,SeedableRng,rngs::StdRng};
use na::{DMatrix,DVector,Matrix6,Vector6,Matrix6x3};
use smart_factor::{Float,Key};
use smart_factor::numerics::symmetric_block_matrix::SymmetricBlockMatrix;
use smart_factor::linear::HessianFactor;
use smart_factor::sfm::smart_factor::packing::pack_unique_keys;

fn random_symmetric(rng: &mut StdRng, n: usize) -> DMatrix<Float> {
    let r = DMatrix::<Float>::from_fn(n, n, |_,_| rng.gen_range(-1.0..1.0));
    &r + r.transpose()
}

/**
 * Selection matrix mapping the unique key layout onto the per view layout, scalar slot included
 */
fn selection(nonunique_keys: &[Key], unique_keys: &[Key]) -> DMatrix<Float> {
    let n = nonunique_keys.len();
    let m = unique_keys.len();
    let mut s = DMatrix::<Float>::zeros(6*n+1, 6*m+1);
    for (k,key) in nonunique_keys.iter().enumerate() {
        let u = unique_keys.iter().position(|x| x == key).expect("key present");
        s.view_mut((6*k,6*u),(6,6)).fill_with_identity();
    }
    s[(6*n,6*m)] = 1.0;
    s
}

fn assert_packing_matches_selection(nonunique_keys: &[Key], unique_keys: &[Key], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let dims = HessianFactor::augmented_dims(nonunique_keys.len());
    let dense = random_symmetric(&mut rng, 6*nonunique_keys.len()+1);
    let augmented = SymmetricBlockMatrix::from_self_adjoint(&dims, dense.clone());

    let packed = pack_unique_keys(augmented, nonunique_keys, unique_keys);
    let s = selection(nonunique_keys, unique_keys);
    let expected = s.transpose()*&dense*&s;

    assert_eq!(packed.n_blocks(), unique_keys.len()+1);
    assert_relative_eq!(packed.self_adjoint_view(), expected, epsilon = 1e-12);
}

#[test]
fn zeros_has_requested_layout() {
    let m = SymmetricBlockMatrix::zeros(&[6,6,1]);
    assert_eq!(m.n_blocks(), 3);
    assert_eq!(m.rows(), 13);
    assert_eq!(m.block_offset(2), 12);
    assert_eq!(m.block_dim(2), 1);
    assert!(m.is_zero());
}

#[test]
fn off_diagonal_update_below_diagonal_adds_transpose() {
    let mut m = SymmetricBlockMatrix::zeros(&[6,3]);
    let block = Matrix6x3::<Float>::from_fn(|r,c| (r*3+c) as Float);
    m.update_off_diagonal_block(0,1,&block);
    m.update_off_diagonal_block(1,0,&block.transpose());
    assert_eq!(m.above_diagonal_block(0,1), DMatrix::<Float>::from_fn(6,3,|r,c| 2.0*block[(r,c)]));

    let full = m.self_adjoint_view();
    assert_eq!(full.view((6,0),(3,6)).into_owned(), full.view((0,6),(6,3)).transpose());
}

#[test]
fn diagonal_block_is_mirrored_from_upper_triangle() {
    let mut m = SymmetricBlockMatrix::zeros(&[6]);
    let mut upper = Matrix6::<Float>::zeros();
    for r in 0..6 {
        for c in r..6 {
            upper[(r,c)] = (1 + r + c) as Float;
        }
    }
    m.set_diagonal_block(0,&upper);
    let d = m.diagonal_block(0);
    assert_eq!(d.clone(), d.transpose());
    assert_eq!(d[(4,1)], upper[(1,4)]);
}

#[test]
fn packing_without_shared_keys_is_identity() {
    let keys: Vec<Key> = vec![10,11,12,13];
    let mut rng = StdRng::seed_from_u64(1);
    let dense = random_symmetric(&mut rng, 25);
    let augmented = SymmetricBlockMatrix::from_self_adjoint(&HessianFactor::augmented_dims(4), dense.clone());
    let packed = pack_unique_keys(augmented, &keys, &keys);
    assert_eq!(packed.self_adjoint_view(), dense);
}

#[test]
fn packing_shared_body_key() {
    // two views on the same body pose with different extrinsics
    assert_packing_matches_selection(&[1,2,1,3], &[1,2,3], 2);
}

#[test]
fn packing_is_independent_of_slot_order() {
    // the shared keys appear in reversed order relative to their unique slots
    assert_packing_matches_selection(&[1,2,2,1], &[1,2], 3);
    assert_packing_matches_selection(&[1,2,3,1,3,2], &[1,2,3], 4);
    assert_packing_matches_selection(&[5,7,6,5,7,6,5,5], &[5,7,6], 5);
}

#[test]
fn packing_accumulates_linear_terms() {
    let nonunique: Vec<Key> = vec![1,2,1,3];
    let unique: Vec<Key> = vec![1,2,3];
    let mut rng = StdRng::seed_from_u64(6);
    let dense = random_symmetric(&mut rng, 25);
    let augmented = SymmetricBlockMatrix::from_self_adjoint(&HessianFactor::augmented_dims(4), dense.clone());
    let packed = pack_unique_keys(augmented, &nonunique, &unique);
    let g_shared = packed.above_diagonal_block(0,3);
    let expected = dense.view((0,24),(6,1)) + dense.view((12,24),(6,1));
    assert_relative_eq!(g_shared, expected, epsilon = 1e-12);
    assert_eq!(packed.diagonal_block(3)[(0,0)], dense[(24,24)]);
}

#[test]
fn hessian_factor_error_is_the_quadratic_it_stores() {
    let mut rng = StdRng::seed_from_u64(8);
    let j = DMatrix::<Float>::from_fn(9, 12, |_,_| rng.gen_range(-1.0..1.0));
    let r = DVector::<Float>::from_fn(9, |_,_| rng.gen_range(-1.0..1.0));
    let mut jr = DMatrix::<Float>::zeros(9,13);
    jr.view_mut((0,0),(9,12)).copy_from(&j);
    jr.view_mut((0,12),(9,1)).copy_from(&r);
    let keys: Vec<Key> = vec![100,200];
    let factor = HessianFactor::new(keys.clone(), SymmetricBlockMatrix::from_self_adjoint(&HessianFactor::augmented_dims(2), jr.transpose()*&jr));

    let x0 = Vector6::<Float>::new(0.1,-0.2,0.3,0.01,0.02,-0.03);
    let x1 = Vector6::<Float>::new(-0.4,0.0,0.2,0.05,-0.01,0.0);
    let mut delta = HashMap::new();
    delta.insert(100, x0);
    delta.insert(200, x1);
    let mut x = DVector::<Float>::zeros(12);
    x.rows_mut(0,6).copy_from(&x0);
    x.rows_mut(6,6).copy_from(&x1);

    assert_relative_eq!(factor.error(&delta), 0.5*(&j*&x - &r).norm_squared(), epsilon = 1e-12);
    assert_relative_eq!(factor.error(&HashMap::new()), 0.5*r.norm_squared(), epsilon = 1e-12);
    assert_relative_eq!(factor.constant_term(), r.norm_squared(), epsilon = 1e-12);
    assert_relative_eq!(factor.linear_term(), j.transpose()*&r, epsilon = 1e-12);
    assert_eq!(factor.dims(), &vec![6,6,1]);
}

#[test]
fn zero_factor_has_no_information() {
    let factor = HessianFactor::zero(vec![1,2,3]);
    assert!(factor.is_zero());
    assert_eq!(factor.augmented_information().shape(), (19,19));
    assert_eq!(factor.error(&HashMap::new()), 0.0);
}
