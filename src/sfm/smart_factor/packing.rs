use std::collections::HashMap;
use log::trace;
use crate::numerics::symmetric_block_matrix::SymmetricBlockMatrix;
use crate::linear::hessian_factor::HessianFactor;
use crate::Key;

/**
 * Collapses the per view block structure onto the unique keys of the factor.
 * Several per view slots may refer to the same variable (shared body pose or shared extrinsic),
 * their contributions are summed into the slot of that variable.
 */
pub fn pack_unique_keys(augmented: SymmetricBlockMatrix, nonunique_keys: &[Key], unique_keys: &[Key]) -> SymmetricBlockMatrix {
    let n_nonunique = nonunique_keys.len();
    let n_unique = unique_keys.len();
    assert_eq!(augmented.n_blocks(), n_nonunique+1, "pack_unique_keys: augmented matrix does not match the per view keys");

    if n_unique == n_nonunique {
        return augmented;
    }
    trace!("pack_unique_keys: folding {} view slots onto {} keys", n_nonunique, n_unique);

    let key_to_slot = unique_keys.iter().enumerate().map(|(slot,key)| (*key,slot)).collect::<HashMap<Key,usize>>();
    let slot_of = |key: &Key| -> usize { *key_to_slot.get(key).expect("pack_unique_keys: view key missing from unique keys") };
    let mut packed = SymmetricBlockMatrix::zeros(&HessianFactor::augmented_dims(n_unique));

    for i in 0..n_nonunique {
        let slot_i = slot_of(&nonunique_keys[i]);
        packed.update_off_diagonal_block(slot_i, n_unique, &augmented.above_diagonal_block(i, n_nonunique));

        for j in i..n_nonunique {
            let slot_j = slot_of(&nonunique_keys[j]);
            match (i == j, slot_i == slot_j) {
                (true,_) => packed.update_diagonal_block(slot_i, &augmented.diagonal_block(i)),
                (false,false) => packed.update_off_diagonal_block(slot_i, slot_j, &augmented.above_diagonal_block(i,j)),
                (false,true) => {
                    // both slots observe the same variable, the cross term lands on its diagonal
                    let cross = augmented.above_diagonal_block(i,j);
                    packed.update_diagonal_block(slot_i, &(&cross + cross.transpose()));
                }
            }
        }
    }
    packed.set_diagonal_block(n_unique, &augmented.diagonal_block(n_nonunique));
    packed
}
