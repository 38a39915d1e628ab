extern crate nalgebra as na;

use std::collections::HashMap;
use na::{Isometry3,Vector6};
use crate::numerics::pose::retract;
use crate::{Error,Result,Key,Float};

/**
 * Current assignment of the pose variables (body poses and extrinsics) a factor is linearized at.
 * Read only during linearization.
 */
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Values {
    poses: HashMap<Key, Isometry3<Float>>
}

impl Values {
    pub fn new() -> Values {
        Values{poses: HashMap::new()}
    }

    pub fn insert(&mut self, key: Key, pose: Isometry3<Float>) -> Option<Isometry3<Float>> {
        self.poses.insert(key,pose)
    }

    pub fn at(&self, key: Key) -> Result<&Isometry3<Float>> {
        self.poses.get(&key).ok_or(Error::MissingVariable(key))
    }

    pub fn contains(&self, key: Key) -> bool {
        self.poses.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn keys(&self) -> Vec<Key> {
        let mut keys = self.poses.keys().copied().collect::<Vec<Key>>();
        keys.sort_unstable();
        keys
    }

    /**
     * Applies the tangent space perturbations, variables without a delta are copied unchanged
     */
    pub fn retract(&self, deltas: &HashMap<Key, Vector6<Float>>) -> Values {
        let poses = self.poses.iter().map(|(k,pose)| match deltas.get(k) {
            Some(delta) => (*k, retract(pose,delta)),
            None => (*k, *pose)
        }).collect::<HashMap<Key,Isometry3<Float>>>();
        Values{poses}
    }
}
