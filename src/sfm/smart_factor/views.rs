extern crate nalgebra as na;

use na::SVector;
use crate::sensors::camera::SharedCalibration;
use crate::{Error,Result,Key,Float};

/**
 * A single observation of the landmark
 */
#[derive(Debug,Clone)]
pub struct View<C, const Z: usize> {
    pub measurement: SVector<Float,Z>,
    pub body_key: Key,
    pub extrinsic_key: Key,
    pub calibration: SharedCalibration<C>
}

/**
 * Append only list of views together with the unique keys they reference, in order of first appearance
 */
#[derive(Debug,Clone)]
pub struct ViewRegistry<C, const Z: usize> {
    views: Vec<View<C,Z>>,
    keys: Vec<Key>
}

impl<C, const Z: usize> ViewRegistry<C,Z> {

    pub fn new() -> ViewRegistry<C,Z> {
        ViewRegistry{views: Vec::new(), keys: Vec::new()}
    }

    fn push_unique_key(&mut self, key: Key) -> () {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn add(&mut self, measurement: SVector<Float,Z>, body_key: Key, extrinsic_key: Key, calibration: SharedCalibration<C>) -> () {
        self.push_unique_key(body_key);
        self.push_unique_key(extrinsic_key);
        self.views.push(View{measurement, body_key, extrinsic_key, calibration});
    }

    /**
     * Adds all views or none of them
     */
    pub fn add_batch(&mut self, measurements: &[SVector<Float,Z>], body_keys: &[Key], extrinsic_keys: &[Key], calibrations: &[SharedCalibration<C>]) -> Result<()> {
        let n = measurements.len();
        if body_keys.len() != n || extrinsic_keys.len() != n || calibrations.len() != n {
            return Err(Error::MismatchedLengths{
                measurements: n,
                body_keys: body_keys.len(),
                extrinsic_keys: extrinsic_keys.len(),
                calibrations: calibrations.len()
            });
        }
        for i in 0..n {
            self.add(measurements[i], body_keys[i], extrinsic_keys[i], calibrations[i].clone());
        }
        Ok(())
    }

    pub fn add_batch_shared(&mut self, measurements: &[SVector<Float,Z>], body_keys: &[Key], extrinsic_keys: &[Key], calibration: &SharedCalibration<C>) -> Result<()> {
        let n = measurements.len();
        if body_keys.len() != n || extrinsic_keys.len() != n {
            return Err(Error::MismatchedLengths{
                measurements: n,
                body_keys: body_keys.len(),
                extrinsic_keys: extrinsic_keys.len(),
                calibrations: n
            });
        }
        for i in 0..n {
            self.add(measurements[i], body_keys[i], extrinsic_keys[i], calibration.clone());
        }
        Ok(())
    }

    pub fn views(&self) -> &Vec<View<C,Z>> {
        &self.views
    }

    pub fn keys(&self) -> &Vec<Key> {
        &self.keys
    }

    pub fn body_keys(&self) -> Vec<Key> {
        self.views.iter().map(|v| v.body_key).collect()
    }

    pub fn extrinsic_keys(&self) -> Vec<Key> {
        self.views.iter().map(|v| v.extrinsic_key).collect()
    }

    /**
     * Keys of the per view blocks: [body_0, extrinsic_0, body_1, extrinsic_1, ...]
     */
    pub fn nonunique_keys(&self) -> Vec<Key> {
        self.views.iter().flat_map(|v| vec![v.body_key, v.extrinsic_key]).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
