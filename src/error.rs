use thiserror::Error;

use crate::Key;
use crate::sfm::smart_factor::params::{DegeneracyMode, LinearizationMode};

#[derive(Debug, Error)]
pub enum Error {
    #[error("mismatched lengths: {measurements} measurements, {body_keys} body keys, {extrinsic_keys} extrinsic keys, {calibrations} calibrations")]
    MismatchedLengths { measurements: usize, body_keys: usize, extrinsic_keys: usize, calibrations: usize },

    #[error("unsupported linearization mode {0:?}")]
    UnsupportedLinearizationMode(LinearizationMode),

    #[error("unsupported degeneracy mode {0:?}")]
    UnsupportedDegeneracyMode(DegeneracyMode),

    #[error("invalid noise model: {0}")]
    InvalidNoiseModel(String),

    #[error("variable {0} not found in values")]
    MissingVariable(Key),

    #[error("jacobians requested without a triangulated landmark")]
    MissingLandmark,

    #[error("landmark does not project into view {view}")]
    ProjectionFailed { view: usize },

    #[error("failed to parse configuration")]
    Config(#[from] serde_yaml::Error),

    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
