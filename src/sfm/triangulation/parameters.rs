extern crate nalgebra as na;

use std::fmt;
use serde::{Serialize, Deserialize};
use na::Vector3;
use crate::Float;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct TriangulationParameters {
    /// singular values of the DLT system above this count towards its rank
    pub rank_tolerance: Float,
    /// refine the DLT estimate by minimizing the reprojection error
    pub enable_epi: bool,
    /// points farther than this from any camera are rejected, disabled if <= 0
    pub landmark_distance_threshold: Float,
    /// points whose max reprojection error exceeds this are rejected, disabled if <= 0
    pub dynamic_outlier_rejection_threshold: Float,
    pub max_refinement_iterations: usize
}

impl Default for TriangulationParameters {
    fn default() -> TriangulationParameters {
        TriangulationParameters {
            rank_tolerance: 1.0,
            enable_epi: false,
            landmark_distance_threshold: -1.0,
            dynamic_outlier_rejection_threshold: -1.0,
            max_refinement_iterations: 20
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub enum TriangulationResult {
    Valid(Vector3<Float>),
    Degenerate,
    BehindCamera,
    Outlier,
    FarPoint
}

impl TriangulationResult {
    pub fn is_valid(&self) -> bool {
        match self {
            TriangulationResult::Valid(_) => true,
            _ => false
        }
    }

    pub fn point(&self) -> Option<&Vector3<Float>> {
        match self {
            TriangulationResult::Valid(p) => Some(p),
            _ => None
        }
    }
}

impl fmt::Display for TriangulationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TriangulationResult::Valid(p) => write!(f, "valid ({}, {}, {})", p[0], p[1], p[2]),
            TriangulationResult::Degenerate => write!(f, "degenerate"),
            TriangulationResult::BehindCamera => write!(f, "behind camera"),
            TriangulationResult::Outlier => write!(f, "outlier"),
            TriangulationResult::FarPoint => write!(f, "far point")
        }
    }
}
