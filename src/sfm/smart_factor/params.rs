use std::fmt;
use std::path::Path;
use log::debug;
use serde::{Serialize, Deserialize};
use crate::sfm::triangulation::TriangulationParameters;
use crate::Result;

/**
 * Kind of linear factor a smart factor is linearized into
 */
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum LinearizationMode {
    Hessian,
    Implicit,
    JacobianQ,
    JacobianSvd
}

/**
 * How a landmark that cannot be triangulated is treated
 */
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum DegeneracyMode {
    IgnoreDegeneracy,
    ZeroOnDegeneracy,
    HandleInfinity
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct SmartFactorParams {
    pub linearization_mode: LinearizationMode,
    pub degeneracy_mode: DegeneracyMode,
    pub triangulation: TriangulationParameters
}

impl Default for SmartFactorParams {
    fn default() -> SmartFactorParams {
        SmartFactorParams {
            linearization_mode: LinearizationMode::Hessian,
            degeneracy_mode: DegeneracyMode::IgnoreDegeneracy,
            triangulation: TriangulationParameters::default()
        }
    }
}

impl SmartFactorParams {

    pub fn new(linearization_mode: LinearizationMode, degeneracy_mode: DegeneracyMode) -> SmartFactorParams {
        SmartFactorParams{linearization_mode, degeneracy_mode, ..Default::default()}
    }

    pub fn from_yaml(yaml: &str) -> Result<SmartFactorParams> {
        let params: SmartFactorParams = serde_yaml::from_str(yaml)?;
        debug!("loaded smart factor params: {}", params);
        Ok(params)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<SmartFactorParams> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

}

impl fmt::Display for SmartFactorParams {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let t = &self.triangulation;
        let mut display = String::from(format!("{:?}_{:?}_rank_tol_{:+e}",self.linearization_mode,self.degeneracy_mode,t.rank_tolerance));
        if t.enable_epi {
            display.push_str(format!("_epi_its_{}",t.max_refinement_iterations).as_str());
        }
        if t.landmark_distance_threshold > 0.0 {
            display.push_str(format!("_dist_{:+e}",t.landmark_distance_threshold).as_str());
        }
        if t.dynamic_outlier_rejection_threshold > 0.0 {
            display.push_str(format!("_outlier_{:+e}",t.dynamic_outlier_rejection_threshold).as_str());
        }
        write!(f, "{}", display)
    }

}
