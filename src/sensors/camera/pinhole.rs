extern crate nalgebra as na;

use serde::{Serialize, Deserialize};
use na::{Vector2,Vector3,Matrix2x3,Matrix3};
use crate::sensors::camera::Calibration;
use crate::Float;

/**
 * Monocular pinhole intrinsics with skew
 */
#[derive(Debug,Copy,Clone,PartialEq,Serialize,Deserialize)]
pub struct Pinhole {
    fx: Float,
    fy: Float,
    s: Float,
    cx: Float,
    cy: Float
}

impl Pinhole {
    pub fn new(fx: Float, fy: Float, s: Float, cx: Float, cy: Float) -> Pinhole {
        Pinhole{fx,fy,s,cx,cy}
    }

    pub fn from_matrix(mat: &Matrix3<Float>) -> Pinhole {
        Pinhole::new(mat[(0,0)],mat[(1,1)],mat[(0,1)],mat[(0,2)],mat[(1,2)])
    }

    pub fn get_projection(&self) -> Matrix3<Float> {
        Matrix3::<Float>::new(self.fx, self.s, self.cx,
            0.0, self.fy, self.cy,
            0.0, 0.0, 1.0)
    }

    pub fn get_fx(&self) -> Float {
        self.fx
    }

    pub fn get_fy(&self) -> Float {
        self.fy
    }

    pub fn get_cx(&self) -> Float {
        self.cx
    }

    pub fn get_cy(&self) -> Float {
        self.cy
    }

    pub fn get_s(&self) -> Float {
        self.s
    }

    /**
     * Normalized image coordinates to pixels
     */
    pub fn uncalibrate(&self, x: Float, y: Float) -> Vector2<Float> {
        Vector2::<Float>::new(self.fx*x + self.s*y + self.cx, self.fy*y + self.cy)
    }
}

impl Calibration<2> for Pinhole {

    fn project(&self, position: &Vector3<Float>) -> Option<Vector2<Float>> {
        match position[2] {
            z if z > 0.0 => Some(self.uncalibrate(position[0]/z, position[1]/z)),
            _ => None
        }
    }

    fn get_jacobian_with_respect_to_position_in_camera_frame(&self, position: &Vector3<Float>) -> Option<Matrix2x3<Float>> {
        let x = position[0];
        let y = position[1];
        match position[2] {
            z if z > 0.0 => {
                let z_sqrd = z.powi(2);
                Some(Matrix2x3::<Float>::new(self.fx/z, self.s/z, -(self.fx*x + self.s*y)/z_sqrd,
                                            0.0, self.fy/z, -(self.fy*y)/z_sqrd))
            },
            _ => None
        }
    }

    fn intrinsics(&self) -> &Pinhole {
        self
    }

    fn monocular_measurement(measurement: &Vector2<Float>) -> Vector2<Float> {
        *measurement
    }

    fn equals(&self, other: &Pinhole, tol: Float) -> bool {
        (self.get_projection() - other.get_projection()).abs().max() <= tol
    }
}
