pub mod hessian_factor;

pub use hessian_factor::HessianFactor;
