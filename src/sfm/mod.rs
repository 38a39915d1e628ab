pub mod triangulation;
pub mod values;
pub mod smart_factor;
