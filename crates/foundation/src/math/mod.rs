pub mod matrix;
pub mod sphere;
pub mod vec;

pub use matrix::*;
pub use sphere::*;
pub use vec::*;
