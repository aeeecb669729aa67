pub mod camera;
pub mod controls;
pub mod options;
pub mod uniforms;

pub use camera::*;
pub use controls::*;
pub use options::*;
pub use uniforms::*;
