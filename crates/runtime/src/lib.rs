pub mod frame;
pub mod manual;
pub mod render_loop;
pub mod scheduler;

pub use frame::*;
pub use manual::*;
pub use render_loop::*;
pub use scheduler::*;
