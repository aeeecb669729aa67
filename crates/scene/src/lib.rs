pub mod lights;
pub mod locations;
pub mod marker;
pub mod material;
pub mod mesh;
pub mod prefabs;
pub mod starfield;
pub mod world;

pub use world::*;
