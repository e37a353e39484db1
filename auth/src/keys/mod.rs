pub mod errors;
pub mod material;

pub use errors::KeyError;
pub use material::KeyMaterial;
