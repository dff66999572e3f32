pub mod answer;
pub mod model;
pub mod wire;

pub use answer::*;
pub use model::*;
pub use wire::*;
