pub mod builder;
pub mod font;
pub mod layout;

pub use builder::MontageBuilder;
pub use layout::{GridSize, MontageLayout};
