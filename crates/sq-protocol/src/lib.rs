pub mod catalog;
pub mod classification;
pub mod intent;
pub mod resolution;

pub use catalog::*;
pub use classification::*;
pub use intent::*;
pub use resolution::*;
