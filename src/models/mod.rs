mod product;
mod report;

pub use product::*;
pub use report::*;
