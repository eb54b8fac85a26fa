/// Headed CSV input parsed column-wise.
pub mod tabular;

pub use tabular::TabularFile;
