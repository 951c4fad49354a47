pub mod locate;
pub mod profile;
pub mod types;

pub use locate::ColumnLocator;
pub use profile::FieldSpec;
pub use types::Field;
