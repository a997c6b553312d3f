pub mod insights;
pub mod property;
pub mod status;
pub mod training;

pub use property::PropertyView;
pub use status::PropertyStatus;
