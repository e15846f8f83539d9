mod battery;

pub use battery::IoregSource;
