mod battery;

pub use battery::SysfsSource;
