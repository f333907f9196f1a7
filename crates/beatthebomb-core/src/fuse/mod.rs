mod timer;

pub use timer::FuseTimer;
pub(crate) use timer::sanitize_secs;
