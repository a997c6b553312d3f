pub mod progress;
pub mod retry;
pub mod validate;

pub use progress::{spawn_watcher, ProgressBoard, WatchConfig};
pub use validate::{validate_upload, ValidationError, MAX_FLOOR_PLAN_BYTES};
