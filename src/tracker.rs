mod matching;
mod object_tracker;
mod reading_order;
mod rect;
mod shared;
mod target_type;
mod tracked_object;

pub use matching::{Detection, class_names_match};
pub use object_tracker::{ObjectTracker, TrackerConfig};
pub use reading_order::sort_reading_order;
pub use rect::Rect;
pub use shared::SharedTracker;
pub use target_type::TargetType;
pub use tracked_object::{CENTER_LABEL_PREFIX, IdSpace, ObjectKey, TrackedObject};
