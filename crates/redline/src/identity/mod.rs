//! Shared identity helpers: ids, timestamps, display names.

mod clock;
mod ids;
mod names;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{new_suggestion_id, non_blank, require_id, SUGGESTION_ID_PREFIX};
pub use names::{
    generate_name, DisplayNameResolver, GeneratedNameResolver, StaticNameResolver,
    DISPLAY_NAME_KEY_PREFIX,
};
