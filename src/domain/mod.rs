pub mod enums;
pub mod item;
pub mod tracker;
pub mod views;

pub use enums::{Confirmation, SortKey, UiMode, Urgency, View};
pub use item::{Item, ItemId};
pub use tracker::{Added, LifecycleEvent, Snapshot, Tracker};
pub use views::{
    current_items, days_left_label, format_date, grid_rows, is_last_day, item_glyph, shopping_items,
};
