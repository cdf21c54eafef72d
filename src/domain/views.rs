use super::enums::SortKey;
use super::item::Item;
use chrono::{DateTime, Local};
use std::cmp::Ordering;

/// Items still being used up, filtered by name and sorted
pub fn current_items<'a>(items: &'a [Item], filter: &str, sort: SortKey) -> Vec<&'a Item> {
    let needle = filter.trim().to_lowercase();
    let mut rows: Vec<&Item> = items
        .iter()
        .filter(|item| !item.finished)
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .collect();

    // sort_by is stable, so equal keys keep insertion order
    rows.sort_by(|a, b| compare(a, b, sort));
    rows
}

/// Items that ran out and need buying, in collection order
pub fn shopping_items(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|item| item.finished).collect()
}

fn compare(a: &Item, b: &Item, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Urgency => a
            .urgency_level
            .rank()
            .cmp(&b.urgency_level.rank())
            .then_with(|| compare_names(&a.name, &b.name)),
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Date => a.added_date.cmp(&b.added_date),
    }
}

/// Case-insensitive lexical order, falling back to exact bytes
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Lay items out row by row in a fixed number of columns
pub fn grid_rows<'a>(items: &[&'a Item], columns: usize) -> Vec<Vec<&'a Item>> {
    let columns = columns.max(1);
    items.chunks(columns).map(|row| row.to_vec()).collect()
}

/// Pick a glyph for an item based on keywords in its name
pub fn item_glyph(name: &str, use_emoji: bool) -> &'static str {
    const GLYPHS: &[(&str, &str)] = &[
        ("milk", "🥛"),
        ("bread", "🍞"),
        ("egg", "🥚"),
        ("cheese", "🧀"),
        ("apple", "🍎"),
        ("banana", "🍌"),
        ("rice", "🍚"),
        ("potato", "🥔"),
        ("onion", "🧅"),
        ("tomato", "🍅"),
        ("carrot", "🥕"),
        ("broccoli", "🥦"),
        ("chicken", "🍗"),
        ("fish", "🐟"),
        ("meat", "🥩"),
        ("water", "💧"),
        ("oil", "🛢️"),
        ("butter", "🧈"),
        ("coffee", "☕"),
        ("tea", "🍵"),
    ];

    if !use_emoji {
        return "*";
    }

    let lowered = name.to_lowercase();
    GLYPHS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, glyph)| *glyph)
        .unwrap_or("🛒")
}

/// Pill text for the remaining time ("3d left" or "Expired")
pub fn days_left_label(item: &Item, now: DateTime<Local>) -> String {
    let days = item.remaining_days(now);
    if days > 0 {
        format!("{}d left", days)
    } else {
        "Expired".to_string()
    }
}

/// Whether the item is on its last day
pub fn is_last_day(item: &Item, now: DateTime<Local>) -> bool {
    item.remaining_days(now) == 1
}

/// Format a date like "Oct 19, 2026"
pub fn format_date(date: DateTime<Local>) -> String {
    date.format("%b %-d, %Y").to_string()
}
