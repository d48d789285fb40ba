//! Name search over the session's icon list.

use crate::icon::Icon;

/// Returns the icons whose name contains `query`, ignoring case.
///
/// Order is preserved. An empty query returns every icon.
#[must_use]
pub fn filter_icons(icons: &[Icon], query: &str) -> Vec<Icon> {
    if query.is_empty() {
        return icons.to_vec();
    }

    let needle = query.to_lowercase();
    icons
        .iter()
        .filter(|icon| icon.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
