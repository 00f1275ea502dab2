//! Registry listing.

use crate::state::AppState;
use lookout_core::Category;
use lookout_probe::ProbeRegistry;

/// One line per definition: name, category, URL template.
#[must_use]
pub fn platform_lines(registry: &ProbeRegistry) -> Vec<String> {
    registry
        .get_all()
        .iter()
        .map(|probe| {
            let deep = if probe.deep_scan() { " [deep]" } else { "" };
            format!(
                "{:<16} {:<13} {}{}",
                probe.name(),
                probe.category().to_string(),
                probe.url_template(),
                deep
            )
        })
        .collect()
}

/// Print the loaded registry followed by per-category counts.
pub fn print_platforms(state: &AppState) {
    let registry = &state.registry;
    if registry.is_empty() {
        println!("No probe definitions loaded");
        return;
    }

    for line in platform_lines(registry) {
        println!("{line}");
    }

    let mut counts: Vec<(Category, usize)> = registry.count_by_category().into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));

    println!();
    println!("{} platforms", registry.count());
    for (category, count) in counts {
        println!("  {category}: {count}");
    }
}
