//! `models list` handler.

use infergate_core::{ModelRegistryPort, ModelSnapshot};

/// One display row per model, sorted by name.
pub fn format_rows(snapshot: &ModelSnapshot) -> Vec<String> {
    snapshot
        .iter()
        .map(|entry| {
            let tasks = entry.tasks.iter().cloned().collect::<Vec<_>>().join(",");
            format!(
                "{:<24} {:<24} {:<16} {}",
                entry.name, entry.address, entry.owned_by, tasks
            )
        })
        .collect()
}

/// Execute `models list`.
pub fn execute_list(registry: &dyn ModelRegistryPort) {
    let snapshot = registry.snapshot();

    if snapshot.is_empty() {
        println!("No models defined.");
        return;
    }

    println!("{:<24} {:<24} {:<16} Tasks", "Name", "Address", "Owner");
    for row in format_rows(&snapshot) {
        println!("{row}");
    }
}
