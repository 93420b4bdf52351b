//! Snapshots of the advertised tool descriptors
//!
//! Each descriptor is pinned under `snapshots/` so that a change to a tool's
//! parameters shows up as a reviewed snapshot diff.

use super::Tools;
use crate::mutation_mode::MutationMode;

#[test]
fn tool_descriptors_match_their_snapshots() {
    let tools = Tools::new(MutationMode::All);
    assert_eq!(tools.len(), 14);

    insta::with_settings!({ sort_maps => true }, {
        for tool in tools.descriptors() {
            insta::assert_json_snapshot!(tool.name.to_string(), tool);
        }
    });
}
