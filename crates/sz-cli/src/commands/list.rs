use comfy_table::{ContentArrangement, Table};
use serde_json::json;

use crate::catalog::ENTRIES;

/// Longest description shown in the table.
const DESCRIPTION_WIDTH: usize = 60;

fn shorten(text: &str) -> String {
    if text.is_empty() {
        return "-".to_string();
    }
    if text.chars().count() <= DESCRIPTION_WIDTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(DESCRIPTION_WIDTH - 3).collect();
    format!("{}...", cut.trim_end())
}

pub fn run(as_json: bool) -> Result<(), String> {
    if as_json {
        let entries: Vec<_> = ENTRIES
            .iter()
            .map(|entry| {
                let game = entry.build(None);
                json!({
                    "key": entry.key,
                    "aliases": entry.aliases,
                    "metadata": game.summary(),
                    "roles": game.role_spec(),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Name", "Roles", "Description"]);

    for entry in ENTRIES {
        let game = entry.build(None);
        let roles: Vec<String> = game
            .role_spec()
            .roles()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        table.add_row(vec![
            entry.key.to_string(),
            game.summary().name.clone(),
            roles.join(", "),
            shorten(&game.summary().description),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} formulations", ENTRIES.len());

    Ok(())
}
