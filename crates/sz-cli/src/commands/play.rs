use std::path::PathBuf;

use colored::Colorize;
use sz_engine::{EngineConfig, SystemEditor, Terminal};
use tracing::debug;

use crate::catalog;

/// Options for one session, gathered from the command line.
pub struct PlayOptions {
    pub players: Vec<String>,
    pub docs_root: Option<PathBuf>,
    pub editor: Option<String>,
    pub seed: Option<u64>,
    pub skip_instructions: bool,
    pub json: bool,
}

fn unknown(name: &str) -> String {
    match catalog::suggest(name) {
        Some(key) => format!("unknown formulation '{name}' (did you mean '{key}'?)"),
        None => format!("unknown formulation '{name}'; run `sz --list` to see what is available"),
    }
}

pub fn run(name: &str, options: PlayOptions) -> Result<(), String> {
    let entry = catalog::find(name).ok_or_else(|| unknown(name))?;
    let game = entry.build(options.seed);

    let mut config = EngineConfig::from_env()
        .with_editor_override(options.editor)
        .with_players(options.players);
    if let Some(root) = options.docs_root {
        config = config.with_docs_root(root);
    }
    if options.skip_instructions {
        config = config.without_instructions();
    }
    debug!(formulation = entry.key, editor = %config.editor, "starting session");

    let editor = SystemEditor::new(config.editor.clone());
    let outcome = if options.json {
        game.play(&mut Terminal::stdin_to_stderr(), &editor, &config)
    } else {
        game.play(&mut Terminal::stdio(), &editor, &config)
    }
    .map_err(|e| e.to_string())?;

    if options.json {
        let text = serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string())?;
        println!("{text}");
    } else if outcome.goal_reached {
        println!("{}", format!("Solved in {} step(s).", outcome.steps).bold());
    }
    Ok(())
}
