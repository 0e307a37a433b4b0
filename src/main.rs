//! Replay a recorded input script against the editor.
//!
//! ```text
//! zonemark-replay <config.json> <script.json>
//! ```
//!
//! The script is a JSON array of input events. The final value and completion
//! state are printed as JSON on stdout.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use zonemark::{AnnotationEditor, AnnotationGroup, EditorConfig, EditorError, InputEvent, LogView};

#[derive(Serialize)]
struct ReplayResult<'a> {
    value: &'a [AnnotationGroup],
    done: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <config.json> <script.json>", args[0]);
        return ExitCode::FAILURE;
    }

    let config = match EditorConfig::load(Path::new(&args[1])) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    match replay(config, Path::new(&args[2])) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay failed: {}", e);
            eprintln!("Replay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn replay(config: EditorConfig, script: &Path) -> Result<String, EditorError> {
    let json = std::fs::read_to_string(script)?;
    let events: Vec<InputEvent> = serde_json::from_str(&json)?;
    log::info!("Replaying {} events from {:?}", events.len(), script);

    let mut editor = AnnotationEditor::new(config)?;
    editor.mount(LogView);
    for (index, event) in events.into_iter().enumerate() {
        if let Err(e) = editor.dispatch(event) {
            log::warn!("Event {} failed: {}", index, e);
            return Err(e);
        }
    }

    let result = ReplayResult {
        value: editor.value()?,
        done: editor.is_done()?,
    };
    Ok(serde_json::to_string(&result)?)
}
