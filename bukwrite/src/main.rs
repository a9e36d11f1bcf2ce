//! Headless bukwrite entry point
//!
//! Loads settings and the dictionary, opens the document named on the
//! command line, spellchecks it and lists the misspelt words. With
//! `--rtf OUT` the document is also exported as RTF.

use bukwrite::{rtf, DictionaryHandle, EditorConfig, EditorSession};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    bukcore::logging::init("bukwrite=info");

    let mut args = std::env::args_os().skip(1);
    let input = args.next().map(PathBuf::from);
    let rtf_out = match (args.next(), args.next()) {
        (Some(flag), Some(out)) if flag == "--rtf" => Some(PathBuf::from(out)),
        (None, _) => None,
        _ => {
            eprintln!("usage: bukwrite [FILE [--rtf OUT]]");
            return ExitCode::FAILURE;
        }
    };

    let config = EditorConfig::load();
    let dictionary = if config.spellcheck {
        match DictionaryHandle::init(&config.dictionary_dir, &config.language) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(error = %err, "continuing without spellcheck");
                None
            }
        }
    } else {
        None
    };

    let mut session = EditorSession::new(&config, dictionary.as_ref().map(DictionaryHandle::shared))
        .with_recent_files(EditorConfig::recent_files_path());

    let status = match input {
        Some(path) => run(&mut session, &path, rtf_out),
        None => {
            info!("no document given");
            ExitCode::SUCCESS
        }
    };

    if let Some(handle) = dictionary {
        handle.deinit();
    }
    status
}

fn run(session: &mut EditorSession, path: &Path, rtf_out: Option<PathBuf>) -> ExitCode {
    if let Err(err) = session.open(path) {
        error!(error = %err, "could not open document");
        return ExitCode::FAILURE;
    }

    let misspelt = session.misspelt_words();
    for (range, word) in &misspelt {
        println!("{}:{}-{}: {}", path.display(), range.start, range.end, word);
    }
    info!(
        words = session.document().word_count(),
        misspelt = misspelt.len(),
        "spellcheck finished"
    );

    if let Some(out) = rtf_out {
        if let Err(err) = std::fs::write(&out, rtf::to_rtf(session.document())) {
            error!(path = %out.display(), error = %err, "could not write RTF");
            return ExitCode::FAILURE;
        }
        info!(path = %out.display(), "exported RTF");
    }
    ExitCode::SUCCESS
}
