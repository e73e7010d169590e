//! CLI subcommands.

pub mod courses;
pub mod outline;
pub mod quiz;
pub mod read;
pub mod results;

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use coursebook_core::model::QuizResult;
use coursebook_store::{load_config_from, CoursebookConfig, FileSessionStore, HttpStore};

/// Options shared by every subcommand.
pub struct StoreOpts {
    pub base_url: Option<String>,
    pub config: Option<PathBuf>,
}

impl StoreOpts {
    /// Load configuration and open the document store against it.
    pub(crate) fn open(&self) -> Result<(HttpStore, CoursebookConfig)> {
        let config = load_config_from(self.config.as_deref())?;
        let base_url = self.base_url.as_deref().unwrap_or(&config.base_url);
        Ok((
            HttpStore::with_timeout(base_url, config.timeout_secs),
            config,
        ))
    }

    /// Open the session hand-off store for quiz results.
    pub(crate) fn open_session(&self) -> Result<FileSessionStore> {
        let config = load_config_from(self.config.as_deref())?;
        Ok(FileSessionStore::open(config.session_file))
    }
}

/// Print the per-question review table and score line of a quiz result.
pub(crate) fn print_result_table(result: &QuizResult) {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Your answer", "Correct answer", ""]);
    for entry in &result.results {
        let selected = entry
            .options
            .get(entry.selected_index)
            .map(String::as_str)
            .unwrap_or("(out of range)");
        let correct = entry
            .options
            .get(entry.correct_index)
            .map(String::as_str)
            .unwrap_or("(unknown)");
        let mark = if entry.selected_index == entry.correct_index {
            "ok"
        } else {
            "WRONG"
        };
        table.add_row(vec![entry.question.as_str(), selected, correct, mark]);
    }
    println!("{table}");
    println!("Score: {}/{}", result.score, result.total);
}
