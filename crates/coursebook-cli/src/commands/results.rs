//! The `coursebook results` command.

use anyhow::Result;

use coursebook_core::quiz::take_result;

use super::{print_result_table, StoreOpts};

pub fn execute(opts: &StoreOpts, slug: &str, chapter_id: &str) -> Result<()> {
    let sessions = opts.open_session()?;
    let Some(result) = take_result(&sessions, slug, chapter_id) else {
        println!("No stored results for {slug}/{chapter_id}.");
        return Ok(());
    };

    println!(
        "{} ({slug}/{chapter_id}, submitted {})",
        result.title,
        result.submitted_at.format("%Y-%m-%d %H:%M UTC")
    );

    print_result_table(&result);

    Ok(())
}
