//! The `coursebook courses` command.

use anyhow::Result;
use comfy_table::Table;

use coursebook_core::navigator::load_course_index;

use super::StoreOpts;

pub async fn execute(opts: &StoreOpts) -> Result<()> {
    let (store, _) = opts.open()?;
    let courses = load_course_index(&store).await;

    if courses.is_empty() {
        println!("No courses found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Slug", "Title", "Description"]);
    for course in &courses {
        table.add_row(vec![&course.slug, &course.title, &course.description]);
    }
    println!("{table}");

    Ok(())
}
