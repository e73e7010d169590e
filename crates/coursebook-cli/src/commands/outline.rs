//! The `coursebook outline` command.

use anyhow::Result;

use coursebook_core::navigator::CourseSession;

use super::StoreOpts;

pub async fn execute(opts: &StoreOpts, slug: &str) -> Result<()> {
    let (store, _) = opts.open()?;
    let session = CourseSession::load(store, slug)
        .await
        .ok_or_else(|| anyhow::anyhow!("course not found: {slug}"))?;

    let course = session.course();
    println!("{} ({})", course.title, course.slug);
    if !course.description.is_empty() {
        println!("{}", course.description);
    }
    println!();

    for (i, chapter) in course.chapters.iter().enumerate() {
        let quiz_note = if chapter.quiz_available {
            "  [quiz available]"
        } else {
            ""
        };
        println!("{i}. {} ({}){quiz_note}", chapter.title, chapter.id);
        if chapter.topics.is_empty() {
            println!("     (single content page)");
        }
        for (j, topic) in chapter.topics.iter().enumerate() {
            println!("   {i}.{j} {}", topic.title);
        }
    }

    Ok(())
}
