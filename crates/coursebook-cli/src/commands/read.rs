//! The `coursebook read` command.

use anyhow::Result;

use coursebook_core::navigator::{CourseSession, TopicOutcome};
use coursebook_core::store::DocumentStore;

use super::StoreOpts;

pub async fn execute(
    opts: &StoreOpts,
    slug: &str,
    chapter: usize,
    topic: Option<usize>,
    walk: bool,
) -> Result<()> {
    let (store, _) = opts.open()?;
    let mut session = CourseSession::load(store, slug)
        .await
        .ok_or_else(|| anyhow::anyhow!("course not found: {slug}"))?;

    let mut outcome = session
        .load_chapter(chapter)
        .await
        .ok_or_else(|| anyhow::anyhow!("chapter index out of range: {chapter}"))?;

    if let Some(topic) = topic {
        outcome = session
            .load_topic(topic)
            .await
            .ok_or_else(|| anyhow::anyhow!("topic index out of range: {topic}"))?;
    }
    print_view(&session, outcome, slug);

    if walk {
        while let Some(outcome) = session.next().await {
            print_view(&session, outcome, slug);
        }
    }

    Ok(())
}

fn print_view<S: DocumentStore>(session: &CourseSession<S>, outcome: TopicOutcome, slug: &str) {
    match outcome {
        TopicOutcome::Rendered => {
            println!("# {}", session.title());
            println!();
            println!("{}", session.body());
            println!();
        }
        TopicOutcome::QuizRedirect => {
            if let Some(chapter) = session.current_chapter() {
                println!(
                    "(quiz: run `coursebook quiz --course {slug} --chapter {}`)",
                    chapter.id
                );
            }
            println!();
        }
    }
}
