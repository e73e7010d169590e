//! The `coursebook quiz` command.

use anyhow::{Context, Result};

use coursebook_core::quiz::{resolve_quiz, QuizAttempt};

use super::{print_result_table, StoreOpts};

pub async fn execute(opts: &StoreOpts, slug: &str, chapter_id: &str, answers: &str) -> Result<()> {
    let answers = parse_answers(answers)?;

    let (store, _) = opts.open()?;
    let quiz = resolve_quiz(&store, slug, chapter_id)
        .await
        .ok_or_else(|| anyhow::anyhow!("no quiz available for {slug}/{chapter_id}"))?;

    let mut attempt = QuizAttempt::begin(quiz, slug, chapter_id);
    for (id, selected) in &answers {
        attempt
            .record_answer(id, *selected)
            .with_context(|| format!("answer for '{id}' rejected"))?;
    }

    let result = attempt.submit()?;

    println!("{}", result.title);
    print_result_table(&result);
    for entry in &result.results {
        if entry.selected_index != entry.correct_index && !entry.explanation.is_empty() {
            println!("  [{}] {}", entry.id, entry.explanation);
        }
    }

    let sessions = opts.open_session()?;
    coursebook_core::quiz::store_result(&sessions, &result);
    println!(
        "Result saved. View again with: coursebook results --course {slug} --chapter {chapter_id}"
    );

    Ok(())
}

/// Parse comma-separated `id=index` pairs (e.g. `q1=0,q2=1`).
fn parse_answers(spec: &str) -> Result<Vec<(String, usize)>> {
    spec.split(',')
        .map(|pair| {
            let pair = pair.trim();
            let (id, index) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("invalid answer spec '{pair}', expected id=index"))?;
            let index: usize = index
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid option index in '{pair}'"))?;
            Ok((id.trim().to_string(), index))
        })
        .collect()
}
