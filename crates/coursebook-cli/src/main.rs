//! The user-facing `coursebook` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "coursebook", version, about = "Browse courses and take quizzes from the terminal")]
struct Cli {
    /// Base URL of the content store (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available courses
    Courses,

    /// Show a course outline: chapters, topics, quiz availability
    Outline {
        /// Course slug (e.g. "linux-cli")
        #[arg(long)]
        course: String,
    },

    /// Read a topic, or walk through the whole course
    Read {
        /// Course slug
        #[arg(long)]
        course: String,

        /// Chapter index (0-based)
        #[arg(long, default_value = "0")]
        chapter: usize,

        /// Topic index within the chapter (0-based)
        #[arg(long)]
        topic: Option<usize>,

        /// Keep reading to the end of the course
        #[arg(long)]
        walk: bool,
    },

    /// Take a chapter quiz non-interactively
    Quiz {
        /// Course slug
        #[arg(long)]
        course: String,

        /// Chapter id (e.g. "ch1")
        #[arg(long)]
        chapter: String,

        /// Answers as comma-separated id=index pairs (e.g. "q1=0,q2=1")
        #[arg(long)]
        answers: String,
    },

    /// Show (and consume) the stored result of a chapter quiz
    Results {
        /// Course slug
        #[arg(long)]
        course: String,

        /// Chapter id
        #[arg(long)]
        chapter: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coursebook=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let opts = commands::StoreOpts {
        base_url: cli.base_url,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Courses => commands::courses::execute(&opts).await,
        Commands::Outline { course } => commands::outline::execute(&opts, &course).await,
        Commands::Read {
            course,
            chapter,
            topic,
            walk,
        } => commands::read::execute(&opts, &course, chapter, topic, walk).await,
        Commands::Quiz {
            course,
            chapter,
            answers,
        } => commands::quiz::execute(&opts, &course, &chapter, &answers).await,
        Commands::Results { course, chapter } => {
            commands::results::execute(&opts, &course, &chapter)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
