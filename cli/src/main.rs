mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use recsys::{load_index, Columns, QueryOptions, QueryService, SelfExclusion, VectorizerOptions};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recsys")]
#[command(about = "Genre-based title recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Input path (.csv, .json, .jsonl file or a directory of them)
    #[arg(long)]
    data: String,
    /// Column holding the title
    #[arg(long, default_value = "title")]
    title_column: String,
    /// Column holding the genre text
    #[arg(long, default_value = "genre")]
    genre_column: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the titles most similar to one title
    Recommend {
        #[command(flatten)]
        data: DataArgs,
        /// Title to look up (case-insensitive)
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 5)]
        top_n: usize,
        /// Exclude the query's own row instead of the first ranked slot
        #[arg(long, default_value_t = false)]
        identity_exclusion: bool,
        /// Print similarity scores
        #[arg(long, default_value_t = false)]
        scores: bool,
    },
    /// List the distinct titles in the dataset
    Titles {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Show dataset and index statistics
    Stats {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Read titles from stdin and print recommendations for each
    Interactive {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, default_value_t = 5)]
        top_n: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend { data, title, top_n, identity_exclusion, scores } => {
            let exclusion = if identity_exclusion { SelfExclusion::Identity } else { SelfExclusion::Positional };
            let (service, _) = build_service(&data, QueryOptions { top_n, exclusion })?;
            let results = service.recommend_scored(&title, top_n);
            println!("{}", render::render(title.trim(), results.as_deref(), scores));
        }
        Commands::Titles { data } => {
            let (service, _) = build_service(&data, QueryOptions::default())?;
            for title in service.index().titles() {
                println!("{title}");
            }
        }
        Commands::Stats { data } => {
            let (service, dropped) = build_service(&data, QueryOptions::default())?;
            let index = service.index();
            println!("records: {}", index.len());
            println!("distinct titles: {}", index.titles().len());
            println!("dropped rows: {dropped}");
            println!("vocabulary: {}", index.vocabulary_len());
        }
        Commands::Interactive { data, top_n } => {
            let (service, _) = build_service(&data, QueryOptions { top_n, ..QueryOptions::default() })?;
            interactive(&service, io::stdin().lock(), io::stdout())?;
        }
    }
    Ok(())
}

/// Load the dataset and build the index. Returns the service and the number of dropped rows.
fn build_service(args: &DataArgs, options: QueryOptions) -> Result<(QueryService, usize)> {
    let columns = Columns { title: args.title_column.clone(), genre: args.genre_column.clone() };
    let (index, dropped) = load_index(&args.data, &columns, VectorizerOptions::default())
        .with_context(|| format!("building similarity index from {}", args.data))?;
    Ok((QueryService::with_options(index, options), dropped))
}

/// One response per input line: blank lines ask for a title, anything else is looked up.
fn interactive<R: BufRead, W: Write>(service: &QueryService, input: R, mut out: W) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    for line in input.lines() {
        let selected = line?;
        let selected = selected.trim();
        if selected.is_empty() {
            writeln!(out, "{}", render::NO_SELECTION)?;
        } else {
            let results = service.recommend_scored(selected, service.options().top_n);
            writeln!(out, "{}", render::render(selected, results.as_deref(), false))?;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}
