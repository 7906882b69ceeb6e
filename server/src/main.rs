use anyhow::Result;
use axum::Router;
use clap::Parser;
use recsys::Columns;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Dataset path (.csv, .json, .jsonl file or a directory of them)
    #[arg(long, default_value = "./movies_metadata.csv")]
    data: String,
    /// Column holding the title
    #[arg(long, default_value = "title")]
    title_column: String,
    /// Column holding the genre text
    #[arg(long, default_value = "genre")]
    genre_column: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let columns = Columns { title: args.title_column, genre: args.genre_column };
    // Index is fully built before the listener accepts connections.
    let app: Router = build_app(&args.data, &columns)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
