//! Archive a thread to Markdown
//!
//! Usage:
//!
//! ```text
//! cargo run --example archive_thread -- <thread-url> <from-page> <to-page> <output.md> [--json]
//! ```
//!
//! With `--json` the crawled floors are also dumped next to the Markdown file.

use tieba_archive::{Config, Event, TiebaArchiver};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [url, from, to, output, rest @ ..] = args.as_slice() else {
        eprintln!("usage: archive_thread <thread-url> <from-page> <to-page> <output.md> [--json]");
        std::process::exit(2);
    };
    let from: u32 = from.parse()?;
    let to: u32 = to.parse()?;
    let dump_json = rest.iter().any(|arg| arg == "--json");

    let archiver = TiebaArchiver::new(Config::default())?;

    // Count downloaded images from the event stream
    let mut events = archiver.subscribe();
    let counter = tokio::spawn(async move {
        let mut downloaded = 0usize;
        while let Ok(event) = events.recv().await {
            match event {
                Event::ImageDownloaded { .. } => downloaded += 1,
                Event::Exported { .. } => break,
                _ => {}
            }
        }
        downloaded
    });

    let floors = archiver.crawl_thread(url, from, to).await?;
    if dump_json {
        let json_path = std::path::Path::new(output).with_extension("json");
        archiver.export_json(&floors, &json_path).await?;
    }
    archiver.export_markdown(&floors, output).await?;

    let downloaded = counter.await?;
    println!(
        "archived {} floors to {} ({} new images)",
        floors.len(),
        output,
        downloaded
    );
    Ok(())
}
