use log2::*;
use anyhow::Result;
use std::time::Instant;
use web_crawler::config;
use web_crawler::crawler::{Crawler, PageResult};
use web_crawler::CancellationToken;

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    cfg.validate()?;
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("web_crawler")) // include only modules having this pattern
        .compress(false) // compress output
        .level(cfg.log_level.to_string())
        .start();

    let crawler = Crawler::new(cfg.crawler_config())?;

    // Ctrl-C stops new fetches, whatever was collected is still printed
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing in-flight requests");
            on_signal.cancel();
        }
    });

    let report = crawler.crawl_with_cancel(&cfg.seed_url, cancel).await?;

    println!("\nCrawl Results:");
    for result in &report.results {
        match result {
            PageResult::Page { url, title, links, depth, status_code, .. } => {
                println!("\n[{}] {}", depth, title);
                println!("    URL: {}", url);
                println!("    Status: {}", status_code);
                println!("    Links found: {}", links.len());
            }
            PageResult::Failure { url, depth, error } => {
                println!("\n[{}] FAILED", depth);
                println!("    URL: {}", url);
                println!("    Error: {}", error);
            }
        }
    }

    println!("\nCrawl Statistics:");
    println!("    Total pages: {}", report.stats.total_pages);
    println!("    Failed pages: {}", report.stats.failed_pages);
    println!("    Unique URLs: {}", report.stats.unique_urls);
    println!("    Max depth reached: {}", report.stats.max_depth_reached);
    if report.cancelled {
        println!("    (crawl was cancelled, results are partial)");
    }
    info!("Elapsed: {:?}", START_TIME.elapsed());

    if let Some(path) = cfg.output_file {
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        info!("Results written to {:?}", path);
    }

    Ok(())
}
