// layout_probe.rs – check which page layout the search site is serving
// -----------------------------------------------------------------------------
// Opens one headless browser session, loads the search page for a keyword and
// prints the detected layout, the selector that matched, and how many result
// containers were accepted or rejected by record extraction. Useful when the
// site changes its markup and collection starts coming back empty.
// -----------------------------------------------------------------------------

use anyhow::{Context, Result};
use std::time::Instant;
use trend_tracker::app::init_tracing;
use trend_tracker::collector::{
    AcquireOptions, ChromeSessionFactory, SessionFactory, SessionGuard, acquire_page,
    extract_record,
};
use trend_tracker::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage:");
        println!("  {} <KEYWORD>   - Probe the search page for KEYWORD", args[0]);
        println!("\nExamples:");
        println!("  {} \"smart farm\"", args[0]);
        return Ok(());
    }
    let keyword = args[1..].join(" ");

    let config = Config::from_env();
    let url = config.search_url(&keyword);
    println!("🔍 Probing {}", url);

    let start = Instant::now();
    let factory = ChromeSessionFactory::from_config(&config);
    let session = factory.open().context("Failed to start browser session")?;
    let mut session = SessionGuard::new(session);
    println!("✅ Browser ready in {:.2}s", start.elapsed().as_secs_f64());

    let page_start = Instant::now();
    let page = acquire_page(&mut *session, &url, AcquireOptions::from(&config)).await?;
    println!(
        "📄 Page acquired in {:.2}s ({} bytes)",
        page_start.elapsed().as_secs_f64(),
        page.html.len()
    );

    println!("Layout:     {:?}", page.layout);
    let Some(selector) = page.selector else {
        println!("Selector:   none matched");
        return Ok(());
    };
    println!("Selector:   {}", selector.css());

    let (accepted, rejected) = {
        let document = page.document();
        let mut accepted = 0usize;
        let mut rejected = Vec::new();
        for element in document.select(selector.selector()) {
            match extract_record(&element, &keyword) {
                Ok(_) => accepted += 1,
                Err(reason) => rejected.push(reason.to_string()),
            }
        }
        (accepted, rejected)
    };

    println!("Candidates: {}", accepted + rejected.len());
    println!("Accepted:   {}", accepted);
    println!("Rejected:   {}", rejected.len());
    for reason in &rejected {
        println!("  - {}", reason);
    }
    println!("⏱️  Total {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
