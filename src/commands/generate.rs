//! Export static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Export the listing and the first posts to the public directory
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let report = generator.generate().await?;

    tracing::info!(
        "Exported listing with {} posts and {} post pages",
        report.listed,
        report.prerendered.len()
    );
    for slug in &report.prerendered {
        tracing::debug!("Prerendered: {}", slug);
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
