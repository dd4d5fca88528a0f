//! List the posts available in the content source

use anyhow::Result;

use crate::content::PostSummary;
use crate::helpers::Helpers;
use crate::Blog;

/// Walk every listing page and print the posts in listing order
pub async fn run(blog: &Blog) -> Result<()> {
    let mut listing = blog.load_listing().await?;
    listing.load_all(blog.source()).await?;

    let helpers = Helpers::new(&blog.config);
    println!("Posts ({}):", listing.posts().len());
    for post in listing.posts() {
        println!("{}", format_line(post, &helpers));
    }

    Ok(())
}

fn format_line(post: &PostSummary, helpers: &Helpers) -> String {
    let date = helpers.date(post.first_publication_date.as_ref());
    format!(
        "  {} - {} [{}]",
        if date.is_empty() { "-".to_string() } else { date },
        post.title,
        post.slug.as_deref().unwrap_or("?")
    )
}
