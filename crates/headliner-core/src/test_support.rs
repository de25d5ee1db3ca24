// Shared fixtures for unit tests across the crate
use crate::models::Article;

pub(crate) fn article(title: &str) -> Article {
    Article {
        source_name: "Wire".to_string(),
        title: title.to_string(),
        description: Some(format!("{} description", title)),
        url: Some(format!("https://example.com/{}", title)),
        url_to_image: Some(format!("https://example.com/{}.png", title)),
        published_at: "2024-03-05T10:15:00Z".to_string(),
    }
}
