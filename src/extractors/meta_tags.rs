use super::{Extractor, ParsingContext};
use crate::error::ImportError;
use crate::extractors::schema::resolve_url;
use crate::model::ScrapedRecipe;
use crate::text::normalize_text;
use log::debug;
use scraper::{Html, Selector};
use url::Url;

/// Fallback extractor using Open Graph / Twitter card tags.
///
/// Always succeeds: a page without any metadata still yields its host as
/// the title.
pub struct MetaTagExtractor;

/// Image tags in order of preference, with the attribute holding the URL
const IMAGE_TAGS: [(&str, &str); 7] = [
    ("meta[property='og:image:secure_url']", "content"),
    ("meta[property='og:image']", "content"),
    ("meta[property='og:image:url']", "content"),
    ("meta[name='twitter:image']", "content"),
    ("meta[name='twitter:image:src']", "content"),
    ("meta[property='twitter:image']", "content"),
    ("link[rel='image_src']", "href"),
];

const TITLE_TAGS: [&str; 2] = ["meta[property='og:title']", "meta[name='og:title']"];

/// Page title from `og:title`, then `<title>`.
pub fn page_title(document: &Html) -> Option<String> {
    for tag in TITLE_TAGS {
        let selector = Selector::parse(tag).unwrap();
        let title = document
            .select(&selector)
            .filter_map(|el| el.value().attr("content"))
            .map(normalize_text)
            .find(|title| !title.is_empty());
        if title.is_some() {
            return title;
        }
    }

    let selector = Selector::parse("title").unwrap();
    document
        .select(&selector)
        .map(|el| normalize_text(&el.text().collect::<String>()))
        .find(|title| !title.is_empty())
}

/// First image tag that resolves to an absolute http(s) URL.
pub fn page_image(document: &Html, base: &Url) -> Option<String> {
    IMAGE_TAGS.iter().find_map(|(tag, attr)| {
        let selector = Selector::parse(tag).unwrap();
        document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .find_map(|raw| resolve_url(raw, base))
    })
}

/// Title for a page, falling back to its host name.
pub fn title_or_host(context: &ParsingContext) -> String {
    page_title(&context.document).unwrap_or_else(|| context.host().to_string())
}

impl Extractor for MetaTagExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<ScrapedRecipe, ImportError> {
        debug!("MetaTagExtractor: Falling back to page metadata for {}", context.url);

        let mut recipe = ScrapedRecipe::minimal(title_or_host(context), context.host());
        recipe.image_url = page_image(&context.document, &context.url);

        debug!(
            "MetaTagExtractor: title={:?} image={:?}",
            recipe.title, recipe.image_url
        );
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(html: &str) -> ParsingContext {
        ParsingContext {
            url: Url::parse("https://www.example.com/recipes/pie").unwrap(),
            document: Html::parse_document(html),
        }
    }

    #[test]
    fn test_prefers_og_title_over_title_tag() {
        let ctx = context(
            r#"<html><head>
                <title>Pie | Example</title>
                <meta property="og:title" content="Apple &amp; Pear Pie">
            </head><body></body></html>"#,
        );
        let recipe = MetaTagExtractor.parse(&ctx).unwrap();

        assert_eq!(recipe.title, "Apple & Pear Pie");
        assert_eq!(recipe.source_host, "www.example.com");
    }

    #[test]
    fn test_title_tag_then_host() {
        let ctx = context("<html><head><title>  Pie\n | Example </title></head></html>");
        assert_eq!(MetaTagExtractor.parse(&ctx).unwrap().title, "Pie | Example");

        let ctx = context("<html><head></head><body><p>nothing</p></body></html>");
        let recipe = MetaTagExtractor.parse(&ctx).unwrap();
        assert_eq!(recipe.title, "www.example.com");
        assert!(recipe.image_url.is_none());
        assert!(recipe.ingredients.is_none());
    }

    #[test]
    fn test_image_preference_order() {
        let ctx = context(
            r#"<html><head>
                <link rel="image_src" href="/link.jpg">
                <meta name="twitter:image" content="https://cdn.example.com/tw.jpg">
                <meta property="og:image" content="//cdn.example.com/og.jpg">
            </head></html>"#,
        );
        assert_eq!(
            MetaTagExtractor.parse(&ctx).unwrap().image_url.as_deref(),
            Some("https://cdn.example.com/og.jpg")
        );

        let ctx = context(r#"<html><head><link rel="image_src" href="/link.jpg"></head></html>"#);
        assert_eq!(
            MetaTagExtractor.parse(&ctx).unwrap().image_url.as_deref(),
            Some("https://www.example.com/link.jpg")
        );
    }

    #[test]
    fn test_skips_unusable_image_tags() {
        let ctx = context(
            r#"<html><head>
                <meta property="og:image:secure_url" content="">
                <meta property="og:image" content="javascript:void(0)">
                <meta name="twitter:image" content="/tw.png">
            </head></html>"#,
        );
        assert_eq!(
            MetaTagExtractor.parse(&ctx).unwrap().image_url.as_deref(),
            Some("https://www.example.com/tw.png")
        );
    }
}
