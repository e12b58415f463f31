use crate::error::ImportError;
use crate::model::ScrapedRecipe;
use log::debug;
use scraper::Html;
use url::Url;

mod json_ld;
mod meta_tags;
pub mod schema;

pub use json_ld::JsonLdExtractor;
pub use meta_tags::MetaTagExtractor;

pub struct ParsingContext {
    pub url: Url,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(html: &str, url: &Url) -> Self {
        Self {
            url: url.clone(),
            document: Html::parse_document(html),
        }
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<ScrapedRecipe, ImportError>;
}

/// Extract a recipe from an already fetched page.
///
/// Never fails: structured data is tried first, then page metadata, and a
/// page with neither still yields its host as the title.
pub fn extract_from_html(html: &str, page_url: &Url) -> ScrapedRecipe {
    let context = ParsingContext::new(html, page_url);

    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(JsonLdExtractor), Box::new(MetaTagExtractor)];

    for extractor in extractors {
        match extractor.parse(&context) {
            Ok(recipe) => return recipe,
            Err(e) => debug!("Extractor failed for {}: {}", page_url, e),
        }
    }

    ScrapedRecipe::minimal(context.host(), context.host())
}
