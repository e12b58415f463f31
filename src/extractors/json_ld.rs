use super::{Extractor, ParsingContext};
use crate::error::ImportError;
use crate::extractors::meta_tags::{page_image, title_or_host};
use crate::extractors::schema::{
    collect_ingredients, collect_steps, first_scalar_text, resolve_image, text_value, YIELD_KEYS,
};
use crate::model::ScrapedRecipe;
use crate::text::{normalize_text, parse_quantity};
use log::debug;
use regex::Regex;
use scraper::Selector;
use serde_json::Value;
use std::sync::LazyLock;

pub struct JsonLdExtractor;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());

impl JsonLdExtractor {
    fn convert_to_recipe(&self, node: &Value, context: &ParsingContext) -> ScrapedRecipe {
        let title = node
            .get("name")
            .and_then(text_value)
            .unwrap_or_else(|| title_or_host(context));

        let description = node.get("description").and_then(text_value);

        let servings_text = YIELD_KEYS
            .iter()
            .filter_map(|key| node.get(*key))
            .find_map(first_scalar_text)
            .map(|text| normalize_text(&text))
            .filter(|text| !text.is_empty());
        let servings = servings_text.as_deref().and_then(parse_quantity);

        let ingredients = node
            .get("recipeIngredient")
            .or_else(|| node.get("ingredients"))
            .map(collect_ingredients)
            .filter(|lines| !lines.is_empty());

        let instructions = node
            .get("recipeInstructions")
            .map(collect_steps)
            .filter(|steps| !steps.is_empty());

        let image_url = node
            .get("image")
            .and_then(|image| resolve_image(image, &context.url))
            .or_else(|| page_image(&context.document, &context.url));

        ScrapedRecipe {
            title,
            description,
            image_url,
            servings,
            servings_text,
            ingredients,
            instructions,
            source_host: context.host().to_string(),
        }
    }
}

/// Script blocks declaring linked data, tolerating case and parameters
/// such as `application/ld+json; charset=utf-8`.
fn is_ld_json(type_attr: &str) -> bool {
    type_attr
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/ld+json"))
}

/// Parse a block, retrying once after stripping common CMS debris.
fn parse_block(raw: &str) -> Result<Value, ImportError> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            let cleaned = sanitize_json(raw);
            serde_json::from_str::<Value>(&cleaned)
                .map_err(|_| ImportError::ParseError(first_error.to_string()))
        }
    }
}

fn sanitize_json(json_str: &str) -> String {
    let stripped = json_str
        .replace("<![CDATA[", "")
        .replace("]]>", "")
        .replace("<!--", "")
        .replace("-->", "");
    TRAILING_COMMA
        .replace_all(stripped.trim(), "$1")
        .into_owned()
}

/// Flatten arrays and graph wrappers into a list of candidate nodes.
fn collect_nodes<'a>(value: &'a Value, nodes: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_nodes(item, nodes)),
        Value::Object(map) => {
            nodes.push(value);
            for key in ["@graph", "mainEntity"] {
                if let Some(inner) = map.get(key) {
                    collect_nodes(inner, nodes);
                }
            }
        }
        _ => {}
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<ScrapedRecipe, ImportError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector = Selector::parse("script[type]").unwrap();

        let blocks: Vec<Value> = context
            .document
            .select(&selector)
            .filter(|script| script.value().attr("type").is_some_and(is_ld_json))
            .enumerate()
            .filter_map(|(index, script)| {
                match parse_block(&script.text().collect::<String>()) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!("JsonLdExtractor: Skipping JSON-LD block {}: {}", index, e);
                        None
                    }
                }
            })
            .collect();
        debug!("JsonLdExtractor: Parsed {} JSON-LD blocks", blocks.len());

        let mut nodes = Vec::new();
        for block in &blocks {
            collect_nodes(block, &mut nodes);
        }

        match nodes.into_iter().find(|node| is_recipe_type(node)) {
            Some(node) => {
                debug!("JsonLdExtractor: Found recipe node");
                Ok(self.convert_to_recipe(node, context))
            }
            None => Err(ImportError::ParseError(
                "No recipe node found in any JSON-LD script".to_string(),
            )),
        }
    }
}
