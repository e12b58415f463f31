//! Display model for one recipe.
//!
//! Nothing here is persisted: the multiplier and the checked ingredients live
//! with the client and are applied when rendering.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{Recipe, ScrapeStatus};
use crate::text::{normalize_lines, scale_leading_quantity, strip_leading_step_number};

pub const MIN_MULTIPLIER: f64 = 0.1;
pub const MAX_MULTIPLIER: f64 = 10.0;

/// Clamp a multiplier to the supported range. Non-finite input means 1.
pub fn clamp_multiplier(multiplier: f64) -> f64 {
    if multiplier.is_finite() {
        multiplier.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    } else {
        1.0
    }
}

/// Per-recipe client state
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    multiplier: f64,
    checked: BTreeSet<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            checked: BTreeSet::new(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multiplier(multiplier: f64) -> Self {
        let mut state = Self::default();
        state.set_multiplier(multiplier);
        state
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Set the multiplier and return the value actually applied
    pub fn set_multiplier(&mut self, multiplier: f64) -> f64 {
        self.multiplier = clamp_multiplier(multiplier);
        self.multiplier
    }

    /// Flip the checkbox of ingredient `index`; returns the new state
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.checked.remove(&index) {
            false
        } else {
            self.checked.insert(index);
            true
        }
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    pub fn clear_checked(&mut self) {
        self.checked.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLine {
    pub text: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeView {
    pub title: String,
    pub source_url: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub servings_label: Option<String>,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<String>,
    pub scrape_status: ScrapeStatus,
    /// Shown verbatim next to the retry action
    pub scrape_error: Option<String>,
}

pub fn render(recipe: &Recipe, state: &ViewState) -> RecipeView {
    let multiplier = state.multiplier();

    let ingredients = normalize_lines(recipe.ingredients.as_ref())
        .iter()
        .enumerate()
        .map(|(index, line)| IngredientLine {
            text: scale_leading_quantity(line, multiplier),
            checked: state.is_checked(index),
        })
        .collect();

    let steps = normalize_lines(recipe.instructions.as_ref())
        .iter()
        .map(|line| strip_leading_step_number(line))
        .filter(|line| !line.is_empty())
        .collect();

    RecipeView {
        title: recipe.title.clone(),
        source_url: recipe.source_url.clone(),
        description: recipe.description.clone(),
        image_url: recipe.image_url.clone(),
        servings_label: recipe.servings_label(multiplier),
        ingredients,
        steps,
        scrape_status: recipe.scrape_status,
        scrape_error: recipe.scrape_error.clone(),
    }
}

impl fmt::Display for RecipeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.source_url)?;
        if let Some(error) = &self.scrape_error {
            writeln!(f, "\nScrape {}: {}", self.scrape_status.as_str(), error)?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "\n{description}")?;
        }
        if let Some(label) = &self.servings_label {
            writeln!(f, "\n{label}")?;
        }
        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients")?;
            for line in &self.ingredients {
                let mark = if line.checked { "x" } else { " " };
                writeln!(f, "  [{mark}] {}", line.text)?;
            }
        }
        if !self.steps.is_empty() {
            writeln!(f, "\nInstructions")?;
            for (index, step) in self.steps.iter().enumerate() {
                writeln!(f, "  {}. {}", index + 1, step)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StoredLines;
    use chrono::Utc;

    fn recipe() -> Recipe {
        let now = Utc::now();
        Recipe {
            id: 3,
            owner_id: 1,
            source_url: "https://example.com/pancakes".to_string(),
            title: "Pancakes".to_string(),
            description: None,
            image_url: None,
            servings: Some(4.0),
            servings_text: Some("4 servings".to_string()),
            ingredients: Some(StoredLines::from(vec![
                "1 1/2 cups flour".to_string(),
                "2 eggs".to_string(),
                "pinch of salt".to_string(),
            ])),
            instructions: Some(StoredLines::from("1. Whisk.\n\n2) Fry.\nStep 3: Eat.")),
            source_host: "example.com".to_string(),
            scrape_status: ScrapeStatus::Ok,
            scrape_error: None,
            last_scraped_at: Some(now),
            notes: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_clamp_multiplier() {
        assert_eq!(clamp_multiplier(2.0), 2.0);
        assert_eq!(clamp_multiplier(0.0), MIN_MULTIPLIER);
        assert_eq!(clamp_multiplier(25.0), MAX_MULTIPLIER);
        assert_eq!(clamp_multiplier(f64::NAN), 1.0);
    }

    #[test]
    fn test_toggle_checked() {
        let mut state = ViewState::new();
        assert!(state.toggle(1));
        assert!(state.is_checked(1));
        assert!(!state.toggle(1));
        assert!(!state.is_checked(1));
    }

    #[test]
    fn test_render_scaled() {
        let mut state = ViewState::with_multiplier(2.0);
        state.toggle(1);
        let view = render(&recipe(), &state);

        assert_eq!(view.servings_label.as_deref(), Some("Serves 8"));
        assert_eq!(
            view.ingredients,
            vec![
                IngredientLine { text: "3 cups flour".to_string(), checked: false },
                IngredientLine { text: "4 eggs".to_string(), checked: true },
                IngredientLine { text: "pinch of salt".to_string(), checked: false },
            ]
        );
        assert_eq!(view.steps, vec!["Whisk.", "Fry.", "Eat."]);
    }

    #[test]
    fn test_render_error_state_keeps_link() {
        let mut recipe = recipe();
        recipe.scrape_status = ScrapeStatus::Error;
        recipe.scrape_error = Some("Failed to fetch https://example.com/pancakes: HTTP 404".to_string());
        recipe.ingredients = None;
        recipe.instructions = None;

        let view = render(&recipe, &ViewState::new());
        let text = view.to_string();

        assert!(view.ingredients.is_empty());
        assert!(text.contains("https://example.com/pancakes"));
        assert!(text.contains("Scrape error: Failed to fetch https://example.com/pancakes: HTTP 404"));
    }
}
