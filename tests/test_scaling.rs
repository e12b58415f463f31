use recipebox::{
    format_quantity, normalize_lines, parse_quantity, scale_leading_quantity,
    scale_servings_label, strip_leading_step_number, ScrapedRecipe, StoredLines,
};

#[test]
fn test_parse_quantity_examples() {
    assert_eq!(parse_quantity("1/4"), Some(0.25));
    assert_eq!(parse_quantity("1 1/2"), Some(1.5));
    assert_eq!(parse_quantity("2.5"), Some(2.5));
    assert_eq!(parse_quantity("¾"), Some(0.75));
    assert_eq!(parse_quantity("pinch"), None);
}

#[test]
fn test_format_quantity_examples() {
    assert_eq!(format_quantity(1.5), "1 1/2");
    assert_eq!(format_quantity(3.0), "3");
    assert_eq!(format_quantity(1.0 / 3.0), "0.33");
    assert_eq!(format_quantity(0.1 * 3.0), "0.3");
}

#[test]
fn test_scale_leading_quantity_examples() {
    assert_eq!(scale_leading_quantity("2 cups flour", 2.0), "4 cups flour");
    assert_eq!(scale_leading_quantity("1-2 eggs", 2.0), "2 - 4 eggs");
    assert_eq!(scale_leading_quantity("a pinch of salt", 3.0), "a pinch of salt");
    assert_eq!(scale_leading_quantity("¼ cup oil", 0.5), "1/8 cup oil");
}

#[test]
fn test_scaling_is_identity_at_one() {
    let lines = [
        "2 cups flour",
        "1 ½ cups sugar",
        "3-4 apples",
        "Salt to taste",
        "1/0 weird",
    ];
    for line in lines {
        assert_eq!(scale_leading_quantity(line, 1.0), line);
    }
}

#[test]
fn test_servings_label_round_trip() {
    let recipe = ScrapedRecipe {
        servings: Some(4.0),
        ..ScrapedRecipe::minimal("Stew", "example.com")
    };
    assert_eq!(recipe.servings_label(2.0).as_deref(), Some("Serves 8"));
    assert_eq!(scale_servings_label(None, None, 2.0), None);
}

#[test]
fn test_list_normalizer_examples() {
    let list = StoredLines::from(vec!["  a  ".to_string(), "".to_string(), "b".to_string()]);
    assert_eq!(normalize_lines(Some(&list)), vec!["a", "b"]);

    let blob = StoredLines::from("a\r\nb\n\nc");
    assert_eq!(normalize_lines(Some(&blob)), vec!["a", "b", "c"]);

    assert_eq!(strip_leading_step_number("1. Preheat oven"), "Preheat oven");
    assert_eq!(strip_leading_step_number("Preheat oven"), "Preheat oven");
}
