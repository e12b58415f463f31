//! Pure text transforms shared by the extractor and the view layer.

pub mod lines;
pub mod quantity;

pub use lines::{
    normalize_lines, normalize_text, normalize_text_lines, split_instruction_text,
    strip_leading_step_number,
};
pub use quantity::{
    format_quantity, normalize_fraction_glyphs, parse_quantity, scale_leading_quantity,
    scale_servings_label,
};
