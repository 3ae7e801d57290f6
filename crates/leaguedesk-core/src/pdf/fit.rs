use super::metrics::{char_width, text_width, Font};

pub const ELLIPSIS: &str = "...";

/// Size reduction per step when shrinking text to fit.
const SHRINK_STEP: f32 = 0.5;

/// Text and the font size it should be drawn at.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub size: f32,
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
///
/// Returns the input unchanged when it already fits, a bare ellipsis when
/// no prefix fits, and an empty string when not even the ellipsis does.
pub fn truncate_to_fit(text: &str, font: Font, size: f32, max_width: f32) -> String {
    if text_width(text, font, size) <= max_width {
        return text.to_string();
    }
    let ellipsis = text_width(ELLIPSIS, font, size);
    if ellipsis > max_width {
        return String::new();
    }

    let fits = |units: u32| units as f32 * size / 1000.0 <= max_width;
    let mut used: u32 = ELLIPSIS.chars().map(|c| char_width(c, font) as u32).sum();
    let mut end = 0;
    for (idx, c) in text.char_indices() {
        let next = used + char_width(c, font) as u32;
        if !fits(next) {
            break;
        }
        used = next;
        end = idx + c.len_utf8();
    }
    format!("{}{}", text[..end].trim_end(), ELLIPSIS)
}

/// Shrink the font in half-point steps down to `min_size`, then truncate.
pub fn fit_text(text: &str, font: Font, size: f32, min_size: f32, max_width: f32) -> FittedText {
    let mut current = size;
    while current > min_size && text_width(text, font, current) > max_width {
        current = (current - SHRINK_STEP).max(min_size);
    }
    FittedText {
        text: truncate_to_fit(text, font, current, max_width),
        size: current,
    }
}
