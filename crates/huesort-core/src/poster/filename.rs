//! Poster filenames derived from film titles.

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

const EXTENSION: &str = ".jpg";

/// Appended to a poster's filename while it is being written.
pub(crate) const PART_SUFFIX: &str = ".part";

/// Used when nothing usable is left of the title.
const FALLBACK_STEM: &str = "untitled";

/// Turns a film title into a filename stem that stays inside the posters dir.
///
/// - Replaces NUL, `/`, `\`, control characters and `<>:"|?*` with `_`
/// - Collapses consecutive underscores it introduced
/// - Trims leading/trailing spaces and dots
/// - Limits length so that `stem + ".jpg.part"` fits NAME_MAX
///
/// Letters outside ASCII and inner spaces are kept: `Amélie` stays `Amélie`.
pub fn sanitize_film_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        let bad = c == '\0'
            || c == '/'
            || c == '\\'
            || c.is_control()
            || matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*');
        if bad {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c == ' ' || c == '.');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
        return FALLBACK_STEM.to_string();
    }

    let max = NAME_MAX - EXTENSION.len() - PART_SUFFIX.len();
    if trimmed.len() > max {
        let mut take = max;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].trim_end_matches([' ', '.']).to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<sanitized name>.jpg`
pub fn poster_file_name(film_name: &str) -> String {
    format!("{}{}", sanitize_film_name(film_name), EXTENSION)
}
