//! Display label and download name derivation for generated image paths.
//!
//! Generated filenames follow the `<style>_<rest>` convention; the text
//! before the first underscore is the style name.

/// Style segment of a generated image path.
///
/// A filename with no underscore is its own style name, matching how the
/// server names single-segment files.
pub fn style_name(path: &str) -> &str {
    let name = filename(path);
    name.split('_').next().unwrap_or(name)
}

/// Capitalized style label shown under the rendered image, e.g. "Circle".
pub fn display_label(path: &str) -> String {
    capitalize(style_name(path))
}

/// Value for the download attribute of a result link, e.g. `qr_circle.png`.
pub fn download_name(path: &str) -> String {
    format!("qr_{}.png", style_name(path))
}

fn filename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_label, download_name, style_name};

    #[test]
    fn style_is_text_before_first_underscore() {
        assert_eq!(style_name("static/qr/circle_abc.png"), "circle");
        assert_eq!(style_name("static/qr/gradient_1712_ab12.png"), "gradient");
    }

    #[test]
    fn style_of_underscore_free_filename_is_the_filename() {
        assert_eq!(style_name("static/qr/circle.png"), "circle.png");
    }

    #[test]
    fn display_label_is_capitalized() {
        assert_eq!(display_label("static/qr/circle_abc.png"), "Circle");
        assert_eq!(display_label("logo_17.png"), "Logo");
    }

    #[test]
    fn download_name_uses_raw_style() {
        assert_eq!(download_name("static/qr/circle_abc.png"), "qr_circle.png");
    }

    #[test]
    fn empty_path_yields_empty_label() {
        assert_eq!(display_label(""), "");
        assert_eq!(download_name(""), "qr_.png");
    }
}
