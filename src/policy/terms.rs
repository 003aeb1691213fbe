//! Period vocabulary for generation prompts.

/// Terms describing post-1996 design or technology; not allowed in visual prompts.
pub const FORBIDDEN_DESIGN_TERMS: &[&str] = &[
    "gradient",
    "web 2.0",
    "flat design",
    "material design",
    "minimalist",
    "responsive",
    "user experience",
    "UX",
    "UI",
    "wireframe",
    "mobile",
    "touch",
    "swipe",
    "drag and drop",
    "USB",
    "wireless",
    "bluetooth",
    "LED",
    "LCD",
    "plasma",
    "broadband",
    "wifi",
    "streaming",
    "social media",
    "tweet",
    "post",
    "share",
    "like",
    "hashtag",
    "smartphone",
    "tablet",
    "app",
    "notification",
    "cloud",
    "sync",
    "HD",
    "4K",
    "1080p",
    "widescreen",
    "16:9",
    "retina",
    "SSD",
    "flash drive",
    "emoji",
    "gif",
    "meme",
    "Google",
    "Facebook",
    "Twitter",
    "Instagram",
    "Pinterest",
    "Windows 95",
    "Windows 98",
    "Windows XP",
    "anti-aliasing",
    "smoothing",
    "blur radius",
    "soft shadow",
    "opacity slider",
    "layer mask",
    "bezier curve",
    "vector graphics",
    "SVG",
    "AI",
    "photoshop",
];

/// Modern terms that stay legal because they describe the pixel-art tooling itself.
pub const ALLOWED_MODERN_TERMS: &[&str] = &[
    "aseprite",
    "github",
    "version control",
    "export",
    "layer",
    "sprite sheet",
    "animation",
    "timeline",
    "pixel-perfect",
    "hex code",
    "rgb",
    "alpha channel",
    "transparent",
    "png",
];

/// When a prompt mentions a category, it must also name one of the period-correct terms.
pub const REQUIRED_VISUAL_TERMS: &[(&str, &[&str])] = &[
    ("mouse", &["Apple", "Macintosh", "M0100", "beige", "one-button"]),
    ("computer", &["Macintosh Plus", "System 6", "black and white"]),
    ("software", &["MacPaint", "pixel", "bitmap", "72 DPI"]),
    ("storage", &["floppy disk", "1.44MB", "3.5 inch"]),
    ("display", &["CRT", "monitor", "512x342", "monochrome"]),
];

fn is_word_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// `true` when `needle` occurs in `haystack` delimited by word boundaries.
///
/// Both inputs are expected in lowercase. A boundary sits between a word and a non-word
/// character, so `"ui"` matches `"a ui kit"` but not `"build"`.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let boundary = |idx: usize| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx..].chars().next();
        is_word_char(before) != is_word_char(after)
    };
    haystack
        .match_indices(needle)
        .any(|(start, m)| boundary(start) && boundary(start + m.len()))
}

#[cfg(test)]
#[path = "../../tests/unit/policy/terms.rs"]
mod tests;
