//! Image-generation prompt building.
//!
//! A prompt is a `" | "`-joined list of parts: base style, up to three
//! visual keywords derived from the song's style description, an optional
//! mood, the scene description, and a fixed technical suffix.

use serde::{Deserialize, Serialize};

use crate::markers::{classify_marker, marker_label, MarkerKind};
use crate::segment::clean_lyric_text;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_STYLE: &str = "photorealistic, cinematic";

pub const ABSTRACT_MUSIC_SCENE: &str = "Abstract visual interpretation of the music";

pub const GAP_FILLER_SCENE: &str = "Ambient atmospheric transition, soft drifting light and texture";

pub const TECHNICAL_SUFFIX: &str = "16:9 aspect ratio, high quality, cinematic composition";

pub const PROMPT_SEPARATOR: &str = " | ";

/// Visual keywords taken from the style description into each prompt.
pub const MAX_PROMPT_KEYWORDS: usize = 3;

/// Genre words and the visual vocabulary they translate to, in match order.
pub const GENRE_VISUALS: &[(&str, &str)] = &[
    ("electronic", "neon, digital, futuristic"),
    ("synthwave", "retro-futuristic, neon, 80s aesthetic, purple and pink"),
    ("rock", "dynamic, energetic, gritty"),
    ("metal", "dark, intense, dramatic lighting"),
    ("jazz", "moody, noir, sophisticated"),
    ("classical", "elegant, timeless, refined"),
    ("folk", "natural, organic, earthy"),
    ("country", "rustic, americana, warm tones"),
    ("hip-hop", "urban, vibrant, street culture"),
    ("ambient", "ethereal, atmospheric, dreamlike"),
    ("trance", "cosmic, transcendent, flowing"),
    ("house", "energetic, colorful, club atmosphere"),
    ("techno", "industrial, minimalist, stark"),
    ("indie", "artistic, authentic, creative"),
    ("pop", "bright, colorful, polished"),
    ("soul", "warm, emotional, intimate"),
    ("blues", "moody, emotional, atmospheric"),
    ("punk", "raw, rebellious, high contrast"),
    ("psychedelic", "surreal, colorful, mind-bending"),
    ("progressive", "complex, layered, evolving"),
    ("cosmic", "space, galaxies, stars, nebulae"),
    ("cinematic", "dramatic, movie-quality, epic"),
    ("orchestral", "grand, sweeping, majestic"),
];

/// Mood words checked in order; the first match wins.
pub const MOOD_KEYWORDS: &[&str] = &[
    "dark",
    "bright",
    "moody",
    "uplifting",
    "melancholic",
    "energetic",
    "calm",
    "intense",
    "dreamy",
    "powerful",
    "gentle",
    "dramatic",
];

// ---------------------------------------------------------------------------
// Style extraction
// ---------------------------------------------------------------------------

/// Visual cues extracted from a free-text song style description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleElements {
    pub visual_keywords: Vec<String>,
    pub mood: Option<String>,
}

/// Extract genre visuals and a mood from a style description.
///
/// Matching is case-insensitive substring matching.
pub fn extract_style_elements(style_text: &str) -> StyleElements {
    let lower = style_text.to_lowercase();
    if lower.trim().is_empty() {
        return StyleElements::default();
    }

    let visual_keywords = GENRE_VISUALS
        .iter()
        .filter(|(genre, _)| lower.contains(genre))
        .flat_map(|(_, visuals)| visuals.split(", "))
        .map(str::to_string)
        .collect();

    let mood = MOOD_KEYWORDS
        .iter()
        .find(|m| lower.contains(*m))
        .map(|m| m.to_string());

    StyleElements {
        visual_keywords,
        mood,
    }
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds prompts for lyric, instrumental and gap-filler scenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBuilder {
    pub base_style: String,
    pub style: StyleElements,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            base_style: DEFAULT_BASE_STYLE.to_string(),
            style: StyleElements::default(),
        }
    }
}

impl PromptBuilder {
    pub fn new(base_style: impl Into<String>, style: StyleElements) -> Self {
        Self {
            base_style: base_style.into(),
            style,
        }
    }

    /// Builder from a base style and a free-text style description.
    pub fn from_style_text(base_style: impl Into<String>, style_text: &str) -> Self {
        Self::new(base_style, extract_style_elements(style_text))
    }

    /// Prompt for a group of sung lines.
    ///
    /// Background vocals in parentheses are dropped. A lone section marker
    /// becomes the abstract music scene; any other bracketed tag is read as
    /// a mood (`[Emotional]` gives `"Emotional atmosphere"`).
    pub fn lyric_prompt(&self, lyric_text: &str) -> String {
        self.compose(&describe_lyric(lyric_text))
    }

    /// Prompt for an instrumental section, optionally naming it.
    pub fn instrumental_prompt(&self, label: Option<&str>) -> String {
        let scene = match label {
            Some(label) if !label.trim().is_empty() => {
                format!("{ABSTRACT_MUSIC_SCENE}, {} section", label.trim().to_lowercase())
            }
            _ => ABSTRACT_MUSIC_SCENE.to_string(),
        };
        self.compose(&scene)
    }

    /// Generic prompt for a synthetic group covering a silent stretch.
    pub fn gap_filler_prompt(&self) -> String {
        self.compose(GAP_FILLER_SCENE)
    }

    fn compose(&self, scene: &str) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5);
        if !self.base_style.trim().is_empty() {
            parts.push(self.base_style.trim().to_string());
        }
        if !self.style.visual_keywords.is_empty() {
            let keywords: Vec<&str> = self
                .style
                .visual_keywords
                .iter()
                .take(MAX_PROMPT_KEYWORDS)
                .map(String::as_str)
                .collect();
            parts.push(keywords.join(", "));
        }
        if let Some(mood) = &self.style.mood {
            parts.push(format!("{mood} atmosphere"));
        }
        parts.push(format!("scene depicting: {scene}"));
        parts.push(TECHNICAL_SUFFIX.to_string());
        parts.join(PROMPT_SEPARATOR)
    }
}

fn describe_lyric(lyric_text: &str) -> String {
    let cleaned = clean_lyric_text(lyric_text);
    if cleaned.is_empty() {
        return ABSTRACT_MUSIC_SCENE.to_string();
    }
    if classify_marker(&cleaned) != MarkerKind::Lyric {
        return ABSTRACT_MUSIC_SCENE.to_string();
    }
    match marker_label(&cleaned).map(capitalize) {
        Some(mood) => format!("{mood} atmosphere"),
        None => cleaned,
    }
}

fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- extract_style_elements ----------------------------------------------

    #[test]
    fn empty_style_has_no_elements() {
        assert_eq!(extract_style_elements("   "), StyleElements::default());
    }

    #[test]
    fn extracts_genre_visuals_in_table_order() {
        let style = extract_style_elements("Dreamy synthwave with electronic drums");
        assert_eq!(
            &style.visual_keywords[..4],
            &["neon", "digital", "futuristic", "retro-futuristic"]
        );
        assert_eq!(style.mood.as_deref(), Some("dreamy"));
    }

    #[test]
    fn first_mood_in_list_wins() {
        let style = extract_style_elements("gentle but dark folk ballad");
        assert_eq!(style.mood.as_deref(), Some("dark"));
        assert_eq!(style.visual_keywords, vec!["natural", "organic", "earthy"]);
    }

    // -- PromptBuilder -------------------------------------------------------

    #[test]
    fn plain_lyric_prompt() {
        let prompt = PromptBuilder::default().lyric_prompt("We are stardust (stardust)");
        assert_eq!(
            prompt,
            "photorealistic, cinematic | scene depicting: We are stardust | \
             16:9 aspect ratio, high quality, cinematic composition"
        );
    }

    #[test]
    fn style_keywords_capped_at_three() {
        let builder = PromptBuilder::from_style_text("cinematic", "moody jazz and blues");
        let prompt = builder.lyric_prompt("Rain on the window");
        assert!(prompt.starts_with("cinematic | moody, noir, sophisticated | moody atmosphere | "));
        assert!(prompt.contains("scene depicting: Rain on the window"));
    }

    #[test]
    fn section_marker_becomes_abstract_scene() {
        let prompt = PromptBuilder::default().lyric_prompt("[Chorus]");
        assert!(prompt.contains(&format!("scene depicting: {ABSTRACT_MUSIC_SCENE}")));
    }

    #[test]
    fn mood_tag_becomes_atmosphere() {
        let prompt = PromptBuilder::default().lyric_prompt("[EMOTIONAL]");
        assert!(prompt.contains("scene depicting: Emotional atmosphere"));
    }

    #[test]
    fn background_only_line_falls_back_to_abstract() {
        let prompt = PromptBuilder::default().lyric_prompt("(ooh ooh)");
        assert!(prompt.contains(ABSTRACT_MUSIC_SCENE));
    }

    #[test]
    fn instrumental_prompt_names_section() {
        let prompt = PromptBuilder::default().instrumental_prompt(Some("Guitar Solo"));
        assert!(prompt.contains("guitar solo section"));
        let bare = PromptBuilder::default().instrumental_prompt(None);
        assert!(bare.contains(&format!("scene depicting: {ABSTRACT_MUSIC_SCENE} |")));
    }

    #[test]
    fn gap_filler_prompt_uses_filler_scene() {
        let prompt = PromptBuilder::default().gap_filler_prompt();
        assert!(prompt.contains(GAP_FILLER_SCENE));
        assert!(prompt.ends_with(TECHNICAL_SUFFIX));
    }

    #[test]
    fn empty_base_style_is_omitted() {
        let builder = PromptBuilder::new("", StyleElements::default());
        assert!(builder.lyric_prompt("hi there").starts_with("scene depicting: hi there"));
    }
}
