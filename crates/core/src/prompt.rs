//! Prompt construction for poster, pitch and scene-still calls.
//!
//! Structure is fixed; content is randomised through a [`Picker`] (movie,
//! theme) and every prompt ends with a [`UniquenessToken`] so the upstream
//! model never sees two identical requests.

use std::fmt;

use crate::picker::{pick, Picker};
use crate::scene::SceneVariant;

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Movies the cat can star in.
pub const MOVIES: &[&str] = &[
    "Jaws",
    "The Godfather",
    "Casablanca",
    "Star Wars",
    "The Matrix",
    "Titanic",
    "Jurassic Park",
    "Back to the Future",
    "Raiders of the Lost Ark",
    "The Terminator",
    "Alien",
    "Ghostbusters",
    "Top Gun",
    "Rocky",
    "The Shining",
    "Pulp Fiction",
    "Gladiator",
    "The Lord of the Rings",
    "Mad Max: Fury Road",
    "Die Hard",
    "E.T. the Extra-Terrestrial",
    "Psycho",
    "Vertigo",
    "The Wizard of Oz",
    "Singin' in the Rain",
    "Blade Runner",
    "Inception",
    "Interstellar",
    "The Good, the Bad and the Ugly",
    "Mission: Impossible",
    "King Kong",
    "Breakfast at Tiffany's",
];

/// Visual treatments applied to the poster.
pub const THEMES: &[&str] = &[
    "psychedelic",
    "film noir",
    "cyberpunk",
    "steampunk",
    "vaporwave",
    "art deco",
    "1950s pulp paperback",
    "spaghetti western",
    "hand-painted watercolor",
    "1980s synthwave",
    "gothic horror",
    "technicolor musical",
    "Swiss minimalist",
    "comic book pop art",
    "ukiyo-e woodblock print",
];

// ---------------------------------------------------------------------------
// Uniqueness tokens
// ---------------------------------------------------------------------------

/// Per-call token rendered as `<label>:<unix-millis>-<random>`.
///
/// Labels are distinct for every call in one run (`poster`, `poster-retry-1`,
/// `pitch`, `scene-action-1`, `fill-2`, ...), so two tokens of the same run
/// never collide even when minted in the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniquenessToken {
    label: String,
    timestamp_ms: i64,
    suffix: String,
}

impl UniquenessToken {
    pub fn mint(label: impl Into<String>, picker: &dyn Picker) -> Self {
        Self {
            label: label.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            suffix: picker.suffix(),
        }
    }
}

impl fmt::Display for UniquenessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.label, self.timestamp_ms, self.suffix)
    }
}

/// Marker preceding the token in every prompt.
pub const TOKEN_MARKER: &str = "Request id: ";

/// Extract the uniqueness token from a rendered prompt.
pub fn token_of(prompt: &str) -> Option<&str> {
    let start = prompt.rfind(TOKEN_MARKER)? + TOKEN_MARKER.len();
    prompt[start..].split_whitespace().next()
}

// ---------------------------------------------------------------------------
// Brief
// ---------------------------------------------------------------------------

/// Movie and theme chosen once per run and shared by all its prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterBrief {
    pub movie: &'static str,
    pub theme: &'static str,
}

impl PosterBrief {
    pub fn draw(picker: &dyn Picker) -> Self {
        Self {
            movie: *pick(picker, MOVIES),
            theme: *pick(picker, THEMES),
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

fn with_token(mut prompt: String, token: &UniquenessToken) -> String {
    prompt.push_str("\n\n");
    prompt.push_str(TOKEN_MARKER);
    prompt.push_str(&token.to_string());
    prompt.push_str(
        "\nThis is a brand-new request: do not reuse or reproduce any image you produced before.",
    );
    prompt
}

fn poster_body(brief: &PosterBrief, user_prompt: Option<&str>) -> String {
    let mut prompt = format!(
        "Create a theatrical movie poster for \"{movie}\" reimagined in a {theme} style. \
         The cat in the attached photo is the star: keep its face, fur pattern and colours \
         recognisable and make it the focal point of the composition. Include the movie \
         title as poster typography and a short tagline.",
        movie = brief.movie,
        theme = brief.theme,
    );
    if let Some(direction) = user_prompt {
        prompt.push_str("\nAdditional direction from the requester: ");
        prompt.push_str(direction);
    }
    prompt
}

/// Prompt for the primary poster call.
pub fn poster_prompt(
    brief: &PosterBrief,
    user_prompt: Option<&str>,
    token: &UniquenessToken,
) -> String {
    let mut prompt = poster_body(brief, user_prompt);
    prompt.push_str("\nReturn the poster as an image.");
    with_token(prompt, token)
}

/// Prompt for the single retry after the model answered without an image.
pub fn poster_retry_prompt(
    brief: &PosterBrief,
    user_prompt: Option<&str>,
    token: &UniquenessToken,
) -> String {
    let mut prompt = poster_body(brief, user_prompt);
    prompt.push_str(
        "\nIMPORTANT: respond with an IMAGE ONLY. Do not answer with text, commentary, \
         questions or refusals. Generate the poster image now.",
    );
    with_token(prompt, token)
}

/// Prompt asking for a short pitch of the generated poster.
pub fn pitch_prompt(brief: &PosterBrief, token: &UniquenessToken) -> String {
    let prompt = format!(
        "The attached image is a {theme} movie poster for a cat-starring version of \
         \"{movie}\". Write a punchy two or three sentence movie pitch for it, as a \
         trailer narrator would read it aloud. Reply with the pitch text only.",
        movie = brief.movie,
        theme = brief.theme,
    );
    with_token(prompt, token)
}

/// Prompt for one scene-still attempt. `attempt` is 1-based.
pub fn scene_prompt(
    variant: SceneVariant,
    brief: &PosterBrief,
    attempt: u32,
    token: &UniquenessToken,
) -> String {
    let mut prompt = format!(
        "Create a cinematic movie still from a {theme} cat version of \"{movie}\" \
         featuring the cat in the attached photo. Show {shot}. This is a frame from the \
         film itself, NOT a poster: no title text, no credits, no tagline, no borders and \
         no poster layout. Widescreen framing.",
        theme = brief.theme,
        movie = brief.movie,
        shot = variant.shot(),
    );
    if let Some(adjustment) = SceneVariant::adjustment(attempt) {
        prompt.push('\n');
        prompt.push_str(adjustment);
    }
    prompt.push_str("\nReturn an image.");
    with_token(prompt, token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Always picks the first entry and uses a constant suffix.
    struct FirstPicker;

    impl Picker for FirstPicker {
        fn pick_index(&self, _len: usize) -> usize {
            0
        }

        fn suffix(&self) -> String {
            "abc12345".to_string()
        }
    }

    #[test]
    fn catalogs_have_expected_sizes() {
        assert_eq!(THEMES.len(), 15);
        assert!((30..=40).contains(&MOVIES.len()));
    }

    #[test]
    fn brief_uses_picker() {
        let brief = PosterBrief::draw(&FirstPicker);
        assert_eq!(brief.movie, "Jaws");
        assert_eq!(brief.theme, "psychedelic");
    }

    #[test]
    fn token_has_label_timestamp_and_suffix() {
        let token = UniquenessToken::mint("poster", &FirstPicker).to_string();
        let (label, rest) = token.split_once(':').unwrap();
        let (millis, suffix) = rest.split_once('-').unwrap();
        assert_eq!(label, "poster");
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(suffix, "abc12345");
    }

    #[test]
    fn poster_prompt_has_exact_content() {
        let brief = PosterBrief::draw(&FirstPicker);
        let token = UniquenessToken::mint("poster", &FirstPicker);
        let prompt = poster_prompt(&brief, Some("wearing sunglasses"), &token);

        assert!(prompt.starts_with(
            "Create a theatrical movie poster for \"Jaws\" reimagined in a psychedelic style."
        ));
        assert!(prompt.contains("Additional direction from the requester: wearing sunglasses"));
        assert_eq!(token_of(&prompt), Some(token.to_string().as_str()));
    }

    #[test]
    fn retry_prompt_demands_image_only() {
        let brief = PosterBrief::draw(&FirstPicker);
        let token = UniquenessToken::mint("poster-retry", &FirstPicker);
        let prompt = poster_retry_prompt(&brief, None, &token);
        assert!(prompt.contains("IMAGE ONLY"));
        assert!(!prompt.contains("Additional direction"));
        assert!(token_of(&prompt).unwrap().starts_with("poster-retry:"));
    }

    #[test]
    fn scene_prompt_forbids_poster_layout_and_escalates() {
        let brief = PosterBrief::draw(&FirstPicker);
        let token = UniquenessToken::mint("scene-suspense-3", &FirstPicker);
        let prompt = scene_prompt(SceneVariant::Suspense, &brief, 3, &token);
        assert!(prompt.contains("NOT a poster"));
        assert!(prompt.contains("SUSPENSE"));
        assert!(prompt.contains("time of day"));

        let first = scene_prompt(SceneVariant::Action, &brief, 1, &token);
        assert!(!first.contains("camera angle from any previous"));
    }

    #[test]
    fn pitch_prompt_mentions_movie_and_theme() {
        let brief = PosterBrief::draw(&FirstPicker);
        let token = UniquenessToken::mint("pitch", &FirstPicker);
        let prompt = pitch_prompt(&brief, &token);
        assert!(prompt.contains("\"Jaws\""));
        assert!(prompt.contains("psychedelic"));
        assert!(token_of(&prompt).unwrap().starts_with("pitch:"));
    }

    #[test]
    fn token_of_returns_none_without_marker() {
        assert_eq!(token_of("no token here"), None);
    }
}
