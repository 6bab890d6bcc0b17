//! Scene-still archetypes and the call budgets of one generation run.

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

/// Upstream calls allowed for the poster itself (primary + one retry).
pub const MAX_POSTER_ATTEMPTS: u32 = 2;
/// Number of scene stills a run tries to return.
pub const SCENE_TARGET: usize = 3;
/// Attempts per archetype (initial call + two adjusted retries).
pub const SCENE_ATTEMPTS_PER_VARIANT: u32 = 3;
/// Extra random-archetype attempts made when the archetypes fall short.
pub const SCENE_SAFETY_FILL_BUDGET: u32 = 5;

/// Hard ceiling on scene calls in one run: 3 x 3 + 5 = 14.
pub const MAX_SCENE_CALLS: u32 =
    SceneVariant::ALL.len() as u32 * SCENE_ATTEMPTS_PER_VARIANT + SCENE_SAFETY_FILL_BUDGET;

/// Hard ceiling on all upstream calls in one run (poster + pitch + scenes).
pub const MAX_UPSTREAM_CALLS: u32 = MAX_POSTER_ATTEMPTS + 1 + MAX_SCENE_CALLS;

// ---------------------------------------------------------------------------
// SceneVariant
// ---------------------------------------------------------------------------

/// One of the fixed shot archetypes used for bonus movie stills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneVariant {
    Action,
    Romance,
    Suspense,
}

impl SceneVariant {
    /// All archetypes, in the order their stills are returned.
    pub const ALL: [SceneVariant; 3] = [
        SceneVariant::Action,
        SceneVariant::Romance,
        SceneVariant::Suspense,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneVariant::Action => "action",
            SceneVariant::Romance => "romance",
            SceneVariant::Suspense => "suspense",
        }
    }

    /// Shot description for this archetype.
    pub fn shot(self) -> &'static str {
        match self {
            SceneVariant::Action => {
                "a high-energy ACTION scene: the cat mid-leap or mid-chase, motion blur, \
                 debris and sparks in the air, dynamic low camera angle"
            }
            SceneVariant::Romance => {
                "a tender ROMANCE scene: the cat sharing a quiet moment with a companion, \
                 soft warm light, shallow depth of field, intimate framing"
            }
            SceneVariant::Suspense => {
                "a tense SUSPENSE scene: the cat peering around a corner or hiding in \
                 shadow, dramatic contrast, something ominous just out of focus"
            }
        }
    }

    /// Extra instruction for the given 1-based attempt number, if any.
    pub fn adjustment(attempt: u32) -> Option<&'static str> {
        match attempt {
            0 | 1 => None,
            2 => Some("Use a clearly different camera angle from any previous attempt."),
            _ => Some("Use different lighting and a different time of day from any previous attempt."),
        }
    }
}

impl std::fmt::Display for SceneVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_call_ceiling_is_fourteen() {
        assert_eq!(MAX_SCENE_CALLS, 14);
        assert_eq!(MAX_UPSTREAM_CALLS, 17);
    }

    #[test]
    fn adjustments_escalate_per_attempt() {
        assert_eq!(SceneVariant::adjustment(1), None);
        assert!(SceneVariant::adjustment(2).unwrap().contains("camera angle"));
        assert!(SceneVariant::adjustment(3).unwrap().contains("time of day"));
    }

    #[test]
    fn archetype_names_are_distinct() {
        let names: Vec<_> = SceneVariant::ALL.iter().map(|v| v.as_str()).collect();
        assert_eq!(names, ["action", "romance", "suspense"]);
    }
}
