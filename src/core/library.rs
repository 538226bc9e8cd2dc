//! Built-in song library: an offline content provider
//!
//! Lets the game run without a generative backend. Entries carry a minimum
//! difficulty so early levels draw from the well-known songs and deep cuts
//! only appear once the player has climbed.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::providers::ContentProvider;
use crate::types::{Challenge, ContentError};

struct SongEntry {
    title: &'static str,
    clues: &'static [&'static str],
    image_prompt: &'static str,
    /// Lowest difficulty at which this entry may be served
    min_difficulty: u32,
}

static LIBRARY: &[SongEntry] = &[
    SongEntry {
        title: "The Hills",
        clues: &[
            "A confession whispered when the city's asleep, where desire meets danger.",
            "Flames engulf a car in its visual story, a descent into a darker self.",
            "Released around 2015, a shift toward the mainstream that kept its shadows.",
        ],
        image_prompt: "A burning luxury car crashed on a dark desolate road, eerie red glow against a twilight sky",
        min_difficulty: 1,
    },
    SongEntry {
        title: "Blinding Lights",
        clues: &[
            "Neon streaks past an empty windshield; someone drives toward a phone that won't ring.",
            "An eighties pulse under a modern heartbreak, inescapable on every radio.",
        ],
        image_prompt: "A lone car speeding through a neon-drenched city at night, synthwave palette, motion blur",
        min_difficulty: 1,
    },
    SongEntry {
        title: "Starboy",
        clues: &[
            "A crimson sports car and a cross that cuts down what fame built.",
            "A French duo's robotic pulse haunts this coronation of a darker alter ego.",
        ],
        image_prompt: "A red sports car under violet city lights, shattered glass floating midair, cinematic",
        min_difficulty: 1,
    },
    SongEntry {
        title: "Can't Feel My Face",
        clues: &[
            "A love song where the lover numbs, sung to something you can't hold.",
            "A dance floor catches fire while the singer grins through the smoke.",
        ],
        image_prompt: "A silhouetted singer on a smoky stage catching fire, crowd in shadow, noir lighting",
        min_difficulty: 1,
    },
    SongEntry {
        title: "Save Your Tears",
        clues: &[
            "A masked face at an empty gala; an apology flung across a ballroom.",
            "Its video hides the singer behind surgical reinvention.",
        ],
        image_prompt: "An empty art-deco ballroom, single spotlight on a masked figure, confetti frozen in the air",
        min_difficulty: 2,
    },
    SongEntry {
        title: "Wicked Games",
        clues: &[
            "An early-era plea from the trilogy that started it all, raw and unmixed with fame.",
            "Bring your love, the singer bargains, because something colder already has him.",
            "House-born, balloon-marked beginnings.",
        ],
        image_prompt: "A dim hotel room with a single red balloon drifting past a rain-streaked window",
        min_difficulty: 3,
    },
    SongEntry {
        title: "Often",
        clues: &[
            "A shrugged-off boast delivered half-asleep, a routine of excess.",
            "Slowed Turkish strings bend under the verses.",
        ],
        image_prompt: "Silk sheets in a dark penthouse, city lights smeared through floor-to-ceiling glass",
        min_difficulty: 3,
    },
    SongEntry {
        title: "In the Night",
        clues: &[
            "A dancer's trauma spins under disco lights she can't escape.",
            "A Michael-Jackson-shaped shadow falls over this beauty-behind-the-madness cut.",
        ],
        image_prompt: "A dancer alone under a mirrored ball in an abandoned club, silver and black tones",
        min_difficulty: 3,
    },
    SongEntry {
        title: "Call Out My Name",
        clues: &[
            "A wound dressed as a waltz; the singer almost cut a piece of himself away for her.",
            "The dawn-colored EP this opens was a eulogy for a brief, public love.",
            "Falling time signature, rising desperation.",
        ],
        image_prompt: "A figure kneeling in shallow dark water beneath a blood-orange dawn, mist rolling in",
        min_difficulty: 4,
    },
    SongEntry {
        title: "The Morning",
        clues: &[
            "Valleys of women and sunrise economics, from the mixtape that built the myth.",
            "Critics' favorite deep cut of the balloon era.",
            "The morning here is a payout, not a promise.",
        ],
        image_prompt: "Golden morning light leaking into a trashed hotel suite, scattered bills on the floor",
        min_difficulty: 4,
    },
    SongEntry {
        title: "After Hours",
        clues: &[
            "The title track nobody treats as one; six minutes of basement-lit regret.",
            "Red suit, bandaged face - but this cut stays underground while its album conquered.",
            "A subway tunnel swallows the singer in its visual.",
        ],
        image_prompt: "An empty subway platform bathed in red light, a lone figure walking into the dark",
        min_difficulty: 5,
    },
    SongEntry {
        title: "Echoes of Silence",
        clues: &[
            "The final door of the trilogy closes with a plea not to leave.",
            "A piano, a ghost of Thriller's author in the opening cover, then this farewell.",
            "Title track of the trilogy's darkest third.",
        ],
        image_prompt: "A grand piano alone in a condemned theater, dust in a single beam of pale light",
        min_difficulty: 5,
    },
];

/// Offline content provider backed by the static library
#[derive(Debug, Default)]
pub struct SongLibrary {
    cursor: AtomicUsize,
}

impl SongLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries serveable at the given difficulty
    pub fn eligible_count(&self, difficulty: u32) -> usize {
        LIBRARY
            .iter()
            .filter(|e| e.min_difficulty <= difficulty.max(1))
            .count()
    }
}

#[async_trait]
impl ContentProvider for SongLibrary {
    async fn request_challenge(
        &self,
        difficulty: u32,
        exclude_titles: &HashSet<String>,
    ) -> Result<Challenge, ContentError> {
        let eligible: Vec<&SongEntry> = LIBRARY
            .iter()
            .filter(|e| e.min_difficulty <= difficulty.max(1))
            .filter(|e| !exclude_titles.contains(e.title))
            .collect();

        if eligible.is_empty() {
            return Err(ContentError::Exhausted);
        }

        // Rotate through eligible entries so repeated sessions vary
        let pick = self.cursor.fetch_add(1, Ordering::Relaxed) % eligible.len();
        let entry = eligible[pick];

        Challenge::new(
            entry.title,
            entry.clues.iter().map(|c| c.to_string()).collect(),
            entry.image_prompt,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
