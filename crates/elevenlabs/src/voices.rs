/// Narrator voices picked from at random for each synthesis request.
pub const VOICE_IDS: &[&str] = &[
    "NOpBlnGInO9m6vDvFkFC",
    "56AoDkrOh6qfVPDXZ7Pt",
    "21m00Tcm4TlvDq8ikWAM",
    "4dZr8J4CBeokyRkTRpoN",
    "2ajXGJNYBR0iNHpS4VZb",
    "ys3XeJJA4ArWMhRpcX1D",
    "qBDvhofpxp92JgXJxDjB",
];

/// Speech model used for every request.
pub const MODEL_ID: &str = "eleven_multilingual_v2";

/// Output encoding requested from the API (MP3, 44.1 kHz, 128 kbps).
pub const OUTPUT_FORMAT: &str = "mp3_44100_128";
