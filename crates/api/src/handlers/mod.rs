pub mod generate;
pub mod posters;
pub mod tts;
