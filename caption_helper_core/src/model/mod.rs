pub mod cue;
pub mod document;
