// moodcard: sentiment cards for typed text and scraped Nitter posts
//
// This is the library root. Each module corresponds to one stage of the
// clean -> encode -> score -> render pipeline or one of its collaborators.

pub mod config;
pub mod model;
pub mod nitter;
pub mod output;
pub mod sentiment;
pub mod status;
pub mod text;
