// Nitter mirror scraping: best-effort retrieval of a handle's recent posts.
//
// Nothing downstream depends on this succeeding: a failed or empty fetch
// simply produces no cards.

pub mod client;
