// Text normalization: the cleaning step every input goes through before
// it reaches the vocabulary.

pub mod normalize;
pub mod stop_words;
