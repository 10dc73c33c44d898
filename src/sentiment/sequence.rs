// Fixed-length sequence shaping for the classifier input.
//
// The model was trained on pre-padded, pre-truncated sequences: zeros go at
// the front and overlong inputs lose their oldest tokens. Flipping either
// side changes which tokens the model sees, so this must stay as is for any
// reused model artifact.

/// Default sequence length the classifier expects.
pub const DEFAULT_MAX_LEN: usize = 100;

/// Padding sentinel. Index 0 is never assigned to a word.
pub const PAD_VALUE: i64 = 0;

/// Shape a token sequence to exactly `maxlen` entries.
///
/// Shorter sequences are left-padded with `PAD_VALUE`; longer sequences keep
/// only their last `maxlen` entries.
pub fn pad_sequence(sequence: &[i64], maxlen: usize) -> Vec<i64> {
    if sequence.len() >= maxlen {
        return sequence[sequence.len() - maxlen..].to_vec();
    }

    let mut padded = vec![PAD_VALUE; maxlen - sequence.len()];
    padded.extend_from_slice(sequence);
    padded
}
