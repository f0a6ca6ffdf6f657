// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use tutor_bridge_engine::{HighlightCandidate, kinds};

#[allow(dead_code)]
pub fn generate_essay(paragraphs: usize) -> String {
    let base = "Yesterday I go to the park and seen a dog. It were very happy, and we plays together for a hours.\n\n";
    base.repeat(paragraphs)
}

/// Highlights every `stride` units, `width` wide, cycling through the ranked kinds
#[allow(dead_code)]
pub fn generate_highlights(doc_len: usize, stride: usize, width: usize) -> Vec<HighlightCandidate> {
    let cycle = [
        kinds::GRAMMAR,
        kinds::COHERENCE,
        kinds::SUGGESTION,
        kinds::REWRITE,
    ];
    (0..doc_len.saturating_sub(width))
        .step_by(stride)
        .enumerate()
        .map(|(i, start)| {
            HighlightCandidate::new(
                i as i64,
                start as i64,
                (start + width) as i64,
                cycle[i % cycle.len()],
            )
        })
        .collect()
}
