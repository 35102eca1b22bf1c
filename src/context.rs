/// Characters of corpus embedded in a prompt. Fixed to bound the size of the
/// completion request.
pub const CONTEXT_BUDGET: usize = 3000;

/// Leading slice of `corpus` holding at most [`CONTEXT_BUDGET`] characters.
/// Counts Unicode scalar values, so a character outside the BMP costs one,
/// not two as it would in UTF-16 units. Never splits a character.
pub fn context_window(corpus: &str) -> &str {
    match corpus.char_indices().nth(CONTEXT_BUDGET) {
        Some((end, _)) => &corpus[..end],
        None => corpus,
    }
}

/// Single-turn prompt: the instruction, the log excerpt, then the question.
pub fn build_prompt(corpus: &str, question: &str) -> String {
    format!(
        "Analyze this server log:\n{}\n\nUser question: {}",
        context_window(corpus),
        question
    )
}
