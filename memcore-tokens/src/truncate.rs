use memcore_core::traits::TokenEstimator;

/// Outcome of applying the admit-time truncation policy:
/// "if tokens(content) > per_record_max, content is truncated to the
/// largest prefix whose token count <= per_record_max, and the record is
/// tagged {truncated, original_tokens=N}".
#[derive(Debug, Clone)]
pub struct TruncationResult {
    pub content: Vec<u8>,
    pub tokens: u32,
    pub truncated: bool,
    pub original_tokens: Option<u32>,
}

/// Truncate `content` to the largest UTF-8-boundary-respecting prefix whose
/// token count is `<= max_tokens`, using binary search over byte offsets.
/// Callers never see content exceeding `max_tokens` tokens.
pub fn truncate_to_budget(
    content: &[u8],
    max_tokens: u32,
    estimator: &dyn TokenEstimator,
) -> TruncationResult {
    let original_tokens = estimator.estimate(content);
    if original_tokens <= max_tokens {
        return TruncationResult {
            content: content.to_vec(),
            tokens: original_tokens,
            truncated: false,
            original_tokens: None,
        };
    }

    let text = String::from_utf8_lossy(content).into_owned();
    let char_boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut lo = 0usize;
    let mut hi = char_boundaries.len() - 1;
    let mut best = 0usize;

    // Binary search the largest number of characters whose token count
    // stays within budget. Monotone because the estimator is monotone in
    // byte length within a kind.
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let boundary = char_boundaries[mid];
        let candidate = &text.as_bytes()[..boundary];
        if estimator.estimate(candidate) <= max_tokens {
            best = mid;
            if mid == char_boundaries.len() - 1 {
                break;
            }
            lo = mid + 1;
        } else {
            if mid == 0 {
                break;
            }
            hi = mid - 1;
        }
    }

    let boundary = char_boundaries[best];
    let truncated_content = text.as_bytes()[..boundary].to_vec();
    let tokens = estimator.estimate(&truncated_content);

    TruncationResult {
        content: truncated_content,
        tokens,
        truncated: true,
        original_tokens: Some(original_tokens),
    }
}
