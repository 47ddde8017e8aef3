//! Header construction: a compact textual summary of the episodes
//! feeding a working context, prefixed onto the assembled records.

use memcore_core::memory::Episode;

/// Render a single summary line covering every included episode's time
/// range, member count, and size. Kept to one line regardless of how
/// many episodes contributed, so header cost does not grow unbounded
/// against the caller's token budget. Empty if no episodes contributed.
pub fn render(episodes: &[Episode]) -> String {
    if episodes.is_empty() {
        return String::new();
    }
    let start = episodes.iter().map(|e| e.opened_at).min().unwrap_or(0);
    let end = episodes
        .iter()
        .map(|e| e.closed_at.unwrap_or(e.opened_at))
        .max()
        .unwrap_or(start);
    let records: usize = episodes.iter().map(|e| e.member_ids.len()).sum();
    let tokens: u32 = episodes.iter().map(|e| e.size_tokens).sum();

    format!(
        "[{} episode(s), {start}..{end}, {records} records, {tokens} tok]\n",
        episodes.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str, opened_at: i64, closed_at: Option<i64>, members: usize, tokens: u32) -> Episode {
        Episode {
            id: id.to_string(),
            member_ids: (0..members).map(|i| format!("m{i}")).collect(),
            opened_at,
            closed_at,
            centroid_embedding: None,
            surprise_at_open: 0.0,
            size_tokens: tokens,
        }
    }

    #[test]
    fn empty_episode_list_renders_empty_header() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn header_summarizes_span_count_and_size_across_episodes() {
        let header = render(&[
            episode("e1", 0, Some(100), 3, 30),
            episode("e2", 150, Some(200), 2, 10),
        ]);
        assert!(header.contains("2 episode(s)"));
        assert!(header.contains("0..200"));
        assert!(header.contains("5 records"));
        assert!(header.contains("40 tok"));
    }

    #[test]
    fn open_episode_uses_its_own_opened_at_as_the_span_end() {
        let header = render(&[episode("e2", 5, None, 1, 10)]);
        assert!(header.contains("5..5"));
    }
}
