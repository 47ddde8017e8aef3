//! Phase 2: Redundancy detection — connected components over an
//! above-threshold cosine-similarity graph within a group, via
//! union-find.

use std::collections::HashMap;

use memcore_core::memory::Record;
use memcore_core::traits::SimilarityIndex;
use petgraph::unionfind::UnionFind;

/// A connected component of size ≥ 2 within one group: a merge candidate.
pub struct MergeCandidate {
    pub records: Vec<Record>,
}

pub fn find_merge_candidates(
    group: &[Record],
    similarity: &dyn SimilarityIndex,
    redundancy_threshold: f32,
) -> Vec<MergeCandidate> {
    let n = group.len();
    if n < 2 {
        return Vec::new();
    }
    let mut uf = UnionFind::new(n);
    for (i, record) in group.iter().enumerate() {
        let Some(embedding) = &record.embedding else {
            continue;
        };
        for (neighbor_id, sim) in similarity.query(embedding, n, redundancy_threshold) {
            if sim < redundancy_threshold {
                continue;
            }
            if let Some(j) = group.iter().position(|r| r.id == neighbor_id) {
                if i != j {
                    uf.union(i, j);
                }
            }
        }
    }

    let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..n {
        components.entry(uf.find(i)).or_default().push(i);
    }

    components
        .into_values()
        .filter(|idxs| idxs.len() >= 2)
        .map(|idxs| MergeCandidate {
            records: idxs.into_iter().map(|i| group[i].clone()).collect(),
        })
        .collect()
}
