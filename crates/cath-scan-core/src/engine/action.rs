use super::res_pair::{SingleStrucResPair, StructureIndex};
use crate::core::models::protein::Protein;

/// Receives every accepted match of a scan.
///
/// Parallel scans give each worker its own [`split`](Self::split) copy and fold the copies
/// back together with [`merge`](Self::merge), so neither needs interior locking.
pub trait ScanAction: Send + Sync + Sized {
    fn act(
        &mut self,
        query: &SingleStrucResPair,
        matched: &SingleStrucResPair,
        query_structure_index: StructureIndex,
        match_structure_index: StructureIndex,
    );

    /// An empty action of the same shape.
    fn split(&self) -> Self;

    fn merge(&mut self, other: Self);
}

/// Scores every (query structure, match structure) combination by counting matches.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordScoresScanAction {
    query_lengths: Vec<usize>,
    match_lengths: Vec<usize>,
    scores: Vec<f64>,
}

impl RecordScoresScanAction {
    const SCORE_PER_MATCH: f64 = 1.0;
    const ZERO_SCORE_VALUE: f64 = -15.0;
    const LOG_BASE: f64 = 50_000.0;

    pub fn new(query_lengths: Vec<usize>, match_lengths: Vec<usize>) -> Self {
        let scores = vec![0.0; query_lengths.len() * match_lengths.len()];
        Self {
            query_lengths,
            match_lengths,
            scores,
        }
    }

    pub fn for_proteins(queries: &[Protein], matches: &[Protein]) -> Self {
        Self::new(
            queries.iter().map(Protein::len).collect(),
            matches.iter().map(Protein::len).collect(),
        )
    }

    pub fn num_queries(&self) -> usize {
        self.query_lengths.len()
    }

    pub fn num_matches(&self) -> usize {
        self.match_lengths.len()
    }

    fn slot(&self, query_index: usize, match_index: usize) -> Option<usize> {
        (query_index < self.num_queries() && match_index < self.num_matches())
            .then(|| query_index * self.num_matches() + match_index)
    }

    /// Raw score, or zero for an out-of-range combination.
    pub fn score(&self, query_index: usize, match_index: usize) -> f64 {
        self.slot(query_index, match_index)
            .map_or(0.0, |slot| self.scores[slot])
    }

    /// The raw score scaled by the number of pairs in the longer structure and mapped onto
    /// a roughly 0-100 log scale. A zero raw score maps to a fixed floor of -15.
    ///
    /// The scaling assumes a minimum index distance of 11.
    pub fn normalised_score(&self, query_index: usize, match_index: usize) -> f64 {
        let raw = self.score(query_index, match_index);
        if raw == 0.0 {
            return Self::ZERO_SCORE_VALUE;
        }
        let longest = self.query_lengths[query_index].max(self.match_lengths[match_index]) as f64;
        let num_pairs = (longest - 10.0) * (longest - 11.0);
        let num_pairs = if num_pairs > 0.0 { num_pairs } else { 1.0 };
        100.0 * (1.0 + (raw / num_pairs).ln() / Self::LOG_BASE.ln())
    }

    /// Raw scores, one row per query structure.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.scores.chunks(self.num_matches().max(1)).take(self.num_queries())
    }

    pub fn total_matches(&self) -> f64 {
        self.scores.iter().fold(0.0, |total, score| total + score)
    }
}

impl ScanAction for RecordScoresScanAction {
    #[inline]
    fn act(
        &mut self,
        _query: &SingleStrucResPair,
        _matched: &SingleStrucResPair,
        query_structure_index: StructureIndex,
        match_structure_index: StructureIndex,
    ) {
        if let Some(slot) = self.slot(query_structure_index as usize, match_structure_index as usize) {
            self.scores[slot] += Self::SCORE_PER_MATCH;
        }
    }

    fn split(&self) -> Self {
        Self::new(self.query_lengths.clone(), self.match_lengths.clone())
    }

    fn merge(&mut self, other: Self) {
        for (mine, theirs) in self.scores.iter_mut().zip(other.scores) {
            *mine += theirs;
        }
    }
}
