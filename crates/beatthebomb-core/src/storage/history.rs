//! Score history as a chain graph: one node per game, an edge between each
//! pair of consecutive games.

use serde::Serialize;

use super::score_log::ScoreEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreHistory {
    nodes: Vec<u32>,
    edges: Vec<(usize, usize)>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[ScoreEntry]) -> Self {
        let mut history = Self::new();
        for entry in entries {
            history.add_score(entry.score);
        }
        history
    }

    pub fn add_score(&mut self, score: u32) {
        self.nodes.push(score);
        if self.nodes.len() > 1 {
            let last = self.nodes.len() - 1;
            self.edges.push((last - 1, last));
        }
    }

    pub fn scores(&self) -> &[u32] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Up to `n` most recent scores, newest first.
    pub fn recent(&self, n: usize) -> Vec<u32> {
        self.nodes.iter().rev().take(n).copied().collect()
    }

    pub fn best(&self) -> Option<u32> {
        self.nodes.iter().copied().max()
    }

    pub fn average(&self) -> Option<f64> {
        if self.nodes.is_empty() {
            return None;
        }
        let total: u64 = self.nodes.iter().map(|&s| u64::from(s)).sum();
        Some(total as f64 / self.nodes.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_games_are_linked() {
        let mut h = ScoreHistory::new();
        h.add_score(10);
        assert!(h.edges().is_empty());
        h.add_score(20);
        h.add_score(0);
        assert_eq!(h.edges(), &[(0, 1), (1, 2)]);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut h = ScoreHistory::new();
        for s in [10, 20, 30, 40, 50, 60] {
            h.add_score(s);
        }
        assert_eq!(h.recent(5), vec![60, 50, 40, 30, 20]);
        assert_eq!(h.recent(10).len(), 6);
    }

    #[test]
    fn stats_on_empty_history() {
        let h = ScoreHistory::new();
        assert_eq!(h.best(), None);
        assert_eq!(h.average(), None);
    }

    #[test]
    fn best_and_average() {
        let mut h = ScoreHistory::new();
        for s in [10, 30, 20] {
            h.add_score(s);
        }
        assert_eq!(h.best(), Some(30));
        assert_eq!(h.average(), Some(20.0));
    }
}
