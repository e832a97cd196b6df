use std::collections::HashMap;
use std::path::Path;

/// Word difficulty bucket. Ordering follows difficulty: `Common` is
/// the easiest, `Expert` the hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DifficultyTier {
    Common,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyTier {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "common" => Some(DifficultyTier::Common),
            "beginner" => Some(DifficultyTier::Beginner),
            "intermediate" => Some(DifficultyTier::Intermediate),
            "advanced" => Some(DifficultyTier::Advanced),
            "expert" => Some(DifficultyTier::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Common => "common",
            DifficultyTier::Beginner => "beginner",
            DifficultyTier::Intermediate => "intermediate",
            DifficultyTier::Advanced => "advanced",
            DifficultyTier::Expert => "expert",
        }
    }

    /// Numeric score: 25 points per tier, common = 0 .. expert = 100.
    pub fn score(&self) -> u32 {
        *self as u32 * 25
    }

    /// Class name attached to highlighted display segments.
    pub fn css_class(&self) -> &'static str {
        match self {
            DifficultyTier::Common => "difficulty-common",
            DifficultyTier::Beginner => "difficulty-beginner",
            DifficultyTier::Intermediate => "difficulty-intermediate",
            DifficultyTier::Advanced => "difficulty-advanced",
            DifficultyTier::Expert => "difficulty-expert",
        }
    }
}

/// Tier lookup table built from a frequency-ordered word list, one
/// word per line, most frequent first. Buckets by line range:
/// [0,1000) common, [1000,3000) beginner, [3000,5000) intermediate,
/// [5000,8000) advanced, everything after that expert.
pub struct DifficultyIndex {
    tiers: HashMap<String, DifficultyTier>,
}

impl DifficultyIndex {
    pub fn new() -> Self {
        Self {
            tiers: HashMap::new(),
        }
    }

    pub fn from_word_list(list: &str) -> Self {
        let mut tiers = HashMap::new();
        for (rank, word) in list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let tier = match rank {
                0..=999 => DifficultyTier::Common,
                1000..=2999 => DifficultyTier::Beginner,
                3000..=4999 => DifficultyTier::Intermediate,
                5000..=7999 => DifficultyTier::Advanced,
                _ => DifficultyTier::Expert,
            };
            tiers.entry(word.to_lowercase()).or_insert(tier);
        }
        Self { tiers }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_word_list(&content))
    }

    /// Exact-match tier lookup; `None` for words outside the list.
    pub fn tier_exact(&self, word_lower: &str) -> Option<DifficultyTier> {
        self.tiers.get(word_lower).copied()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl Default for DifficultyIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_order_and_scores() {
        assert!(DifficultyTier::Common < DifficultyTier::Expert);
        assert_eq!(DifficultyTier::Common.score(), 0);
        assert_eq!(DifficultyTier::Intermediate.score(), 50);
        assert_eq!(DifficultyTier::Expert.score(), 100);
    }

    #[test]
    fn buckets_follow_line_ranges() {
        let mut list = String::from("the\n");
        for i in 1..1000 {
            list.push_str(&format!("common{i}\n"));
        }
        list.push_str("hello\n");
        for i in 1001..3000 {
            list.push_str(&format!("beginner{i}\n"));
        }
        list.push_str("frontier\n");

        let index = DifficultyIndex::from_word_list(&list);
        assert_eq!(index.tier_exact("the"), Some(DifficultyTier::Common));
        assert_eq!(index.tier_exact("hello"), Some(DifficultyTier::Beginner));
        assert_eq!(index.tier_exact("frontier"), Some(DifficultyTier::Intermediate));
        assert_eq!(index.tier_exact("absent"), None);
    }

    #[test]
    fn first_occurrence_keeps_its_tier() {
        let index = DifficultyIndex::from_word_list("the\nThe\n");
        assert_eq!(index.len(), 1);
        assert_eq!(index.tier_exact("the"), Some(DifficultyTier::Common));
    }
}
