//! services/api/src/adapters/shuffle.rs

use rand::seq::SliceRandom;

use bookquest_core::ports::CategoryShuffler;

/// Fisher-Yates shuffle over the thread-local generator. Unseeded on
/// purpose: repeated selection runs may sample different category subsets.
pub struct ThreadRngShuffler;

impl CategoryShuffler for ThreadRngShuffler {
    fn shuffle(&self, categories: &mut [String]) {
        categories.shuffle(&mut rand::thread_rng());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_preserves_the_category_set() {
        let original: Vec<String> = (0..20).map(|i| format!("Categoria {i}")).collect();
        let mut shuffled = original.clone();
        ThreadRngShuffler.shuffle(&mut shuffled);

        let mut sorted = shuffled.clone();
        sorted.sort();
        let mut expected = original.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
