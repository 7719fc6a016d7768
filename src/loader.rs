use crate::{parse_key, Error, Tree};
use log::{debug, warn};
use rand::Rng;
use std::io::{self, BufRead};

/// Feeds whitespace separated numbers from a reader into a tree, skipping a
/// random number of tokens before each value taken.
pub struct BulkLoader<R> {
    rng: R,
    max_skip: usize,
}

impl<R: Rng> BulkLoader<R> {
    /// `max_skip` of 0 takes every token in order.
    pub fn new(rng: R, max_skip: usize) -> Self {
        BulkLoader { rng, max_skip }
    }

    /// Inserts up to `count` numbers from `source` and returns how many were inserted.
    ///
    /// Tokens that are not keys are logged and dropped. Loading stops early
    /// once the source runs out.
    pub fn load<B: BufRead>(&mut self, tree: &mut Tree, source: B, count: usize) -> Result<usize, Error> {
        let mut tokens = tokenize(source);
        let mut inserted = 0;

        // The leading skip is on top of the one before each value
        if !self.skip(&mut tokens)? {
            return Ok(0);
        }
        for _ in 0..count {
            if !self.skip(&mut tokens)? {
                break;
            }
            let token = match tokens.next() {
                Some(token) => token?,
                None => break,
            };
            match parse_key(&token) {
                Ok(key) => {
                    tree.insert(key);
                    inserted += 1;
                }
                Err(err) => warn!("Dropping bulk load token: {}", err),
            }
        }
        debug!("Bulk loaded {} of {} requested keys", inserted, count);
        Ok(inserted)
    }

    // Returns false if the source ran out while skipping
    fn skip<I>(&mut self, tokens: &mut I) -> Result<bool, Error>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        if self.max_skip == 0 {
            return Ok(true);
        }
        for _ in 0..self.rng.gen_range(1..=self.max_skip) {
            match tokens.next() {
                Some(token) => {
                    token?;
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }
}

fn tokenize<B: BufRead>(source: B) -> impl Iterator<Item = io::Result<String>> {
    source.lines().flat_map(|line| -> Vec<io::Result<String>> {
        match line {
            Ok(line) => line.split_whitespace().map(|token| Ok(token.to_string())).collect(),
            Err(err) => vec![Err(err)],
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Key;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn loader(max_skip: usize) -> BulkLoader<StdRng> {
        BulkLoader::new(StdRng::seed_from_u64(7), max_skip)
    }

    fn keys(tree: &Tree) -> Vec<Key> {
        tree.traverse().map(|entry| entry.key).collect()
    }

    #[test]
    fn takes_tokens_in_order_without_skipping() {
        let mut tree = Tree::new();
        let source = Cursor::new("5 3 9\n1 7\n");
        let loaded = loader(0).load(&mut tree, source, 4).unwrap();
        assert_eq!(loaded, 4);
        assert_eq!(keys(&tree), vec![1, 3, 5, 9]);
        tree.check_invariants();
    }

    #[test]
    fn stops_when_source_runs_out() {
        let mut tree = Tree::new();
        let loaded = loader(0).load(&mut tree, Cursor::new("1 2 3"), 10).unwrap();
        assert_eq!(loaded, 3);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn skipping_draws_a_subset() {
        let source: Vec<String> = (0..1000).map(|n| n.to_string()).collect();
        let text = source.join(" ");
        let mut tree = Tree::new();
        let loaded = loader(25).load(&mut tree, Cursor::new(text), 20).unwrap();

        // Each value costs at most 26 tokens plus the leading skip
        assert_eq!(loaded, 20);
        let loaded_keys = keys(&tree);
        assert!(loaded_keys.iter().all(|&key| key < 1000));
        let mut distinct = loaded_keys.clone();
        distinct.dedup();
        assert_eq!(distinct, loaded_keys);
        tree.check_invariants();
    }

    #[test]
    fn skips_between_one_and_max_skip_tokens() {
        let max_skip = 5;
        let text: Vec<String> = (0..2000).map(|n| n.to_string()).collect();
        for seed in 0..20 {
            let mut tree = Tree::new();
            let mut loader = BulkLoader::new(StdRng::seed_from_u64(seed), max_skip);
            let loaded = loader.load(&mut tree, Cursor::new(text.join(" ")), 50).unwrap();
            assert_eq!(loaded, 50);

            // The leading skip and the skip before the first value both use up tokens
            let loaded_keys = keys(&tree);
            assert!(loaded_keys[0] >= 2, "first key {}", loaded_keys[0]);
            for pair in loaded_keys.windows(2) {
                let gap = (pair[1] - pair[0]) as usize;
                assert!(gap >= 2 && gap <= max_skip + 1, "gap {} in {:?}", gap, loaded_keys);
            }
        }
    }

    #[test]
    fn source_running_out_mid_skip_loads_fewer() {
        let text: Vec<String> = (0..10).map(|n| n.to_string()).collect();
        let mut tree = Tree::new();
        let loaded = loader(5).load(&mut tree, Cursor::new(text.join(" ")), 20).unwrap();

        // Every value costs at least two tokens
        assert!(loaded <= 4, "loaded {}", loaded);
        assert_eq!(tree.len(), loaded);
    }

    #[test]
    fn read_error_while_taking_a_value() {
        let mut tree = Tree::new();
        let source = Cursor::new(&b"1 2\n\xff\xfe\n3\n"[..]);
        let result = loader(0).load(&mut tree, source, 5);
        assert!(matches!(result, Err(Error::Io(_))), "{:?}", result);
        assert_eq!(keys(&tree), vec![1, 2]);
    }

    #[test]
    fn read_error_while_skipping() {
        let mut tree = Tree::new();
        // With a maximum of one, exactly one token is skipped each time
        let source = Cursor::new(&b"1\n\xff\n"[..]);
        let result = loader(1).load(&mut tree, source, 5);
        assert!(matches!(result, Err(Error::Io(_))), "{:?}", result);
        assert!(tree.is_empty());
    }

    #[test]
    fn drops_tokens_outside_key_range() {
        let mut tree = Tree::new();
        let source = Cursor::new("4 70000 -2 abc 8");
        let loaded = loader(0).load(&mut tree, source, 5).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(keys(&tree), vec![4, 8]);
    }
}
