use serde::{Deserialize, Serialize};

/// Deterministic index set backed by a bitset.
///
/// Holds row indices (segments) or marker indices.
///
/// Ordering contract:
/// - Iteration yields indices in ascending order, whatever the insertion order.
/// - Words past the highest member are never kept, so equality is membership
///   equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct SelectionSet {
    words: Vec<u64>,
    len: usize,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set `0..len`.
    pub fn full(len: u32) -> Self {
        let mut s = Self::default();
        if len == 0 {
            return s;
        }
        let full_words = (len / 64) as usize;
        let rest = len % 64;
        s.words = vec![u64::MAX; full_words];
        if rest > 0 {
            s.words.push((1u64 << rest) - 1);
        }
        s.len = len as usize;
        s
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, index: u32) -> bool {
        let (word, bit) = word_bit(index);
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Inserts `index` into the set.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, index: u32) -> bool {
        self.ensure_capacity(index);
        let (word, bit) = word_bit(index);
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    /// Iterates indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        SelectionIndexIter {
            words: &self.words,
            word_index: 0,
            current_word: 0,
            base_index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    fn ensure_capacity(&mut self, index: u32) {
        let (word, _bit) = word_bit(index);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
    }
}

impl FromIterator<u32> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut s = Self::new();
        s.extend(iter);
        s
    }
}

impl Extend<u32> for SelectionSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for index in iter {
            self.insert(index);
        }
    }
}

impl From<Vec<u32>> for SelectionSet {
    fn from(indices: Vec<u32>) -> Self {
        indices.into_iter().collect()
    }
}

impl From<SelectionSet> for Vec<u32> {
    fn from(set: SelectionSet) -> Self {
        set.to_vec()
    }
}

fn word_bit(index: u32) -> (usize, u32) {
    let word = (index / 64) as usize;
    let bit = index % 64;
    (word, bit)
}

struct SelectionIndexIter<'a> {
    words: &'a [u64],
    word_index: usize,
    current_word: u64,
    base_index: u32,
}

impl<'a> Iterator for SelectionIndexIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let tz = self.current_word.trailing_zeros();
                self.current_word &= !(1u64 << tz);
                return Some(self.base_index + tz);
            }

            let w = *self.words.get(self.word_index)?;
            self.current_word = w;
            self.base_index = (self.word_index as u32) * 64;
            self.word_index += 1;
        }
    }
}
