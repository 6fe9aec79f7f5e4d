use std::collections::BTreeMap;

/// Occurrence count per byte value. Bytes that never occur are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, usize>,
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut histogram = [0usize; 256];
        for &byte in bytes {
            histogram[byte as usize] += 1;
        }

        let counts = histogram.iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
            .collect();

        FrequencyTable { counts }
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts; equals the length of the counted input.
    /// Saturates at `usize::MAX`; see [`checked_total`](Self::checked_total).
    pub fn total(&self) -> usize {
        self.counts.values().fold(0usize, |acc, &c| acc.saturating_add(c))
    }

    /// Sum of all counts, or `None` if it does not fit in a `usize`.
    pub fn checked_total(&self) -> Option<usize> {
        self.counts.values().try_fold(0usize, |acc, &c| acc.checked_add(c))
    }

    pub fn get(&self, byte: u8) -> Option<usize> {
        self.counts.get(&byte).copied()
    }

    /// Symbols in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&b, &c)| (b, c))
    }
}

impl FromIterator<(u8, usize)> for FrequencyTable {
    /// Zero counts are dropped; repeated symbols accumulate, saturating.
    fn from_iter<I: IntoIterator<Item = (u8, usize)>>(iter: I) -> Self {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for (byte, count) in iter {
            if count > 0 {
                let entry = counts.entry(byte).or_insert(0);
                *entry = entry.saturating_add(count);
            }
        }
        FrequencyTable { counts }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_counts_present_symbols_only() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(b'a'), Some(5));
        assert_eq!(table.get(b'b'), Some(2));
        assert_eq!(table.get(b'r'), Some(2));
        assert_eq!(table.get(b'c'), Some(1));
        assert_eq!(table.get(b'd'), Some(1));
        assert_eq!(table.get(b'z'), None);
        assert_eq!(table.total(), 11);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_from_iter_drops_zeros() {
        let table: FrequencyTable = vec![(1, 0), (2, 3), (2, 1)].into_iter().collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(2), Some(4));
        assert_eq!(table.get(1), None);
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let table: FrequencyTable = vec![(0, usize::MAX), (1, 1), (1, usize::MAX)].into_iter().collect();
        assert_eq!(table.get(1), Some(usize::MAX));
        assert_eq!(table.total(), usize::MAX);
        assert_eq!(table.checked_total(), None);
        assert_eq!(FrequencyTable::from_bytes(b"abc").checked_total(), Some(3));
    }

    #[test]
    fn test_iter_is_ascending() {
        let table = FrequencyTable::from_bytes(&[200, 3, 77, 3]);
        let symbols: Vec<u8> = table.iter().map(|(b, _)| b).collect();
        assert_eq!(symbols, vec![3, 77, 200]);
    }
}
