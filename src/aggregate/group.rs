use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket<K> {
    Key(K),
    Unknown,
}

impl<K> Bucket<K> {
    pub fn from_option(key: Option<K>) -> Self {
        match key {
            Some(k) => Self::Key(k),
            None => Self::Unknown,
        }
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            Self::Key(k) => Some(k),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub count: usize,
    pub sum: f64,
}

impl Tally {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

pub fn fold_by<T, K, A, F, G>(records: &[T], mut key: F, init: A, mut fold: G) -> HashMap<Bucket<K>, A>
where
    K: Eq + Hash,
    A: Clone,
    F: FnMut(&T) -> Option<K>,
    G: FnMut(&mut A, &T),
{
    let mut out: HashMap<Bucket<K>, A> = HashMap::new();
    for record in records {
        let bucket = Bucket::from_option(key(record));
        let acc = out.entry(bucket).or_insert_with(|| init.clone());
        fold(acc, record);
    }
    out
}

pub fn group_by<'a, T, K, F>(records: &'a [T], mut key: F) -> HashMap<Bucket<K>, Vec<&'a T>>
where
    K: Eq + Hash,
    F: FnMut(&T) -> Option<K>,
{
    let mut out: HashMap<Bucket<K>, Vec<&'a T>> = HashMap::new();
    for record in records {
        out.entry(Bucket::from_option(key(record)))
            .or_default()
            .push(record);
    }
    out
}

pub fn count_by<T, K, F>(records: &[T], key: F) -> HashMap<Bucket<K>, usize>
where
    K: Eq + Hash,
    F: FnMut(&T) -> Option<K>,
{
    fold_by(records, key, 0usize, |acc, _| *acc += 1)
}

pub fn sum_by<T, K, F, V>(records: &[T], key: F, mut value: V) -> HashMap<Bucket<K>, f64>
where
    K: Eq + Hash,
    F: FnMut(&T) -> Option<K>,
    V: FnMut(&T) -> f64,
{
    fold_by(records, key, 0.0f64, |acc, record| *acc += value(record))
}

pub fn tally_by<T, K, F, V>(records: &[T], key: F, mut value: V) -> HashMap<Bucket<K>, Tally>
where
    K: Eq + Hash,
    F: FnMut(&T) -> Option<K>,
    V: FnMut(&T) -> f64,
{
    fold_by(records, key, Tally::default(), |acc, record| {
        acc.add(value(record))
    })
}

pub fn total_count<K>(groups: &HashMap<Bucket<K>, usize>) -> usize {
    groups.values().sum()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone)]
    struct Row {
        district: Option<u8>,
        price: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { district: Some(1), price: 100.0 },
            Row { district: Some(1), price: 300.0 },
            Row { district: Some(2), price: 50.0 },
            Row { district: None, price: 80.0 },
        ]
    }

    #[test]
    fn missing_keys_go_to_unknown_bucket() {
        let rows = rows();
        let counts = count_by(&rows, |r| r.district);
        assert_eq!(counts[&Bucket::Key(1)], 2);
        assert_eq!(counts[&Bucket::Key(2)], 1);
        assert_eq!(counts[&Bucket::Unknown], 1);
        assert_eq!(total_count(&counts), rows.len());
    }

    #[test]
    fn sums_and_tallies_share_buckets() {
        let rows = rows();
        let sums = sum_by(&rows, |r| r.district, |r| r.price);
        assert_eq!(sums[&Bucket::Key(1)], 400.0);

        let tallies = tally_by(&rows, |r| r.district, |r| r.price);
        let konak = tallies[&Bucket::Key(1)];
        assert_eq!(konak.count, 2);
        assert_eq!(konak.mean(), 200.0);
        assert_eq!(tallies[&Bucket::Unknown].sum, 80.0);
        assert_eq!(Tally::default().mean(), 0.0);
    }

    #[test]
    fn group_by_keeps_record_references() {
        let rows = rows();
        let groups = group_by(&rows, |r| r.district);
        assert_eq!(groups[&Bucket::Key(1)].len(), 2);
        assert_eq!(groups[&Bucket::Unknown][0].price, 80.0);
        assert!(group_by(&[] as &[Row], |r| r.district).is_empty());
    }

    proptest! {
        #[test]
        fn bucket_totals_match_input_length(keys in proptest::collection::vec(proptest::option::of(0u8..6), 0..200)) {
            let rows: Vec<Row> = keys
                .into_iter()
                .map(|district| Row { district, price: 1.0 })
                .collect();
            let counts = count_by(&rows, |r| r.district);
            prop_assert_eq!(total_count(&counts), rows.len());

            let grouped = group_by(&rows, |r| r.district);
            let listed: usize = grouped.values().map(Vec::len).sum();
            prop_assert_eq!(listed, rows.len());
        }
    }
}
