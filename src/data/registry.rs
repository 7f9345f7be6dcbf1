use std::collections::BTreeMap;
use std::sync::Arc;

use super::annualize::aggregate;
use super::model::{AnnualSeries, DatasetKey, ParseMode, RawRow};
use crate::error::TrendsError;

// ---------------------------------------------------------------------------
// SeriesRegistry – every annual series, built once
// ---------------------------------------------------------------------------

/// Read-only lookup table from dataset to its annual series.
///
/// There is no way to change a registry after [`SeriesRegistry::build`], so a
/// shared `Arc<SeriesRegistry>` can be read from anywhere.
#[derive(Debug, Default)]
pub struct SeriesRegistry {
    series: BTreeMap<DatasetKey, Arc<AnnualSeries>>,
}

impl SeriesRegistry {
    /// Aggregate every supplied dataset with its own reducer.
    pub fn build(
        sources: BTreeMap<DatasetKey, Vec<RawRow>>,
        mode: ParseMode,
    ) -> Result<Self, TrendsError> {
        let mut series = BTreeMap::new();

        for (key, rows) in sources {
            let annual = aggregate(&rows, key.reducer(), mode)
                .map_err(|source| TrendsError::MalformedRow { dataset: key, source })?;

            if annual.is_empty() {
                log::warn!("{key}: {} rows produced no annual values", rows.len());
            } else if let Some((first, last)) = annual.year_range() {
                log::info!(
                    "{key}: {} rows → {} years ({first}–{last})",
                    rows.len(),
                    annual.len()
                );
            }
            series.insert(key, Arc::new(annual));
        }

        Ok(Self { series })
    }

    pub fn lookup(&self, key: DatasetKey) -> Result<Arc<AnnualSeries>, TrendsError> {
        self.series
            .get(&key)
            .cloned()
            .ok_or(TrendsError::UnknownDataset(key))
    }

    /// Keys with a series, in [`DatasetKey`] order.
    pub fn keys(&self) -> impl Iterator<Item = DatasetKey> + '_ {
        self.series.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowField;

    fn sources() -> BTreeMap<DatasetKey, Vec<RawRow>> {
        BTreeMap::from([
            (
                DatasetKey::Ozone,
                vec![
                    RawRow::new(1, "2000-03-01", "0.03"),
                    RawRow::new(2, "2000-07-01", "0.05"),
                    RawRow::new(3, "2001-01-01", "0.02"),
                ],
            ),
            (
                DatasetKey::Hospitalizations,
                vec![
                    RawRow::new(1, "2000", "100"),
                    RawRow::new(2, "2000", "50"),
                    RawRow::new(3, "2001", "70"),
                ],
            ),
        ])
    }

    #[test]
    fn test_build_uses_reducer_per_dataset() {
        let registry = SeriesRegistry::build(sources(), ParseMode::Strict).unwrap();

        let ozone = registry.lookup(DatasetKey::Ozone).unwrap();
        assert!((ozone.value_for(2000).unwrap() - 0.04).abs() < 1e-12);

        let hosp = registry.lookup(DatasetKey::Hospitalizations).unwrap();
        assert_eq!(hosp.value_for(2000), Some(150.0));
        assert_eq!(hosp.value_for(2001), Some(70.0));
    }

    #[test]
    fn test_lookup_returns_the_same_series_every_time() {
        let registry = SeriesRegistry::build(sources(), ParseMode::Strict).unwrap();
        let a = registry.lookup(DatasetKey::Ozone).unwrap();
        let b = registry.lookup(DatasetKey::Ozone).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_lookup_missing_key() {
        let registry = SeriesRegistry::build(sources(), ParseMode::Strict).unwrap();
        assert_eq!(
            registry.lookup(DatasetKey::Benzene).unwrap_err(),
            TrendsError::UnknownDataset(DatasetKey::Benzene)
        );
    }

    #[test]
    fn test_keys_lists_loaded_datasets() {
        let registry = SeriesRegistry::build(sources(), ParseMode::Strict).unwrap();
        let keys: Vec<DatasetKey> = registry.keys().collect();
        assert_eq!(keys, vec![DatasetKey::Ozone, DatasetKey::Hospitalizations]);
    }

    #[test]
    fn test_malformed_row_fails_whole_build() {
        let mut input = sources();
        input
            .get_mut(&DatasetKey::Hospitalizations)
            .unwrap()
            .push(RawRow::new(4, "two thousand", "3"));

        match SeriesRegistry::build(input, ParseMode::Strict) {
            Err(TrendsError::MalformedRow { dataset, source }) => {
                assert_eq!(dataset, DatasetKey::Hospitalizations);
                assert_eq!(source.line, 4);
                assert_eq!(source.field, RowField::Timestamp);
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_build_skips_bad_rows() {
        let mut input = sources();
        input
            .get_mut(&DatasetKey::Ozone)
            .unwrap()
            .push(RawRow::new(4, "2001-05-01", "high"));

        let registry = SeriesRegistry::build(input, ParseMode::Lenient).unwrap();
        let ozone = registry.lookup(DatasetKey::Ozone).unwrap();
        assert_eq!(ozone.value_for(2001), Some(0.02));
    }

    #[test]
    fn test_dataset_without_measurements_is_empty_series() {
        let input = BTreeMap::from([(
            DatasetKey::Benzene,
            vec![RawRow::new(1, "2004-02-01", ""), RawRow::new(2, "2004-03-01", " ")],
        )]);

        let registry = SeriesRegistry::build(input, ParseMode::Strict).unwrap();
        let benzene = registry.lookup(DatasetKey::Benzene).unwrap();
        assert!(benzene.is_empty());
        assert_eq!(benzene.year_range(), None);
    }
}
