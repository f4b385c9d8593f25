//! Peak / night / other split of total consumption.

use energy_core::models::{Band, BandTotal, Record};

/// Stateless helper that accumulates consumption per [`Band`].
pub struct BandClassifier;

impl BandClassifier {
    /// Totals for all three bands in display order (Peak, Night, Other).
    ///
    /// Every band is present even when nothing fell into it.
    pub fn classify(records: &[Record]) -> [BandTotal; 3] {
        let mut sums = [0.0_f64; 3];
        for record in records {
            sums[Band::from_hour(record.hour()).index()] += record.consumption_kwh();
        }
        Band::ALL.map(|band| BandTotal {
            band,
            consumption_kwh: sums[band.index()],
        })
    }

    /// Sum over the three bands.
    pub fn total(bands: &[BandTotal]) -> f64 {
        bands.iter().map(|b| b.consumption_kwh).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at_hour(hour: u32, kwh: f64) -> Record {
        let ts: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Record::new(ts, kwh, 0.0).unwrap()
    }

    #[test]
    fn test_classify_one_record_per_band() {
        let records = vec![at_hour(0, 1.0), at_hour(6, 2.0), at_hour(19, 3.0)];
        let bands = BandClassifier::classify(&records);

        assert_eq!(bands[0], BandTotal { band: Band::Peak, consumption_kwh: 3.0 });
        assert_eq!(bands[1], BandTotal { band: Band::Night, consumption_kwh: 1.0 });
        assert_eq!(bands[2], BandTotal { band: Band::Other, consumption_kwh: 2.0 });
    }

    #[test]
    fn test_classify_empty_keeps_all_bands() {
        let bands = BandClassifier::classify(&[]);
        let order: Vec<Band> = bands.iter().map(|b| b.band).collect();
        assert_eq!(order, vec![Band::Peak, Band::Night, Band::Other]);
        assert!(bands.iter().all(|b| b.consumption_kwh == 0.0));
    }

    #[test]
    fn test_classify_partition_law() {
        let records: Vec<Record> = (0..24).map(|h| at_hour(h, 0.5 + h as f64)).collect();
        let bands = BandClassifier::classify(&records);
        let direct: f64 = records.iter().map(|r| r.consumption_kwh()).sum();
        assert!((BandClassifier::total(&bands) - direct).abs() < 1e-9);
    }

    #[test]
    fn test_classify_boundary_hours() {
        let records = vec![at_hour(5, 1.0), at_hour(17, 10.0), at_hour(18, 100.0), at_hour(23, 1000.0)];
        let bands = BandClassifier::classify(&records);
        assert_eq!(bands[0].consumption_kwh, 1100.0);
        assert_eq!(bands[1].consumption_kwh, 1.0);
        assert_eq!(bands[2].consumption_kwh, 10.0);
    }
}
