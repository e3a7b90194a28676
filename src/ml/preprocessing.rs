//! Feature preprocessing: categorical encoding and standardization

use crate::error::{FatigueError, Result};

/// Maps string labels to integer codes in sorted order
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the label set and encode it in one pass
    pub fn fit_transform<S: AsRef<str>>(&mut self, labels: &[S]) -> Vec<usize> {
        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        self.classes = classes;

        labels
            .iter()
            .filter_map(|l| self.index_of(l.as_ref()))
            .collect()
    }

    pub fn transform(&self, label: &str) -> Result<usize> {
        if self.classes.is_empty() {
            return Err(FatigueError::NotFitted);
        }
        self.index_of(label)
            .ok_or_else(|| FatigueError::UnknownLabel(label.to_string()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }
}

/// Zero-mean, unit-variance scaling per feature column
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute column means and population standard deviations
    pub fn fit(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        let first = rows.first().ok_or(FatigueError::EmptyDataset)?;
        let width = first.len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; width];
        for row in rows {
            if row.len() != width {
                return Err(FatigueError::DimensionMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut variances = vec![0.0; width];
        for row in rows {
            for ((var, v), m) in variances.iter_mut().zip(row).zip(&means) {
                *var += (v - m).powi(2);
            }
        }

        // Constant columns are left unscaled
        self.scales = variances
            .into_iter()
            .map(|var| {
                let std = (var / n).sqrt();
                if std > f64::EPSILON { std } else { 1.0 }
            })
            .collect();
        self.means = means;
        Ok(())
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if self.means.is_empty() {
            return Err(FatigueError::NotFitted);
        }
        if row.len() != self.means.len() {
            return Err(FatigueError::DimensionMismatch {
                expected: self.means.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn fit_transform(&mut self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.fit(rows)?;
        rows.iter().map(|r| self.transform_row(r)).collect()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_sorts_classes() {
        let mut enc = LabelEncoder::new();
        let codes = enc.fit_transform(&["Night", "Morning", "Afternoon", "Night"]);
        assert_eq!(enc.classes(), &["Afternoon", "Morning", "Night"]);
        assert_eq!(codes, vec![2, 1, 0, 2]);
        assert_eq!(enc.transform("Morning").unwrap(), 1);
    }

    #[test]
    fn test_label_encoder_rejects_unseen() {
        let mut enc = LabelEncoder::new();
        enc.fit_transform(&["Morning", "Night"]);
        assert!(matches!(
            enc.transform("Evening"),
            Err(FatigueError::UnknownLabel(l)) if l == "Evening"
        ));
    }

    #[test]
    fn test_unfitted_encoder() {
        let enc = LabelEncoder::new();
        assert!(matches!(enc.transform("Morning"), Err(FatigueError::NotFitted)));
    }

    #[test]
    fn test_scaler_standardizes_columns() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&rows).unwrap();

        assert!((scaler.means()[0] - 2.0).abs() < 1e-12);
        assert!((scaler.means()[1] - 20.0).abs() < 1e-12);

        for col in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[col]).sum::<f64>() / 3.0;
            let var: f64 = scaled.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scaler_constant_column() {
        let rows = vec![vec![5.0], vec![5.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&rows).unwrap();
        assert_eq!(scaler.scales(), &[1.0]);
        assert_eq!(scaled, vec![vec![0.0], vec![0.0]]);
    }

    #[test]
    fn test_scaler_errors() {
        let mut scaler = StandardScaler::new();
        assert!(matches!(scaler.fit(&[]), Err(FatigueError::EmptyDataset)));
        assert!(matches!(scaler.transform_row(&[1.0]), Err(FatigueError::NotFitted)));

        scaler.fit(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(matches!(
            scaler.transform_row(&[1.0]),
            Err(FatigueError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
