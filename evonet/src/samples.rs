//! Labeled samples, and their use as a fitness source.
//!
//! A [`Dataset`] is loaded from tab-separated records whose
//! trailing fields form the label and whose leading fields form
//! the point. It evaluates networks by their mean squared error,
//! and reports how many samples a trained network classifies
//! exactly.
mod errors;

pub use errors::DatasetError;

use crate::networks::{Network, Topology};
use crate::Evaluator;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A point and its label vector.
#[derive(Clone, PartialEq, Debug)]
pub struct Sample {
    point: Box<[f64]>,
    label: Box<[f64]>,
}

impl Sample {
    pub fn new(point: Vec<f64>, label: Vec<f64>) -> Sample {
        Sample {
            point: point.into(),
            label: label.into(),
        }
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn label(&self) -> &[f64] {
        &self.label
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .point
            .iter()
            .map(f64::to_string)
            .chain(self.label.iter().map(|c| (*c as i64).to_string()))
            .collect();
        write!(f, "{}", fields.join("\t"))
    }
}

/// The outcome of classifying every sample of a dataset.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Report {
    /// Samples whose thresholded prediction equals the label.
    pub correct: usize,
    /// Number of samples.
    pub total: usize,
}

impl Report {
    /// Fraction of correctly classified samples.
    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} correct ({:.2}%)",
            self.correct,
            self.total,
            self.accuracy() * 100.0
        )
    }
}

/// An immutable, non-empty collection of samples
/// sharing point and label dimensions.
#[derive(Clone, Debug)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Returns a dataset of the given samples.
    ///
    /// # Errors
    /// Returns an error if there are no samples, the first
    /// sample has an empty point or label, or their
    /// dimensions differ from the first sample's. Mismatches
    /// are reported with the 1-based sample position as line.
    pub fn new(samples: Vec<Sample>) -> Result<Dataset, DatasetError> {
        let first = samples.first().ok_or(DatasetError::Empty)?;
        let (point_len, label_len) = (first.point.len(), first.label.len());
        if point_len == 0 {
            return Err(DatasetError::EmptyVector(1, "point"));
        }
        if label_len == 0 {
            return Err(DatasetError::EmptyVector(1, "label"));
        }
        for (i, sample) in samples.iter().enumerate() {
            if sample.point.len() != point_len || sample.label.len() != label_len {
                return Err(DatasetError::FieldCountMismatch {
                    line: i + 1,
                    expected: point_len + label_len,
                    found: sample.point.len() + sample.label.len(),
                });
            }
        }
        Ok(Dataset { samples })
    }

    /// Loads a dataset from a tab-separated file, where the
    /// last `class_count` fields of each record are the label.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or any
    /// record is malformed.
    pub fn load<P: AsRef<Path>>(path: P, class_count: usize) -> Result<Dataset, DatasetError> {
        let file = File::open(path)?;
        Dataset::from_reader(BufReader::new(file), class_count)
    }

    /// Reads a dataset of tab-separated records, where the
    /// last `class_count` fields of each record are the label.
    /// Blank lines are skipped.
    ///
    /// # Errors
    /// Returns an error on the first record that has a field
    /// which is not a number, has no more than `class_count`
    /// fields, or has a different field count than the first
    /// record.
    ///
    /// # Examples
    /// ```
    /// use evonet::samples::Dataset;
    ///
    /// let data = "0.1\t0.9\t1\t0\n0.8\t0.2\t0\t1\n";
    /// let dataset = Dataset::from_reader(data.as_bytes(), 2).unwrap();
    ///
    /// assert_eq!(dataset.len(), 2);
    /// assert_eq!(dataset.samples()[1].point(), &[0.8, 0.2]);
    /// assert_eq!(dataset.samples()[1].label(), &[0.0, 1.0]);
    ///
    /// assert!(Dataset::from_reader("0.1\tx\t1\n".as_bytes(), 1).is_err());
    /// ```
    pub fn from_reader<B: BufRead>(reader: B, class_count: usize) -> Result<Dataset, DatasetError> {
        let mut samples = vec![];
        let mut expected_fields = None;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            if line.trim().is_empty() {
                continue;
            }

            let mut values = line
                .split('\t')
                .enumerate()
                .map(|(column, field)| {
                    field
                        .trim()
                        .parse::<f64>()
                        .map_err(|e| DatasetError::InvalidNumber(line_number, column + 1, e))
                })
                .collect::<Result<Vec<f64>, _>>()?;

            if values.len() <= class_count {
                return Err(DatasetError::TooFewFields(line_number, values.len()));
            }
            let expected = *expected_fields.get_or_insert(values.len());
            if values.len() != expected {
                return Err(DatasetError::FieldCountMismatch {
                    line: line_number,
                    expected,
                    found: values.len(),
                });
            }

            let label = values.split_off(values.len() - class_count);
            samples.push(Sample::new(values, label));
        }

        Dataset::new(samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`, datasets are never empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of values in each point.
    pub fn point_len(&self) -> usize {
        self.samples[0].point.len()
    }

    /// Number of values in each label.
    pub fn label_len(&self) -> usize {
        self.samples[0].label.len()
    }

    /// Checks that points fit the topology's input layer
    /// and labels fit its output layer.
    ///
    /// # Errors
    /// Returns an error naming the mismatched layer.
    pub fn check_topology(&self, topology: &Topology) -> Result<(), DatasetError> {
        let checks = [
            ("input", topology.input_count(), self.point_len()),
            ("output", topology.output_count(), self.label_len()),
        ];
        for (layer, expected, found) in checks {
            if expected != found {
                return Err(DatasetError::TopologyMismatch {
                    layer,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Returns the squared error of `network`'s outputs against
    /// the labels, averaged over all samples and output values.
    ///
    /// # Panics
    /// Panics if the points don't fit the network's input layer,
    /// or the labels don't fit its output layer.
    pub fn mean_squared_error(&self, network: &mut Network) -> f64 {
        let mut error = 0.0;
        for sample in &self.samples {
            let prediction = network.forward(&sample.point);
            assert_eq!(
                prediction.len(),
                sample.label.len(),
                "output dimension does not match labels"
            );
            error += prediction
                .iter()
                .zip(sample.label.iter())
                .map(|(y, t)| (y - t).powi(2))
                .sum::<f64>();
        }
        error / (self.samples.len() * self.label_len()) as f64
    }

    /// Classifies every sample with `network`, counting
    /// the samples whose thresholded prediction matches
    /// the label in every coordinate.
    ///
    /// # Examples
    /// ```
    /// use evonet::networks::{Network, Topology};
    /// use evonet::samples::Dataset;
    ///
    /// let dataset = Dataset::from_reader("0\t1\n5\t0\n".as_bytes(), 1).unwrap();
    /// // One radial unit centered at 0: outputs 1 at x = 0, 1/6 at x = 5.
    /// let mut network = Network::from_parameters(
    ///     Topology::new(vec![1, 1]).unwrap(),
    ///     vec![vec![vec![0.0]]],
    ///     vec![vec![vec![1.0]]],
    /// )
    /// .unwrap();
    ///
    /// let report = dataset.report(&mut network);
    /// assert_eq!((report.correct, report.total), (2, 2));
    /// ```
    pub fn report(&self, network: &mut Network) -> Report {
        let correct = self
            .samples
            .iter()
            .filter(|s| network.predict(&s.point).as_slice() == &*s.label)
            .count();
        Report {
            correct,
            total: self.samples.len(),
        }
    }
}

impl Evaluator for Dataset {
    fn evaluate(&mut self, network: &mut Network) -> f64 {
        self.mean_squared_error(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const IRIS_LIKE: &str = "1.0\t2.0\t1\t0\t0\n\
                             1.5\t-0.5\t0\t1\t0\n\
                             \n\
                             -3.25\t4\t0\t0\t1\r\n";

    #[test]
    fn loads_points_and_labels() {
        let dataset = Dataset::from_reader(IRIS_LIKE.as_bytes(), 3).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.point_len(), 2);
        assert_eq!(dataset.label_len(), 3);
        assert_eq!(dataset.samples()[2].point(), &[-3.25, 4.0]);
        assert_eq!(dataset.samples()[2].label(), &[0.0, 0.0, 1.0]);
        assert_eq!(dataset.samples()[0].to_string(), "1\t2\t1\t0\t0");
    }

    #[test]
    fn reports_malformed_records() {
        let err = Dataset::from_reader("1\t2\t1\n1\t1\n".as_bytes(), 1).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::FieldCountMismatch {
                line: 2,
                expected: 3,
                found: 2
            }
        ));

        let err = Dataset::from_reader("1\t2\t1\n\n1\tfoo\t0\n".as_bytes(), 1).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidNumber(3, 2, _)));
        assert!(std::error::Error::source(&err).is_some());

        let err = Dataset::from_reader("1\t0\t1\n".as_bytes(), 3).unwrap_err();
        assert!(matches!(err, DatasetError::TooFewFields(1, 3)));

        let err = Dataset::from_reader("\n\n".as_bytes(), 1).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));

        let err = Dataset::from_reader("0\t1\n3\t0\n".as_bytes(), 0).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyVector(1, "label")));

        let err = Dataset::new(vec![Sample::new(vec![], vec![1.0])]).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyVector(1, "point")));
    }

    #[test]
    fn load_reports_missing_files() {
        let err = Dataset::load("/nonexistent/evonet/samples.tsv", 1).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn checks_topology_dimensions() {
        let dataset = Dataset::from_reader(IRIS_LIKE.as_bytes(), 3).unwrap();
        assert!(dataset
            .check_topology(&Topology::new(vec![2, 8, 3]).unwrap())
            .is_ok());
        assert!(matches!(
            dataset.check_topology(&Topology::new(vec![3, 8, 3]).unwrap()),
            Err(DatasetError::TopologyMismatch { layer: "input", .. })
        ));
        assert!(matches!(
            dataset.check_topology(&Topology::new(vec![2, 8, 2]).unwrap()),
            Err(DatasetError::TopologyMismatch { layer: "output", .. })
        ));
    }

    #[test]
    fn mean_squared_error_by_hand() {
        let mut dataset = Dataset::from_reader("0\t1\t0\n3\t0\t1\n".as_bytes(), 2).unwrap();
        let mut network = Network::from_parameters(
            Topology::new(vec![1, 2]).unwrap(),
            vec![vec![vec![0.0], vec![3.0]]],
            vec![vec![vec![1.0], vec![1.0]]],
        )
        .unwrap();
        // Outputs are (1, 1/4) at 0 and (1/4, 1) at 3,
        // so each sample is off by 1/4 in one coordinate.
        let expected = 2.0 * 0.25f64.powi(2) / 4.0;
        assert!((network.evaluate(&mut dataset) - expected).abs() < 1e-12);
        assert_eq!(dataset.report(&mut network), Report { correct: 2, total: 2 });
    }

    #[test]
    #[should_panic(expected = "output dimension")]
    fn mean_squared_error_rejects_mismatched_outputs() {
        let mut dataset = Dataset::from_reader("0\t1\t0\t0\n3\t0\t1\t0\n".as_bytes(), 3).unwrap();
        let mut network = Network::from_parameters(
            Topology::new(vec![1, 1]).unwrap(),
            vec![vec![vec![0.0]]],
            vec![vec![vec![1.0]]],
        )
        .unwrap();
        network.evaluate(&mut dataset);
    }

    #[test]
    fn perfect_fitness_classifies_everything() {
        // Labels equal to the outputs of a radial unit
        // with weight 0 and scale 1: 1 / (1 + |x|).
        let dataset = Dataset::new(vec![
            Sample::new(vec![0.0], vec![1.0]),
            Sample::new(vec![1.0], vec![0.5]),
        ])
        .unwrap();
        let mut network = Network::from_parameters(
            Topology::new(vec![1, 1]).unwrap(),
            vec![vec![vec![0.0]]],
            vec![vec![vec![1.0]]],
        )
        .unwrap();
        assert_eq!(dataset.mean_squared_error(&mut network), 0.0);

        let binary = Dataset::new(vec![Sample::new(vec![0.0], vec![1.0])]).unwrap();
        assert_eq!(binary.mean_squared_error(&mut network), 0.0);
        assert_eq!(binary.report(&mut network).correct, binary.len());
    }

    #[test]
    fn report_stays_within_bounds() {
        let dataset = Dataset::from_reader(IRIS_LIKE.as_bytes(), 3).unwrap();
        let topology = Topology::new(vec![2, 5, 3]).unwrap();
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..30 {
            let mut network = Network::random(&topology, &mut rng);
            let report = dataset.report(&mut network);
            assert_eq!(report.total, 3);
            assert!(report.correct <= report.total);
            assert!((0.0..=1.0).contains(&report.accuracy()));
        }
    }

    #[test]
    fn rejects_inconsistent_samples() {
        let err = Dataset::new(vec![
            Sample::new(vec![0.0, 1.0], vec![1.0]),
            Sample::new(vec![0.0], vec![1.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::FieldCountMismatch {
                line: 2,
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(err.to_string(), "line 2: expected 3 fields, found 2");
    }
}
