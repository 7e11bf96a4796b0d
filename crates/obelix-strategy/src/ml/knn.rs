//! k-최근접 이웃(k-NN) 분류기.
//!
//! 학습 데이터를 그대로 저장해두고, 예측 시 유클리드 거리로 가장 가까운
//! `k`개 이웃을 찾아 다수결로 클래스를 정합니다.
//!
//! 득표 수가 같으면 더 가까운 이웃이 속한 클래스를 선택합니다. 거리가 같은
//! 학습 샘플은 학습 순서대로 정렬되므로 결과는 결정적입니다.

use tracing::debug;

use super::{MlError, MlResult};

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[derive(Debug, Clone)]
struct TrainingSet<L> {
    features: Vec<Vec<f64>>,
    labels: Vec<L>,
    width: usize,
}

/// k-NN 분류기.
#[derive(Debug, Clone)]
pub struct KnnClassifier<L> {
    k: usize,
    training: Option<TrainingSet<L>>,
}

impl<L: Copy + PartialEq> KnnClassifier<L> {
    /// 이웃 수 `k`로 분류기를 생성합니다.
    pub fn new(k: usize) -> MlResult<Self> {
        if k == 0 {
            return Err(MlError::InvalidParameter(
                "neighbor count must be positive".to_string(),
            ));
        }
        Ok(Self {
            k,
            training: None,
        })
    }

    /// 예측에 실제로 사용되는 이웃 수 (학습 샘플 수로 제한).
    pub fn effective_k(&self) -> usize {
        match &self.training {
            Some(training) => self.k.min(training.labels.len()),
            None => self.k,
        }
    }

    /// 학습 샘플 수.
    pub fn training_size(&self) -> usize {
        self.training.as_ref().map_or(0, |t| t.labels.len())
    }

    /// 학습 데이터를 저장합니다.
    ///
    /// 모든 행은 같은 차원이어야 하며 적어도 한 행이 필요합니다.
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[L]) -> MlResult<()> {
        if features.len() != labels.len() {
            return Err(MlError::DimensionMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }
        let Some(first) = features.first() else {
            return Err(MlError::InsufficientData {
                required: 1,
                actual: 0,
            });
        };

        let width = first.len();
        if let Some(row) = features.iter().find(|row| row.len() != width) {
            return Err(MlError::DimensionMismatch {
                expected: width,
                actual: row.len(),
            });
        }

        if self.k > labels.len() {
            debug!(
                k = self.k,
                samples = labels.len(),
                "Neighbor count exceeds training size, clamping"
            );
        }

        self.training = Some(TrainingSet {
            features: features.to_vec(),
            labels: labels.to_vec(),
            width,
        });
        Ok(())
    }

    /// 각 행의 클래스를 예측합니다.
    pub fn predict(&self, features: &[Vec<f64>]) -> MlResult<Vec<L>> {
        let training = self.training.as_ref().ok_or(MlError::NotFitted)?;
        features
            .iter()
            .map(|row| self.predict_one(training, row))
            .collect()
    }

    fn predict_one(&self, training: &TrainingSet<L>, sample: &[f64]) -> MlResult<L> {
        if sample.len() != training.width {
            return Err(MlError::DimensionMismatch {
                expected: training.width,
                actual: sample.len(),
            });
        }

        let mut distances: Vec<(usize, f64)> = training
            .features
            .iter()
            .enumerate()
            .map(|(i, row)| (i, euclidean_distance(sample, row)))
            .collect();

        // 안정 정렬: 거리가 같으면 학습 순서 유지
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));

        let k = self.k.min(distances.len());
        let neighbors = distances.iter().take(k).map(|(i, _)| training.labels[*i]);
        majority_vote(neighbors).ok_or(MlError::InsufficientData {
            required: 1,
            actual: 0,
        })
    }
}

/// 가까운 순서로 주어진 이웃 라벨의 다수결.
///
/// 득표가 같으면 먼저(더 가까이) 등장한 라벨이 이깁니다.
fn majority_vote<L: Copy + PartialEq>(neighbors: impl Iterator<Item = L>) -> Option<L> {
    // (라벨, 득표 수), 첫 등장 순서
    let mut tally: Vec<(L, usize)> = Vec::new();
    for label in neighbors {
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(L, usize)> = None;
    for (label, count) in tally {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> (Vec<Vec<f64>>, Vec<u8>) {
        let x = vec![
            vec![1.0, 2.0],
            vec![2.0, 3.0],
            vec![3.0, 3.0],
            vec![6.0, 5.0],
            vec![7.0, 7.0],
            vec![8.0, 6.0],
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_knn_classifier() {
        let (x, y) = sample_data();
        let mut knn = KnnClassifier::new(3).unwrap();
        knn.fit(&x, &y).unwrap();

        let predictions = knn.predict(&[vec![2.0, 2.0], vec![7.0, 6.0]]).unwrap();
        assert_eq!(predictions, vec![0, 1]);
    }

    #[test]
    fn test_k_one_recovers_training_labels() {
        let (x, y) = sample_data();
        let mut knn = KnnClassifier::new(1).unwrap();
        knn.fit(&x, &y).unwrap();
        assert_eq!(knn.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_tie_broken_by_nearest_neighbor() {
        let x = vec![vec![0.0], vec![1.5], vec![-2.0], vec![2.5]];
        let y = vec!['a', 'b', 'b', 'a'];
        let mut knn = KnnClassifier::new(4).unwrap();
        knn.fit(&x, &y).unwrap();

        // 2:2 동률, 가장 가까운 이웃(0.0)은 'a'
        assert_eq!(knn.predict(&[vec![0.1]]).unwrap(), vec!['a']);
        // 가장 가까운 이웃(1.5)은 'b'
        assert_eq!(knn.predict(&[vec![1.4]]).unwrap(), vec!['b']);
    }

    #[test]
    fn test_equal_distances_keep_training_order() {
        let x = vec![vec![1.0], vec![-1.0]];
        let y = vec![7u8, 9u8];
        let mut knn = KnnClassifier::new(2).unwrap();
        knn.fit(&x, &y).unwrap();
        assert_eq!(knn.predict(&[vec![0.0]]).unwrap(), vec![7]);
    }

    #[test]
    fn test_k_clamped_to_training_size() {
        let mut knn = KnnClassifier::new(10).unwrap();
        knn.fit(&[vec![0.0], vec![1.0], vec![5.0]], &[1, 2, 2]).unwrap();

        assert_eq!(knn.effective_k(), 3);
        assert_eq!(knn.predict(&[vec![0.0]]).unwrap(), vec![2]);
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[1.5], &[1.5]), 0.0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            KnnClassifier::<u8>::new(0),
            Err(MlError::InvalidParameter(_))
        ));

        let knn = KnnClassifier::<u8>::new(1).unwrap();
        assert!(matches!(knn.predict(&[vec![1.0]]), Err(MlError::NotFitted)));

        let mut knn = KnnClassifier::<u8>::new(1).unwrap();
        assert!(matches!(
            knn.fit(&[], &[]),
            Err(MlError::InsufficientData { .. })
        ));
        assert!(matches!(
            knn.fit(&[vec![1.0], vec![1.0, 2.0]], &[0, 1]),
            Err(MlError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            knn.fit(&[vec![1.0]], &[0, 1]),
            Err(MlError::DimensionMismatch { .. })
        ));

        knn.fit(&[vec![1.0]], &[0]).unwrap();
        assert!(matches!(
            knn.predict(&[vec![1.0, 2.0]]),
            Err(MlError::DimensionMismatch { .. })
        ));
    }
}
