use log::info;
use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::config::AnalysisSettings;

/// Feature vector for one archetype, in natural units.
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeFeatures {
    pub archetype: String,
    pub win_rate: f64,
    pub share: f64,
    pub trend_slope: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterCentroid {
    pub win_rate: f64,
    pub share: f64,
    pub trend_slope: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeCluster {
    pub id: usize,
    pub members: Vec<String>,
    pub centroid: ClusterCentroid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusteringAnalysis {
    pub requested_clusters: usize,
    pub effective_clusters: usize,
    pub silhouette_score: f64,
    pub clusters: Vec<ArchetypeCluster>,
}

/// z-score each feature column so no single feature dominates the distance.
fn standardize(points: &mut Array2<f64>) {
    for mut column in points.columns_mut() {
        let n = column.len() as f64;
        let mean = column.sum() / n;
        let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        if std_dev > 0.0 {
            column.mapv_inplace(|v| (v - mean) / std_dev);
        } else {
            column.fill(0.0);
        }
    }
}

fn squared_distance(a: ndarray::ArrayView1<f64>, b: ndarray::ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Deterministic seeding: spread initial centroids across the points sorted
/// by feature vector, so repeated runs on unchanged data agree exactly.
fn initial_centroids(points: &Array2<f64>, k: usize) -> Array2<f64> {
    let n = points.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        for d in 0..points.ncols() {
            let cmp = points[[a, d]].total_cmp(&points[[b, d]]);
            if cmp != std::cmp::Ordering::Equal {
                return cmp;
            }
        }
        a.cmp(&b)
    });

    let mut centroids = Array2::zeros((k, points.ncols()));
    for i in 0..k {
        let pick = if k == 1 { 0 } else { i * (n - 1) / (k - 1) };
        centroids.row_mut(i).assign(&points.row(order[pick]));
    }
    centroids
}

fn assign_points(points: &Array2<f64>, centroids: &Array2<f64>) -> Vec<usize> {
    (0..points.nrows())
        .map(|i| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for c in 0..centroids.nrows() {
                let dist = squared_distance(points.row(i), centroids.row(c));
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            best
        })
        .collect()
}

fn recompute_centroids(
    points: &Array2<f64>,
    assignments: &[usize],
    k: usize,
) -> Array2<f64> {
    let mut centroids = Array2::zeros((k, points.ncols()));
    let mut counts = vec![0usize; k];
    for (i, &cluster) in assignments.iter().enumerate() {
        let mut row = centroids.row_mut(cluster);
        row += &points.row(i);
        counts[cluster] += 1;
    }
    for (c, count) in counts.iter().enumerate() {
        if *count > 0 {
            let mut row = centroids.row_mut(c);
            row /= *count as f64;
        }
    }
    centroids
}

/// Lloyd iterations until assignments stop moving.
fn kmeans(points: &Array2<f64>, k: usize, settings: &AnalysisSettings) -> Vec<usize> {
    let mut centroids = initial_centroids(points, k);
    let mut assignments = assign_points(points, &centroids);

    for _ in 0..settings.kmeans_max_iterations {
        centroids = recompute_centroids(points, &assignments, k);
        let new_assignments = assign_points(points, &centroids);
        let moved = new_assignments
            .iter()
            .zip(&assignments)
            .filter(|(a, b)| a != b)
            .count();
        assignments = new_assignments;
        if moved == 0 {
            break;
        }
    }
    assignments
}

/// Mean silhouette over all points; 0.0 when there is only one cluster.
fn silhouette_score(points: &Array2<f64>, assignments: &[usize], k: usize) -> f64 {
    if k < 2 {
        return 0.0;
    }
    let n = points.nrows();
    let mut total = 0.0;
    let mut scored = 0usize;

    for i in 0..n {
        let own = assignments[i];
        let mut intra_sum = 0.0;
        let mut intra_count = 0usize;
        let mut inter: Vec<(f64, usize)> = vec![(0.0, 0); k];

        for j in 0..n {
            if i == j {
                continue;
            }
            let dist = squared_distance(points.row(i), points.row(j)).sqrt();
            if assignments[j] == own {
                intra_sum += dist;
                intra_count += 1;
            } else {
                inter[assignments[j]].0 += dist;
                inter[assignments[j]].1 += 1;
            }
        }

        if intra_count == 0 {
            // Singleton cluster: silhouette is defined as 0
            scored += 1;
            continue;
        }

        let a = intra_sum / intra_count as f64;
        let b = inter
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(sum, count)| sum / *count as f64)
            .fold(f64::INFINITY, f64::min);
        if b.is_finite() {
            total += (b - a) / a.max(b);
            scored += 1;
        }
    }

    if scored == 0 { 0.0 } else { total / scored as f64 }
}

/// Partition archetypes into clusters over {win_rate, share, trend_slope},
/// k-means with deterministic seeding. When fewer archetypes than requested
/// clusters exist, the cluster count is reduced rather than failing.
pub fn cluster_archetypes(
    features: &[ArchetypeFeatures],
    settings: &AnalysisSettings,
) -> ClusteringAnalysis {
    let requested = settings.cluster_count;
    let n = features.len();
    let k = requested.min(n).max(1);

    if n == 0 {
        return ClusteringAnalysis {
            requested_clusters: requested,
            effective_clusters: 0,
            silhouette_score: 0.0,
            clusters: vec![],
        };
    }
    if k < requested {
        info!(
            "Reducing cluster count from {} to {} ({} archetypes)",
            requested, k, n
        );
    }

    let mut points = Array2::zeros((n, 3));
    for (i, f) in features.iter().enumerate() {
        points
            .row_mut(i)
            .assign(&Array1::from(vec![f.win_rate, f.share, f.trend_slope]));
    }
    standardize(&mut points);

    let assignments = kmeans(&points, k, settings);
    let score = silhouette_score(&points, &assignments, k);

    let mut clusters: Vec<ArchetypeCluster> = Vec::new();
    for cluster_id in 0..k {
        let members: Vec<usize> = (0..n).filter(|&i| assignments[i] == cluster_id).collect();
        if members.is_empty() {
            continue;
        }
        let len = members.len() as f64;
        let centroid = ClusterCentroid {
            win_rate: members.iter().map(|&i| features[i].win_rate).sum::<f64>() / len,
            share: members.iter().map(|&i| features[i].share).sum::<f64>() / len,
            trend_slope: members.iter().map(|&i| features[i].trend_slope).sum::<f64>() / len,
        };
        clusters.push(ArchetypeCluster {
            id: clusters.len(),
            members: members.iter().map(|&i| features[i].archetype.clone()).collect(),
            centroid,
        });
    }

    ClusteringAnalysis {
        requested_clusters: requested,
        effective_clusters: clusters.len(),
        silhouette_score: score,
        clusters,
    }
}
