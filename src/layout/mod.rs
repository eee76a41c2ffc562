//! Text-line layout
//!
//! Reconstructs reading order from geometry alone. Detections are grouped
//! into lines by vertical proximity, then each line is ordered left to right
//! and word boundaries are inferred from horizontal gap statistics: pitch
//! between characters inside a word is statistically tighter than the gap
//! between words, so the median gap gives a per-line baseline that adapts to
//! symbol size without a fixed pixel threshold.

use tracing::debug;

use crate::detection::NormalizedDetection;

/// Default vertical distance (px) under which detections share a line
pub const DEFAULT_Y_THRESHOLD: f32 = 20.0;

/// Default multiple of the median gap above which a space is inserted
pub const DEFAULT_SPACE_FACTOR: f32 = 1.8;

/// Group detections into text lines by vertical proximity.
///
/// Detections are sorted by `y_center` (ties by `x_center`) and scanned once:
/// a detection joins the current line when its `y_center` is strictly within
/// `y_threshold` of the *last detection appended* to that line, otherwise it
/// starts a new line. Every input detection lands in exactly one line; lines
/// come out top to bottom, detections within a line not yet ordered.
pub fn cluster_lines(
    mut detections: Vec<NormalizedDetection>,
    y_threshold: f32,
) -> Vec<Vec<NormalizedDetection>> {
    if detections.is_empty() {
        return Vec::new();
    }

    detections.sort_by(|a, b| {
        a.y_center
            .total_cmp(&b.y_center)
            .then(a.x_center.total_cmp(&b.x_center))
    });

    let mut lines: Vec<Vec<NormalizedDetection>> = Vec::new();
    let mut current: Vec<NormalizedDetection> = Vec::new();

    for det in detections {
        match current.last() {
            Some(prev) if (det.y_center - prev.y_center).abs() < y_threshold => {
                current.push(det);
            }
            Some(_) => {
                lines.push(std::mem::take(&mut current));
                current.push(det);
            }
            None => current.push(det),
        }
    }
    lines.push(current);

    debug!("Clustered detections into {} lines", lines.len());

    lines
}

/// Order a line left to right and join its symbols, inserting a space
/// wherever the gap between consecutive centers exceeds `space_factor` times
/// the line's median gap. A single-detection line is its symbol alone.
pub fn segment_line(line: &mut [NormalizedDetection], space_factor: f32) -> String {
    if line.is_empty() {
        return String::new();
    }

    line.sort_by(|a, b| a.x_center.total_cmp(&b.x_center));

    if line.len() == 1 {
        return line[0].symbol.clone();
    }

    let gaps: Vec<f32> = line
        .windows(2)
        .map(|pair| pair[1].x_center - pair[0].x_center)
        .collect();
    let pitch = median(&gaps);

    let mut text = String::new();
    for (i, det) in line.iter().enumerate() {
        text.push_str(&det.symbol);
        if i < gaps.len() && gaps[i] > pitch * space_factor {
            text.push(' ');
        }
    }

    text
}

/// Median of a non-empty slice; the even-length case averages the two middle
/// values.
fn median(values: &[f32]) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;

    fn det(symbol: &str, x_center: f32, y_center: f32) -> NormalizedDetection {
        NormalizedDetection {
            symbol: symbol.to_string(),
            confidence: 0.9,
            bbox: BoundingBox::new(x_center - 2.0, y_center - 2.0, x_center + 2.0, y_center + 2.0),
            x_center,
            y_center,
        }
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert!(cluster_lines(Vec::new(), DEFAULT_Y_THRESHOLD).is_empty());
    }

    #[test]
    fn test_vertical_separation_splits_lines() {
        // 25 px apart with threshold 20: two lines
        let lines = cluster_lines(vec![det("A", 0.0, 10.0), det("B", 0.0, 35.0)], 20.0);
        assert_eq!(lines.len(), 2);

        // 15 px apart: same line
        let lines = cluster_lines(vec![det("A", 0.0, 10.0), det("B", 0.0, 25.0)], 20.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 2);
    }

    #[test]
    fn test_clustering_is_a_partition() {
        let input = vec![
            det("A", 5.0, 10.0),
            det("B", 50.0, 12.0),
            det("C", 5.0, 40.0),
            det("D", 50.0, 41.0),
            det("E", 5.0, 80.0),
        ];
        let lines = cluster_lines(input.clone(), 20.0);

        let total: usize = lines.iter().map(Vec::len).sum();
        assert_eq!(total, input.len());
        for original in &input {
            let occurrences: usize = lines
                .iter()
                .map(|line| line.iter().filter(|d| *d == original).count())
                .sum();
            assert_eq!(occurrences, 1, "{} must appear exactly once", original.symbol);
        }

        // Lines come out top to bottom
        assert_eq!(lines.len(), 3);
        assert!(lines[0][0].y_center < lines[1][0].y_center);
        assert!(lines[1][0].y_center < lines[2][0].y_center);
    }

    #[test]
    fn test_chaining_follows_last_appended_detection() {
        // Each step is 15 px from the previous one, but 30 px end to end.
        // Comparison against the last appended detection keeps them together.
        let lines = cluster_lines(
            vec![det("A", 0.0, 10.0), det("B", 0.0, 25.0), det("C", 0.0, 40.0)],
            20.0,
        );
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_single_detection_line_is_bare_symbol() {
        let mut line = vec![det("Q", 100.0, 10.0)];
        assert_eq!(segment_line(&mut line, DEFAULT_SPACE_FACTOR), "Q");
    }

    #[test]
    fn test_space_only_where_gap_exceeds_scaled_median() {
        // Centers [0, 10, 11, 40]: gaps [10, 1, 29], median 10.
        // Only 29 > 10 * 1.8, so exactly one space, before the last symbol.
        let mut line = vec![
            det("A", 0.0, 10.0),
            det("B", 10.0, 10.0),
            det("C", 11.0, 10.0),
            det("D", 40.0, 10.0),
        ];
        assert_eq!(segment_line(&mut line, 1.8), "ABC D");
    }

    #[test]
    fn test_segmentation_orders_left_to_right() {
        let mut line = vec![det("C", 30.0, 10.0), det("A", 0.0, 10.0), det("B", 15.0, 10.0)];
        assert_eq!(segment_line(&mut line, 1.8), "ABC");
    }

    #[test]
    fn test_uniform_pitch_gets_no_spaces() {
        let mut line: Vec<NormalizedDetection> = (0..6)
            .map(|i| det("X", i as f32 * 12.0, 10.0))
            .collect();
        assert_eq!(segment_line(&mut line, 1.8), "XXXXXX");
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[10.0, 1.0, 29.0]), 10.0);
        assert_eq!(median(&[1.0, 3.0, 5.0, 7.0]), 4.0);
        assert_eq!(median(&[2.0]), 2.0);
    }
}
