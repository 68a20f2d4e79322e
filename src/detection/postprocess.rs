use crate::models::BoundingBox;

/// Thresholds applied when turning raw model rows into detections.
///
/// Defaults match YOLOv5's own inference wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostprocessParams {
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for PostprocessParams {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 1000,
        }
    }
}

/// A scored box before class names are attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub bbox: BoundingBox,
    pub class_id: usize,
    pub score: f32,
}

/// Decode YOLOv5 output rows `(cx, cy, w, h, objectness, class scores...)`.
///
/// `data` is the flattened `[1, N, row_len]` output tensor.
pub fn decode_rows(data: &[f32], row_len: usize, conf_threshold: f32) -> Vec<Candidate> {
    if row_len <= 5 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for row in data.chunks_exact(row_len) {
        let objectness = row[4];
        if objectness <= conf_threshold {
            continue;
        }

        let Some((class_id, class_score)) = row[5..]
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, item| if item.1 > best.1 { item } else { best })
        else {
            continue;
        };

        let score = objectness * class_score;
        if score <= conf_threshold {
            continue;
        }

        let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
        candidates.push(Candidate {
            bbox: BoundingBox::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0),
            class_id,
            score,
        });
    }
    candidates
}

/// Non maximum suppression, applied per class.
///
/// Output is sorted by descending score and truncated to `max_detections`.
pub fn non_maximum_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.retain(|c| c.score.is_finite());
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut suppressed = vec![false; candidates.len()];
    let mut kept = Vec::new();

    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }
        kept.push(candidates[i]);
        if kept.len() == max_detections {
            break;
        }
        for j in (i + 1)..candidates.len() {
            if suppressed[j] || candidates[i].class_id != candidates[j].class_id {
                continue;
            }
            if candidates[i].bbox.iou(&candidates[j].bbox) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    kept
}
