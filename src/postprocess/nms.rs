// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/postprocess/nms.rs - 非极大值抑制
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::cmp::Ordering;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum NmsError {
  #[error("边界框数量与得分数量不一致: {boxes} != {scores}")]
  CountMismatch { boxes: usize, scores: usize },
}

/// 计算两个边界框的交并比，框格式为 [y_min, x_min, y_max, x_max]
pub fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
  let y1 = a[0].max(b[0]);
  let x1 = a[1].max(b[1]);
  let y2 = a[2].min(b[2]);
  let x2 = a[3].min(b[3]);

  let intersection = (y2 - y1).max(0.0) * (x2 - x1).max(0.0);
  let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
  let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
  let union = area_a + area_b - intersection;

  if union > 0.0 {
    intersection / union
  } else {
    0.0
  }
}

/// 贪心非极大值抑制，返回保留框的输入索引，按得分降序排列。
///
/// 得分相同的框保持原始输入顺序（稳定排序）。每次选出得分最高
/// 的剩余框，抑制与其交并比超过 iou_threshold 的其余框，直到
/// 没有剩余或已保留 max_boxes 个。
pub fn nms_indices(
  boxes: &[[f32; 4]],
  scores: &[f32],
  iou_threshold: f32,
  max_boxes: usize,
) -> Result<Vec<usize>, NmsError> {
  if boxes.len() != scores.len() {
    return Err(NmsError::CountMismatch {
      boxes: boxes.len(),
      scores: scores.len(),
    });
  }

  let mut order: Vec<usize> = (0..boxes.len()).collect();
  order.sort_by(|&a, &b| {
    scores[b]
      .partial_cmp(&scores[a])
      .unwrap_or(Ordering::Equal)
  });

  let mut suppressed = vec![false; boxes.len()];
  let mut keep = Vec::new();

  for (rank, &index) in order.iter().enumerate() {
    if suppressed[index] {
      continue;
    }

    keep.push(index);
    if keep.len() >= max_boxes {
      break;
    }

    for &other in &order[rank + 1..] {
      if suppressed[other] {
        continue;
      }
      if iou(&boxes[index], &boxes[other]) > iou_threshold {
        suppressed[other] = true;
      }
    }
  }

  debug!("NMS: 输入 {} 框, 保留 {} 框", boxes.len(), keep.len());

  Ok(keep)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_iou_with_self_is_one() {
    let a = [0.0, 0.0, 10.0, 20.0];
    assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
  }

  #[test]
  fn test_iou_symmetric_and_bounded() {
    let a = [0.0, 0.0, 10.0, 10.0];
    let b = [5.0, 5.0, 15.0, 15.0];
    let ab = iou(&a, &b);
    let ba = iou(&b, &a);
    assert!((ab - ba).abs() < 1e-6);
    assert!((0.0..=1.0).contains(&ab));
  }

  #[test]
  fn test_iou_disjoint_is_zero() {
    let a = [0.0, 0.0, 10.0, 10.0];
    let b = [20.0, 20.0, 30.0, 30.0];
    assert_eq!(iou(&a, &b), 0.0);
  }

  #[test]
  fn test_nms_suppresses_overlap() {
    let boxes = [
      [0.0, 0.0, 10.0, 10.0],
      [1.0, 1.0, 11.0, 11.0],
      [50.0, 50.0, 60.0, 60.0],
    ];
    let scores = [0.9, 0.8, 0.95];
    let keep = nms_indices(&boxes, &scores, 0.5, 20).unwrap();
    // 索引 1 与索引 0 重叠（IoU > 0.5），被抑制
    assert_eq!(keep, vec![2, 0]);
  }

  #[test]
  fn test_nms_respects_max_boxes() {
    let boxes = [
      [0.0, 0.0, 10.0, 10.0],
      [100.0, 100.0, 110.0, 110.0],
      [200.0, 200.0, 210.0, 210.0],
    ];
    let scores = [0.9, 0.8, 0.7];
    let keep = nms_indices(&boxes, &scores, 0.5, 2).unwrap();
    assert_eq!(keep.len(), 2);
  }

  #[test]
  fn test_nms_stable_on_equal_scores() {
    let boxes = [
      [0.0, 0.0, 10.0, 10.0],
      [100.0, 100.0, 110.0, 110.0],
    ];
    let scores = [0.5, 0.5];
    let keep = nms_indices(&boxes, &scores, 0.5, 20).unwrap();
    // 得分相同时保持原始顺序
    assert_eq!(keep, vec![0, 1]);
  }

  #[test]
  fn test_nms_count_mismatch() {
    let boxes = [[0.0, 0.0, 1.0, 1.0]];
    let scores = [0.5, 0.4];
    assert!(matches!(
      nms_indices(&boxes, &scores, 0.5, 20),
      Err(NmsError::CountMismatch { boxes: 1, scores: 2 })
    ));
  }

  #[test]
  fn test_no_surviving_pair_exceeds_threshold() {
    let boxes = [
      [0.0, 0.0, 10.0, 10.0],
      [2.0, 2.0, 12.0, 12.0],
      [4.0, 4.0, 14.0, 14.0],
      [30.0, 30.0, 40.0, 40.0],
    ];
    let scores = [0.9, 0.85, 0.8, 0.7];
    let threshold = 0.3;
    let keep = nms_indices(&boxes, &scores, threshold, 20).unwrap();
    for (i, &a) in keep.iter().enumerate() {
      for &b in &keep[i + 1..] {
        assert!(iou(&boxes[a], &boxes[b]) <= threshold);
      }
    }
  }
}
