// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/detection.rs - 检测结果定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

/// COCO 数据集类别名称
pub const COCO_CLASSES: [&str; 80] = [
  "person",
  "bicycle",
  "car",
  "motorcycle",
  "airplane",
  "bus",
  "train",
  "truck",
  "boat",
  "traffic light",
  "fire hydrant",
  "stop sign",
  "parking meter",
  "bench",
  "bird",
  "cat",
  "dog",
  "horse",
  "sheep",
  "cow",
  "elephant",
  "bear",
  "zebra",
  "giraffe",
  "backpack",
  "umbrella",
  "handbag",
  "tie",
  "suitcase",
  "frisbee",
  "skis",
  "snowboard",
  "sports ball",
  "kite",
  "baseball bat",
  "baseball glove",
  "skateboard",
  "surfboard",
  "tennis racket",
  "bottle",
  "wine glass",
  "cup",
  "fork",
  "knife",
  "spoon",
  "bowl",
  "banana",
  "apple",
  "sandwich",
  "orange",
  "broccoli",
  "carrot",
  "hot dog",
  "pizza",
  "donut",
  "cake",
  "chair",
  "couch",
  "potted plant",
  "bed",
  "dining table",
  "toilet",
  "tv",
  "laptop",
  "mouse",
  "remote",
  "keyboard",
  "cell phone",
  "microwave",
  "oven",
  "toaster",
  "sink",
  "refrigerator",
  "book",
  "clock",
  "vase",
  "scissors",
  "teddy bear",
  "hair drier",
  "toothbrush",
];

/// 按类别索引查询 COCO 类别名称
pub fn class_name(class_id: u32) -> &'static str {
  COCO_CLASSES.get(class_id as usize).copied().unwrap_or("unknown")
}

/// 单个检测结果
#[derive(Debug, Clone)]
pub struct DetectItem {
  /// 类别索引
  pub class_id: u32,
  /// 得分（置信度与类别概率之积）
  pub score: f32,
  /// 边界框 [y_min, x_min, y_max, x_max]，原始图像像素坐标
  pub bbox: [f32; 4],
}

/// 一次推理的全部检测结果
#[derive(Debug, Clone)]
pub struct DetectResult {
  pub items: Box<[DetectItem]>,
}

impl DetectResult {
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, DetectItem> {
    self.items.iter()
  }

  /// 所有边界框，与 scores、classes 平行索引
  pub fn boxes(&self) -> Vec<[f32; 4]> {
    self.items.iter().map(|item| item.bbox).collect()
  }

  /// 所有得分，与 boxes、classes 平行索引
  pub fn scores(&self) -> Vec<f32> {
    self.items.iter().map(|item| item.score).collect()
  }

  /// 所有类别索引，与 boxes、scores 平行索引
  pub fn classes(&self) -> Vec<u32> {
    self.items.iter().map(|item| item.class_id).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_class_name_lookup() {
    assert_eq!(class_name(0), "person");
    assert_eq!(class_name(79), "toothbrush");
    assert_eq!(class_name(80), "unknown");
  }

  #[test]
  fn test_parallel_views() {
    let result = DetectResult {
      items: vec![
        DetectItem {
          class_id: 2,
          score: 0.9,
          bbox: [1.0, 2.0, 3.0, 4.0],
        },
        DetectItem {
          class_id: 7,
          score: 0.8,
          bbox: [5.0, 6.0, 7.0, 8.0],
        },
      ]
      .into_boxed_slice(),
    };
    assert_eq!(result.len(), 2);
    assert_eq!(result.boxes()[1], [5.0, 6.0, 7.0, 8.0]);
    assert_eq!(result.scores(), vec![0.9, 0.8]);
    assert_eq!(result.classes(), vec![2, 7]);
  }
}
