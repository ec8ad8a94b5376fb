// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/evaluate.rs - 后处理流水线入口
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;
use tracing::{debug, info};

use crate::{
  anchor::{AnchorList, NUM_SCALES},
  detection::{DetectItem, DetectResult},
  feature::{FeatureMap, FeatureMapError},
  postprocess::{NmsError, combine_scores, correct_boxes, decode_feature_map, nms_indices},
};

/// 最粗检测头的网格单元对应的输入像素跨度
const COARSEST_STRIDE: u32 = 32;

#[derive(Error, Debug)]
pub enum EvalError {
  #[error("特征图错误: {0}")]
  Feature(#[from] FeatureMapError),
  #[error("NMS 错误: {0}")]
  Nms(#[from] NmsError),
  #[error("检测头输出数量不匹配: 期望 {expected}, 实际 {actual}")]
  OutputCount { expected: usize, actual: usize },
}

/// 后处理配置
#[derive(Debug, Clone)]
pub struct EvalConfig {
  /// 每个类别最多保留的检测框数量
  pub max_boxes: usize,
  /// 得分阈值，低于该值的候选框被丢弃
  pub score_threshold: f32,
  /// NMS 交并比阈值
  pub iou_threshold: f32,
}

impl Default for EvalConfig {
  fn default() -> Self {
    EvalConfig {
      max_boxes: 20,
      score_threshold: 0.6,
      iou_threshold: 0.5,
    }
  }
}

impl EvalConfig {
  pub fn max_boxes(mut self, max_boxes: usize) -> Self {
    self.max_boxes = max_boxes;
    self
  }

  pub fn score_threshold(mut self, score_threshold: f32) -> Self {
    self.score_threshold = score_threshold;
    self
  }

  pub fn iou_threshold(mut self, iou_threshold: f32) -> Self {
    self.iou_threshold = iou_threshold;
    self
  }
}

/// 对三个检测头的输出执行完整后处理：
/// 解码 → 信箱坐标校正 → 得分合成 → 逐类别 NMS。
///
/// outputs 必须按从最粗到最细的尺度排列（例如 13x13、26x26、52x52），
/// 依次使用先验框索引组 [6,7,8]、[3,4,5]、[0,1,2]；网络输入尺寸由
/// 最粗特征图的网格尺寸乘以 32 推得。image_shape 为原始图像的
/// (高, 宽) 像素尺寸。
pub fn evaluate(
  outputs: &[FeatureMap],
  anchors: &AnchorList,
  num_classes: usize,
  image_shape: (u32, u32),
  config: &EvalConfig,
) -> Result<DetectResult, EvalError> {
  if outputs.len() != NUM_SCALES {
    return Err(EvalError::OutputCount {
      expected: NUM_SCALES,
      actual: outputs.len(),
    });
  }

  let input_shape = (
    outputs[0].grid_h() as u32 * COARSEST_STRIDE,
    outputs[0].grid_w() as u32 * COARSEST_STRIDE,
  );
  info!(
    "开始后处理: 输入尺寸 {}x{}, 图像尺寸 {}x{}, 类别数 {}",
    input_shape.0, input_shape.1, image_shape.0, image_shape.1, num_classes
  );

  let mut all_boxes = Vec::new();
  let mut all_scores = Vec::new();

  for (scale, feat) in outputs.iter().enumerate() {
    let group = anchors.scale_anchors(scale);
    let decoded = decode_feature_map(feat, &group, num_classes, input_shape)?;
    debug!(
      "尺度 {}: 网格 {}x{}, 候选框 {} 个",
      scale,
      feat.grid_h(),
      feat.grid_w(),
      decoded.len()
    );

    all_boxes.extend(correct_boxes(&decoded, input_shape, image_shape));
    all_scores.extend(combine_scores(&decoded));
  }

  debug!("候选框总数: {}", all_boxes.len());

  let mut items = Vec::new();
  for class_id in 0..num_classes {
    // 先按得分阈值过滤，再对该类别做贪心 NMS
    let mut class_boxes = Vec::new();
    let mut class_scores = Vec::new();
    for (bbox, scores) in all_boxes.iter().zip(all_scores.iter()) {
      let score = scores[class_id];
      if score >= config.score_threshold {
        class_boxes.push(*bbox);
        class_scores.push(score);
      }
    }
    if class_boxes.is_empty() {
      continue;
    }

    let keep = nms_indices(
      &class_boxes,
      &class_scores,
      config.iou_threshold,
      config.max_boxes,
    )?;
    debug!(
      "类别 {}: 过滤后 {} 框, NMS 保留 {} 框",
      class_id,
      class_boxes.len(),
      keep.len()
    );

    for index in keep {
      items.push(DetectItem {
        class_id: class_id as u32,
        score: class_scores[index],
        bbox: class_boxes[index],
      });
    }
  }

  info!("后处理完成: 共 {} 个检测结果", items.len());

  Ok(DetectResult {
    items: items.into_boxed_slice(),
  })
}
