// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/postprocess/decode.rs - 检测头输出解码
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use tracing::debug;

use crate::{
  anchor::{ANCHORS_PER_SCALE, Anchor},
  feature::{FeatureMap, FeatureMapError},
};

/// 单个网格单元、单个先验框的解码结果
#[derive(Debug, Clone)]
pub struct DecodedBox {
  /// 中心点 (x, y)，归一化到 [0, 1] 的图像占比坐标
  pub center: [f32; 2],
  /// 宽高 (w, h)，同样归一化
  pub size: [f32; 2],
  /// 目标置信度
  pub confidence: f32,
  /// 各类别概率，逐类独立（非 softmax）
  pub class_probs: Box<[f32]>,
}

/// 将一个检测头的原始输出解码为网格相对的预测框。
///
/// 通道布局为 (x, y, w, h, conf, 类别...) 重复 ANCHORS_PER_SCALE 次。
/// 中心点经 sigmoid 后加网格坐标再除以网格尺寸，保证预测中心
/// 不会越过所属网格单元；宽高以先验框为对数尺度先验。
/// input_shape 为网络标称输入尺寸 (高, 宽)。
pub fn decode_feature_map(
  feat: &FeatureMap,
  anchors: &[Anchor; ANCHORS_PER_SCALE],
  num_classes: usize,
  input_shape: (u32, u32),
) -> Result<Vec<DecodedBox>, FeatureMapError> {
  feat.check_channels(ANCHORS_PER_SCALE, num_classes)?;

  let (input_h, input_w) = (input_shape.0 as f32, input_shape.1 as f32);
  let (grid_h, grid_w) = (feat.grid_h(), feat.grid_w());
  let stride = num_classes + 5;

  let mut boxes = Vec::with_capacity(feat.batch() * grid_h * grid_w * ANCHORS_PER_SCALE);

  for b in 0..feat.batch() {
    for gy in 0..grid_h {
      for gx in 0..grid_w {
        for (a, anchor) in anchors.iter().enumerate() {
          let base = a * stride;

          let raw_x = feat.at(b, gy, gx, base);
          let raw_y = feat.at(b, gy, gx, base + 1);
          let raw_w = feat.at(b, gy, gx, base + 2);
          let raw_h = feat.at(b, gy, gx, base + 3);
          let raw_conf = feat.at(b, gy, gx, base + 4);

          let center = [
            (sigmoid(raw_x) + gx as f32) / grid_w as f32,
            (sigmoid(raw_y) + gy as f32) / grid_h as f32,
          ];
          let size = [
            raw_w.exp() * anchor.width / input_w,
            raw_h.exp() * anchor.height / input_h,
          ];

          let class_probs = (0..num_classes)
            .map(|c| sigmoid(feat.at(b, gy, gx, base + 5 + c)))
            .collect();

          boxes.push(DecodedBox {
            center,
            size,
            confidence: sigmoid(raw_conf),
            class_probs,
          });
        }
      }
    }
  }

  debug!(
    "解码完成: 网格 {}x{}, 候选框 {} 个",
    grid_h,
    grid_w,
    boxes.len()
  );

  Ok(boxes)
}

fn sigmoid(x: f32) -> f32 {
  1.0 / (1.0 + (-x).exp())
}
