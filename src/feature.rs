// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/feature.rs - 检测头输出特征图
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureMapError {
  #[error("数据长度不匹配: 期望 {expected}, 实际 {actual}")]
  DataLength { expected: usize, actual: usize },
  #[error("通道维度不匹配: 期望 {anchors} * ({classes} + 5) = {expected}, 实际 {actual}")]
  ChannelMismatch {
    anchors: usize,
    classes: usize,
    expected: usize,
    actual: usize,
  },
}

/// 单个检测头输出的四维特征图 (batch, grid_h, grid_w, channels)，
/// 以平铺的 f32 缓冲区存储，channels = anchors * (classes + 5)。
#[derive(Debug, Clone)]
pub struct FeatureMap {
  data: Box<[f32]>,
  batch: usize,
  grid_h: usize,
  grid_w: usize,
  channels: usize,
}

impl FeatureMap {
  pub fn new(
    data: Vec<f32>,
    batch: usize,
    grid_h: usize,
    grid_w: usize,
    channels: usize,
  ) -> Result<Self, FeatureMapError> {
    let expected = batch * grid_h * grid_w * channels;
    if data.len() != expected {
      return Err(FeatureMapError::DataLength {
        expected,
        actual: data.len(),
      });
    }

    Ok(FeatureMap {
      data: data.into_boxed_slice(),
      batch,
      grid_h,
      grid_w,
      channels,
    })
  }

  pub fn batch(&self) -> usize {
    self.batch
  }

  pub fn grid_h(&self) -> usize {
    self.grid_h
  }

  pub fn grid_w(&self) -> usize {
    self.grid_w
  }

  pub fn channels(&self) -> usize {
    self.channels
  }

  /// 校验通道维度是否恰好为 anchors * (classes + 5)
  pub fn check_channels(&self, anchors: usize, classes: usize) -> Result<(), FeatureMapError> {
    let expected = anchors * (classes + 5);
    if self.channels != expected {
      return Err(FeatureMapError::ChannelMismatch {
        anchors,
        classes,
        expected,
        actual: self.channels,
      });
    }
    Ok(())
  }

  #[inline]
  pub fn at(&self, b: usize, gy: usize, gx: usize, c: usize) -> f32 {
    let index = ((b * self.grid_h + gy) * self.grid_w + gx) * self.channels + c;
    self.data[index]
  }

  pub fn data(&self) -> &[f32] {
    &self.data
  }
}
