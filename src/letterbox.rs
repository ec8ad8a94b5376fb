// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/letterbox.rs - 信箱缩放预处理
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::{Rgb, RgbImage, imageops};
use tracing::debug;

/// 填充颜色，与训练时一致的中性灰
const PAD_COLOR: [u8; 3] = [128, 128, 128];

/// 保持宽高比将图像缩放到网络输入尺寸，不足部分以灰色居中填充。
///
/// 坐标校正 correct_boxes 假定输入图像经过了这一预处理。
pub fn letterbox_image(image: &RgbImage, input_width: u32, input_height: u32) -> RgbImage {
  let (image_w, image_h) = image.dimensions();

  let scale = (input_width as f32 / image_w as f32).min(input_height as f32 / image_h as f32);
  let new_w = ((image_w as f32 * scale).round() as u32).max(1);
  let new_h = ((image_h as f32 * scale).round() as u32).max(1);

  debug!(
    "信箱缩放: {}x{} -> 内容区 {}x{}, 画布 {}x{}",
    image_w, image_h, new_w, new_h, input_width, input_height
  );

  let resized = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);

  let mut canvas = RgbImage::from_pixel(input_width, input_height, Rgb(PAD_COLOR));
  let pad_x = (input_width - new_w) / 2;
  let pad_y = (input_height - new_h) / 2;
  imageops::replace(&mut canvas, &resized, pad_x as i64, pad_y as i64);

  canvas
}
