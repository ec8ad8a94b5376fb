// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/draw.rs - 检测结果可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};

use crate::detection::{DetectItem, DetectResult, class_name};

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 20.0;
const LABEL_TEXT_HEIGHT: i32 = 24;
const LABEL_CHAR_WIDTH: f32 = 11.0; // 每字符平均宽度（粗略估计）
const LABEL_TEXT_VERTICAL_PADDING: i32 = 2;
const LABEL_COLOR: [u8; 3] = [0, 0, 255]; // 蓝色

pub struct Draw<'a> {
  font_size: f32,
  label_text_height: i32,
  label_char_width: f32,
  label_text_vertical_padding: i32,
  font: FontRef<'a>,
  label_color: [u8; 3],
}

impl<'a> Draw<'a> {
  pub fn new(font: FontRef<'a>) -> Self {
    Self {
      font_size: LABEL_FONT_SIZE,
      label_text_height: LABEL_TEXT_HEIGHT,
      label_char_width: LABEL_CHAR_WIDTH,
      label_text_vertical_padding: LABEL_TEXT_VERTICAL_PADDING,
      label_color: LABEL_COLOR,
      font,
    }
  }

  pub fn label_color(mut self, color: [u8; 3]) -> Self {
    self.label_color = color;
    self
  }

  /// 在图像上绘制全部检测框和标签
  pub fn draw_detections_on_image(&self, image: &mut RgbImage, result: &DetectResult) {
    for item in result.iter() {
      self.draw_bbox_with_label(image, item, self.label_color);
    }
  }

  // 绘制单个检测框，bbox 为原图像素坐标 [y_min, x_min, y_max, x_max]
  fn draw_bbox_with_label(&self, image: &mut RgbImage, item: &DetectItem, color: [u8; 3]) {
    let (w, h) = (image.width() as f32, image.height() as f32);

    let mut y_min = item.bbox[0].floor() as i32;
    let mut x_min = item.bbox[1].floor() as i32;
    let mut y_max = item.bbox[2].ceil() as i32;
    let mut x_max = item.bbox[3].ceil() as i32;

    // Clamp to image bounds
    x_min = x_min.clamp(0, w as i32 - 1);
    y_min = y_min.clamp(0, h as i32 - 1);
    x_max = x_max.clamp(0, w as i32 - 1);
    y_max = y_max.clamp(0, h as i32 - 1);

    if x_min >= x_max || y_min >= y_max {
      return;
    }

    // 绘制边框（加粗为2像素）
    for thickness in 0..2 {
      let x_min_t = (x_min + thickness).min(w as i32 - 1);
      let y_min_t = (y_min + thickness).min(h as i32 - 1);
      let x_max_t = (x_max - thickness).max(0);
      let y_max_t = (y_max - thickness).max(0);

      for x in x_min_t..=x_max_t {
        let top = image.get_pixel_mut(x as u32, y_min_t as u32);
        *top = Rgb(color);
        let bottom = image.get_pixel_mut(x as u32, y_max_t as u32);
        *bottom = Rgb(color);
      }

      for y in y_min_t..=y_max_t {
        let left = image.get_pixel_mut(x_min_t as u32, y as u32);
        *left = Rgb(color);
        let right = image.get_pixel_mut(x_max_t as u32, y as u32);
        *right = Rgb(color);
      }
    }

    // 创建标签文本
    let label = format!("{} {:.2}", class_name(item.class_id), item.score);

    let scale = PxScale::from(self.font_size);
    let text_color = Rgb([255u8, 255u8, 255u8]); // 白色文本

    // 估算文本大小（粗略估计）
    let text_width = (label.len() as f32 * self.label_char_width) as i32;
    let text_height = self.label_text_height;

    // 标签背景位于边框上方
    let label_x = x_min.max(0);
    let label_y = (y_min - text_height).max(0);

    let max_width = (w as i32 - label_x).max(0);
    let label_width = text_width.min(max_width) as u32;
    let label_height = text_height as u32;

    // 仅在标签有空间时绘制
    if label_width > 0 && label_height > 0 {
      let rect = imageproc::rect::Rect::at(label_x, label_y).of_size(label_width, label_height);
      draw_filled_rect_mut(image, rect, Rgb(color));

      draw_text_mut(
        image,
        text_color,
        label_x,
        label_y + self.label_text_vertical_padding,
        scale,
        &self.font,
        &label,
      );
    }
  }
}
