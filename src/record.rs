// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/record.rs - 检测结果记录输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::Path;

use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use crate::detection::{DetectResult, class_name};

#[derive(Error, Debug)]
pub enum RecordError {
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("序列化错误: {0}")]
  Json(#[from] serde_json::Error),
}

pub struct Record {
  pub label_with_name: bool,
}

impl Record {
  /// 将检测结果逐行写出为文本文件:
  /// 标签, 得分, y_min, x_min, y_max, x_max
  pub fn record(&self, result: &DetectResult, path: &Path) -> Result<(), RecordError> {
    let mut records = Vec::new();
    for item in result.iter() {
      let name = if self.label_with_name {
        class_name(item.class_id).to_string()
      } else {
        format!("{}", item.class_id)
      };
      let record = format!(
        "{}, {:.4}, {:.4}, {:.4}, {:.4}, {:.4}",
        name, item.score, item.bbox[0], item.bbox[1], item.bbox[2], item.bbox[3]
      );
      records.push(record);
    }
    std::fs::write(path.with_extension("txt"), records.join("\n"))?;
    Ok(())
  }

  /// 将检测结果写出为 JSON 文件，附带 UTC 时间戳
  pub fn record_json(&self, result: &DetectResult, path: &Path) -> Result<(), RecordError> {
    let items: Vec<_> = result
      .iter()
      .map(|item| {
        json!({
          "class_id": item.class_id,
          "label": class_name(item.class_id),
          "score": item.score,
          "bbox": item.bbox,
        })
      })
      .collect();

    let document = json!({
      "timestamp": Utc::now().to_rfc3339(),
      "items": items,
    });

    std::fs::write(
      path.with_extension("json"),
      serde_json::to_string_pretty(&document)?,
    )?;
    Ok(())
  }
}
