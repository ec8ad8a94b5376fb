// 该文件是 Saibei （塞北孤烟） 项目的一部分。
// src/lib.rs - 库主文件
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

pub mod anchor;
pub mod detection;
pub mod evaluate;
pub mod feature;
pub mod postprocess;

#[cfg(feature = "draw_output")]
pub mod draw;
#[cfg(feature = "letterbox_input")]
pub mod letterbox;
#[cfg(feature = "record_output")]
pub mod record;

pub use anchor::{Anchor, AnchorList, SCALE_MASKS, YOLOV4_ANCHORS};
pub use detection::{COCO_CLASSES, DetectItem, DetectResult};
pub use evaluate::{EvalConfig, EvalError, evaluate};
pub use feature::{FeatureMap, FeatureMapError};
