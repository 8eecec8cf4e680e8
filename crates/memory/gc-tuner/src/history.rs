//! 回收事件与历史记录

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::collection::CollectionOutcome;
use crate::generation::GenerationSnapshot;

// ============================================================================
// 回收事件
// ============================================================================

/// 单次回收事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvent {
    /// 所在的循环序号（从 1 开始）
    pub iteration: u64,
    /// 回收结果
    pub outcome: CollectionOutcome,
    /// 回收前各代状态
    pub before: Vec<GenerationSnapshot>,
    /// 回收后各代状态
    pub after: Vec<GenerationSnapshot>,
}

impl CollectionEvent {
    /// 被回收的代
    pub fn generation(&self) -> usize {
        self.outcome.generation
    }

    /// 阈值变化量
    pub fn threshold_delta(&self) -> i64 {
        self.outcome.new_threshold as i64 - self.outcome.old_threshold as i64
    }
}

// ============================================================================
// 历史记录
// ============================================================================

/// 回收历史
#[derive(Debug, Clone)]
pub struct CollectionHistory {
    /// 历史记录
    entries: VecDeque<CollectionEvent>,
    /// 最大保留条目数
    max_entries: usize,
}

impl CollectionHistory {
    /// 创建新的历史记录
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// 添加记录，超出容量时丢弃最旧的条目
    pub fn push(&mut self, event: CollectionEvent) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// 按时间顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &CollectionEvent> {
        self.entries.iter()
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 某一代在历史中被回收的频率
    pub fn generation_frequency(&self, generation: usize) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }

        let count = self
            .entries
            .iter()
            .filter(|e| e.generation() == generation)
            .count();
        count as f64 / self.entries.len() as f64
    }

    /// 某一代在历史中的平均回收垃圾比例
    pub fn avg_trash_ratio(&self, generation: usize) -> Option<f64> {
        let ratios: Vec<f64> = self
            .entries
            .iter()
            .filter(|e| e.generation() == generation && e.outcome.total_size > 0)
            .map(|e| e.outcome.total_trash as f64 / e.outcome.total_size as f64)
            .collect();

        if ratios.is_empty() {
            return None;
        }
        Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
    }
}
