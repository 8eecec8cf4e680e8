//! 分代阈值模拟配置

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GcError, GcResult};

/// 单个代的调优参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// 初始回收阈值（分配计数）
    pub threshold: u64,
    /// 目标垃圾比例（0.0-1.0，开区间）
    pub target: f64,
    /// 阈值下限
    pub min_threshold: u64,
    /// 阈值上限
    pub max_threshold: u64,
}

impl GenerationConfig {
    /// 创建新的代配置
    pub fn new(threshold: u64, target: f64, min_threshold: u64, max_threshold: u64) -> Self {
        Self {
            threshold,
            target,
            min_threshold,
            max_threshold,
        }
    }

    /// 校验代配置
    pub fn validate(&self, index: usize) -> GcResult<()> {
        if self.min_threshold > self.max_threshold {
            return Err(GcError::invalid_config(format!(
                "generation {index}: min_threshold {} exceeds max_threshold {}",
                self.min_threshold, self.max_threshold
            )));
        }
        if !(self.target > 0.0 && self.target < 1.0) {
            return Err(GcError::invalid_config(format!(
                "generation {index}: target {} must lie in (0, 1)",
                self.target
            )));
        }
        if self.threshold < self.min_threshold || self.threshold > self.max_threshold {
            return Err(GcError::invalid_config(format!(
                "generation {index}: threshold {} outside [{}, {}]",
                self.threshold, self.min_threshold, self.max_threshold
            )));
        }
        if self.threshold == 0 {
            return Err(GcError::invalid_config(format!(
                "generation {index}: threshold must be positive"
            )));
        }
        Ok(())
    }
}

/// 没有代超过阈值时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdlePolicy {
    /// 回收最年轻的代
    #[default]
    CollectYoungest,
    /// 跳过本轮回收
    Skip,
}

/// 模拟配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 各代参数，从最年轻到最老
    pub generations: Vec<GenerationConfig>,
    /// 新分配对象中立即成为垃圾的比例
    pub trash_ratio: f64,
    /// 晋升对象中因老年代引用而被保守保留的比例
    pub long_lived_ratio: f64,
    /// 分配/回收循环次数
    pub iterations: u64,
    /// 空闲策略
    pub idle_policy: IdlePolicy,
    /// 保留的回收事件条目数
    pub history_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            generations: vec![
                GenerationConfig::new(700, 0.2, 700, 5000),
                GenerationConfig::new(10, 0.4, 10, 200),
                GenerationConfig::new(10, 0.6, 10, 200),
            ],
            trash_ratio: 0.02,
            long_lived_ratio: 0.01,
            iterations: 100_000,
            idle_policy: IdlePolicy::CollectYoungest,
            history_capacity: 128,
        }
    }
}

impl SimulationConfig {
    /// 校验整个配置
    pub fn validate(&self) -> GcResult<()> {
        if self.generations.is_empty() {
            return Err(GcError::invalid_config("at least one generation is required"));
        }
        for (index, generation) in self.generations.iter().enumerate() {
            generation.validate(index)?;
        }
        if !(0.0..=1.0).contains(&self.trash_ratio) {
            return Err(GcError::invalid_config(format!(
                "trash_ratio {} must lie in [0, 1]",
                self.trash_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.long_lived_ratio) {
            return Err(GcError::invalid_config(format!(
                "long_lived_ratio {} must lie in [0, 1]",
                self.long_lived_ratio
            )));
        }
        if self.history_capacity == 0 {
            return Err(GcError::invalid_config("history_capacity must be positive"));
        }
        Ok(())
    }

    /// 从文件加载配置（按扩展名区分 TOML / JSON）
    pub fn from_file(path: &Path) -> GcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 导出为 TOML
    pub fn to_toml_string(&self) -> GcResult<String> {
        toml::to_string_pretty(self).map_err(|e| GcError::parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generations.len(), 3);
        assert_eq!(config.generations[0], GenerationConfig::new(700, 0.2, 700, 5000));
    }

    #[test]
    fn test_reject_inverted_bounds() {
        let config = GenerationConfig::new(10, 0.5, 20, 10);
        let err = config.validate(1).unwrap_err();
        assert!(matches!(err, GcError::InvalidConfig(_)));
        assert!(err.to_string().contains("generation 1"));
    }

    #[test]
    fn test_reject_target_outside_open_interval() {
        assert!(GenerationConfig::new(10, 0.0, 10, 20).validate(0).is_err());
        assert!(GenerationConfig::new(10, 1.0, 10, 20).validate(0).is_err());
        assert!(GenerationConfig::new(10, f64::NAN, 10, 20).validate(0).is_err());
    }

    #[test]
    fn test_reject_threshold_outside_bounds() {
        assert!(GenerationConfig::new(5, 0.5, 10, 20).validate(0).is_err());
        assert!(GenerationConfig::new(25, 0.5, 10, 20).validate(0).is_err());
        assert!(GenerationConfig::new(0, 0.5, 0, 20).validate(0).is_err());
    }

    #[test]
    fn test_reject_global_ratios() {
        let mut config = SimulationConfig::default();
        config.trash_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.long_lived_ratio = -0.1;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.generations.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_override() {
        let config: SimulationConfig = toml::from_str(
            r#"
            iterations = 50
            idle_policy = "skip"

            [[generations]]
            threshold = 100
            target = 0.3
            min_threshold = 50
            max_threshold = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.iterations, 50);
        assert_eq!(config.idle_policy, IdlePolicy::Skip);
        assert_eq!(config.generations.len(), 1);
        assert_eq!(config.trash_ratio, 0.02);
    }

    #[test]
    fn test_toml_dump_reloads() {
        let config = SimulationConfig::default();
        let dumped = config.to_toml_string().unwrap();
        let reloaded: SimulationConfig = toml::from_str(&dumped).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(&path, r#"{"iterations": 7, "trash_ratio": 0.1}"#).unwrap();

        let config = SimulationConfig::from_file(&path).unwrap();
        assert_eq!(config.iterations, 7);
        assert_eq!(config.trash_ratio, 0.1);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        std::fs::write(&path, "long_lived_ratio = 2.0\n").unwrap();

        let err = SimulationConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, GcError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/sim.toml")).unwrap_err();
        assert!(matches!(err, GcError::Io(_)));
    }
}
