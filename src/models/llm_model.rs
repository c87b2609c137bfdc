use phf::phf_map;
use serde::Serialize;

/// 可用模型信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub size: &'static str,
    pub description: &'static str,
}

/// 默认模型
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

static AVAILABLE_MODELS: phf::Map<&'static str, (&'static str, &'static str)> = phf_map! {
    "llama3.2:3b" => ("3B", "Small text model - Fast and efficient"),
    "deepseek-r1:1.5b" => ("1.5B", "Thinking model - Good for reasoning"),
    "gemma3:4b" => ("4B", "Small text and image model - Balanced"),
    "gemma3:270m" => ("270M", "Very small text model - Ultra fast"),
};

/// 查询模型信息；未登记的模型保留原名，大小与描述为 "Unknown"/"Custom model"
pub fn model_info(name: &str) -> ModelInfo {
    let (size, description) = AVAILABLE_MODELS
        .get(name)
        .copied()
        .unwrap_or(("Unknown", "Custom model"));
    ModelInfo {
        name: name.to_string(),
        size,
        description,
    }
}

/// 所有已登记模型（按名称排序）
pub fn available_models() -> Vec<ModelInfo> {
    let mut models: Vec<ModelInfo> = AVAILABLE_MODELS
        .entries()
        .map(|(&name, &(size, description))| ModelInfo {
            name: name.to_string(),
            size,
            description,
        })
        .collect();
    models.sort_by(|a, b| a.name.cmp(&b.name));
    models
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_model() {
        let info = model_info("gemma3:270m");
        assert_eq!(info.name, "gemma3:270m");
        assert_eq!(info.size, "270M");
        assert_eq!(info.description, "Very small text model - Ultra fast");
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let info = model_info("mistral:7b");
        assert_eq!(info.name, "mistral:7b");
        assert_eq!(info.size, "Unknown");
        assert_eq!(info.description, "Custom model");
    }

    #[test]
    fn test_available_models_sorted() {
        let names: Vec<_> = available_models().into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec!["deepseek-r1:1.5b", "gemma3:270m", "gemma3:4b", "llama3.2:3b"]
        );
        assert!(names.iter().any(|n| n == DEFAULT_MODEL));
    }
}
