//! Manifest vocabulary: model types, categories, and the grouping table.
//!
//! Both enums are closed sets: the manifest schema is versioned and adding a
//! value here is a schema change, not a convenience.

use serde::{Deserialize, Serialize};

/// Supported model artifact types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Full model checkpoint
    Checkpoint,
    /// Bare diffusion model (UNet/DiT only)
    DiffusionModel,
    /// LoRA adapter
    Lora,
    /// VAE encoder/decoder
    Vae,
    /// Text encoder (CLIP, T5, ...)
    TextEncoder,
    /// ControlNet
    Controlnet,
    /// Upscaler
    Upscaler,
    /// Textual-inversion embedding
    Embedding,
    /// IP-Adapter
    Ipadapter,
    /// Segmentation model
    Segmentation,
    /// Recipe composed from other registered models
    Recipe,
}

impl ModelType {
    /// All valid types, in manifest-schema order.
    pub const ALL: [ModelType; 11] = [
        ModelType::Checkpoint,
        ModelType::DiffusionModel,
        ModelType::Lora,
        ModelType::Vae,
        ModelType::TextEncoder,
        ModelType::Controlnet,
        ModelType::Upscaler,
        ModelType::Embedding,
        ModelType::Ipadapter,
        ModelType::Segmentation,
        ModelType::Recipe,
    ];

    /// Return the canonical lowercase string for this model type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Checkpoint => "checkpoint",
            ModelType::DiffusionModel => "diffusion_model",
            ModelType::Lora => "lora",
            ModelType::Vae => "vae",
            ModelType::TextEncoder => "text_encoder",
            ModelType::Controlnet => "controlnet",
            ModelType::Upscaler => "upscaler",
            ModelType::Embedding => "embedding",
            ModelType::Ipadapter => "ipadapter",
            ModelType::Segmentation => "segmentation",
            ModelType::Recipe => "recipe",
        }
    }
}

impl std::str::FromStr for ModelType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional manifest categories for browsing/filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    General,
    Style,
    Character,
    Concept,
    Product,
    Technique,
    Acceleration,
    Editing,
    Upscaling,
    Segmentation,
    Controlnet,
}

impl Category {
    /// All valid categories, in manifest-schema order.
    pub const ALL: [Category; 11] = [
        Category::General,
        Category::Style,
        Category::Character,
        Category::Concept,
        Category::Product,
        Category::Technique,
        Category::Acceleration,
        Category::Editing,
        Category::Upscaling,
        Category::Segmentation,
        Category::Controlnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Style => "style",
            Category::Character => "character",
            Category::Concept => "concept",
            Category::Product => "product",
            Category::Technique => "technique",
            Category::Acceleration => "acceleration",
            Category::Editing => "editing",
            Category::Upscaling => "upscaling",
            Category::Segmentation => "segmentation",
            Category::Controlnet => "controlnet",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Map a grouping directory name under `manifests/` to the model type its
/// manifests must declare. Unknown directories are skipped by the builder.
pub fn grouping_type(dir_name: &str) -> Option<ModelType> {
    match dir_name {
        "checkpoints" => Some(ModelType::Checkpoint),
        "diffusion_models" => Some(ModelType::DiffusionModel),
        "loras" => Some(ModelType::Lora),
        "vae" => Some(ModelType::Vae),
        "text_encoders" => Some(ModelType::TextEncoder),
        "controlnet" => Some(ModelType::Controlnet),
        "upscalers" => Some(ModelType::Upscaler),
        "embeddings" => Some(ModelType::Embedding),
        "ipadapters" => Some(ModelType::Ipadapter),
        "segmentation" => Some(ModelType::Segmentation),
        "recipes" => Some(ModelType::Recipe),
        _ => None,
    }
}
