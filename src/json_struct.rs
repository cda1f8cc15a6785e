use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct JsonConfig {
    pub width: usize,
    pub height: usize,
    pub output: String,
    #[serde(default)]
    pub depth_output: Option<String>,
    #[serde(default)]
    pub shader: ShaderKind,
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: Option<LightConfig>,
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderKind {
    #[default]
    Lambert,
    Normal,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// 垂直视角，角度制
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    pub color: [f32; 3],
    pub direction: [f32; 3],
    #[serde(default = "default_ambient")]
    pub ambient: f32,
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// OBJ 路径，缺省时使用内置立方体
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub angle: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

fn default_ambient() -> f32 {
    0.3
}

fn default_color() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
