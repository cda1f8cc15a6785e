use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// 深度缓冲的长度与视口面积不一致
    DepthBufferSize { expected: usize, actual: usize },
    /// 颜色缓冲（画布）的长度与视口面积不一致
    CanvasSize { expected: usize, actual: usize },
    /// 顶点数量不是 3 的倍数
    InvalidVertexCount(usize),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::DepthBufferSize { expected, actual } => {
                write!(f, "深度缓冲大小错误: 需要 {} 个像素，实际 {}", expected, actual)
            }
            RenderError::CanvasSize { expected, actual } => {
                write!(f, "画布大小错误: 需要 {} 个像素，实际 {}", expected, actual)
            }
            RenderError::InvalidVertexCount(count) => {
                write!(f, "{} 个顶点无法组成三角形列表", count)
            }
        }
    }
}

impl std::error::Error for RenderError {}

pub type RenderResult<T> = Result<T, RenderError>;
