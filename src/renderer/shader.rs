use cgmath::{Matrix4 as Mat4, SquareMatrix, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4, Zero};

use crate::camera::Camera;
use crate::model::Mesh;

/// 每个实例绘制前统一设置的变换矩阵
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub model: Mat4<f32>,
    pub view: Mat4<f32>,
    pub proj: Mat4<f32>,
    pub model_view: Mat4<f32>,
    pub model_view_proj: Mat4<f32>,
    pub camera_pos: Vec3<f32>,
}

impl Uniforms {
    pub fn new(model: Mat4<f32>, camera: &Camera) -> Self {
        let model_view = camera.viewing * model;
        Self {
            model,
            view: camera.viewing,
            proj: camera.projection,
            model_view,
            model_view_proj: camera.projection * model_view,
            camera_pos: camera.position,
        }
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            model: Mat4::identity(),
            view: Mat4::identity(),
            proj: Mat4::identity(),
            model_view: Mat4::identity(),
            model_view_proj: Mat4::identity(),
            camera_pos: Vec3::zero(),
        }
    }
}

/// 一次绘制调用的着色器：顶点、几何、片元三个阶段
///
/// 渲染器只在一次 `render` 调用期间借用着色器。单个三角形内，
/// 顶点阶段按 slot 0..3 依次调用，片元阶段拿到的重心坐标总是相对于
/// 这三个 slot，因此可以在顶点阶段把 varying 存在 `self` 里。
pub trait Shader {
    fn uniforms(&self) -> &Uniforms;

    fn uniforms_mut(&mut self) -> &mut Uniforms;

    /// 返回网格第 `index` 个顶点的裁剪空间坐标，`slot` 是它在当前三角形中的位置
    fn vertex(&mut self, mesh: &Mesh, index: usize, slot: usize) -> Vec4<f32>;

    /// 可以原地改写当前三角形的三个裁剪空间顶点
    fn geometry(&mut self, _vertices: &mut [Vec4<f32>; 3]) {}

    /// `barycenter` 是透视校正后相对原始三角形的重心坐标，
    /// `screen` 是归一化的屏幕坐标，结果直接写入 `color`
    fn fragment(&mut self, barycenter: Vec3<f32>, screen: Vec2<f32>, color: &mut Vec4<f32>);
}
