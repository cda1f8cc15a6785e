use cgmath::{ElementWise, InnerSpace, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4, Zero};

use super::shader::{Shader, Uniforms};
use crate::model::Mesh;

#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub direction: Vec3<f32>,
    pub color: Vec3<f32>,
    pub intensity: f32,
    pub ambient_strength: f32,
    pub ambient_color: Vec3<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vec3::new(1., -0.2, -0.1).normalize(),
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            ambient_strength: 0.3,
            ambient_color: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Light {
    pub fn set_light(&mut self, color: [f32; 3], direction: [f32; 3]) {
        self.color = Vec3::new(color[0], color[1], color[2]);
        self.direction = Vec3::new(direction[0], direction[1], direction[2]).normalize();
    }
}

/// 按重心坐标混合三个 slot 的属性
fn blend(values: &[Vec3<f32>; 3], b: Vec3<f32>) -> Vec3<f32> {
    values[0] * b.x + values[1] * b.y + values[2] * b.z
}

/// 模型矩阵作用在法线上（假设等比缩放）
fn world_normal(uniforms: &Uniforms, normal: Vec3<f32>) -> Vec3<f32> {
    let n = (uniforms.model * normal.extend(0.0)).truncate();
    if n.is_zero() { n } else { n.normalize() }
}

/// 把世界空间法线映射成颜色，调试用
#[derive(Debug)]
pub struct NormalShader {
    pub uniforms: Uniforms,
    normals: [Vec3<f32>; 3],
}

impl Default for NormalShader {
    fn default() -> Self {
        Self {
            uniforms: Uniforms::default(),
            normals: [Vec3::zero(); 3],
        }
    }
}

impl Shader for NormalShader {
    fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    fn vertex(&mut self, mesh: &Mesh, index: usize, slot: usize) -> Vec4<f32> {
        self.normals[slot] = world_normal(&self.uniforms, mesh.normal[index]);
        self.uniforms.model_view_proj * mesh.vertex[index].extend(1.0)
    }

    fn fragment(&mut self, barycenter: Vec3<f32>, _screen: Vec2<f32>, color: &mut Vec4<f32>) {
        let normal = blend(&self.normals, barycenter);
        let normal = if normal.is_zero() { normal } else { normal.normalize() };
        *color = ((normal + Vec3::new(1.0, 1.0, 1.0)) * 0.5).extend(1.0);
    }
}

/// 方向光 + 环境光的漫反射着色，基础色取网格的顶点颜色
#[derive(Debug)]
pub struct LambertShader {
    pub uniforms: Uniforms,
    pub light: Light,
    normals: [Vec3<f32>; 3],
    colors: [Vec3<f32>; 3],
}

impl LambertShader {
    pub fn new(light: Light) -> Self {
        Self {
            uniforms: Uniforms::default(),
            light,
            normals: [Vec3::zero(); 3],
            colors: [Vec3::zero(); 3],
        }
    }
}

impl Default for LambertShader {
    fn default() -> Self {
        Self::new(Light::default())
    }
}

impl Shader for LambertShader {
    fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    fn vertex(&mut self, mesh: &Mesh, index: usize, slot: usize) -> Vec4<f32> {
        self.normals[slot] = world_normal(&self.uniforms, mesh.normal[index]);
        self.colors[slot] = mesh.color[index];
        self.uniforms.model_view_proj * mesh.vertex[index].extend(1.0)
    }

    fn fragment(&mut self, barycenter: Vec3<f32>, _screen: Vec2<f32>, color: &mut Vec4<f32>) {
        let base_color = blend(&self.colors, barycenter);
        let normal = blend(&self.normals, barycenter);
        let normal = if normal.is_zero() { normal } else { normal.normalize() };

        // 环境光
        let ambient = self.light.ambient_color * self.light.ambient_strength;

        // 漫反射
        let diff = normal.dot(-self.light.direction).max(0.0);
        let diffuse = self.light.color * self.light.intensity * diff;

        let mut final_color = base_color.mul_element_wise(ambient + diffuse);
        final_color.x = final_color.x.clamp(0.0, 1.0);
        final_color.y = final_color.y.clamp(0.0, 1.0);
        final_color.z = final_color.z.clamp(0.0, 1.0);

        *color = final_color.extend(1.0);
    }
}
