pub mod clip;
pub mod fragment_shader;
pub mod shader;

use cgmath::{Vector3 as Vec3, Vector4 as Vec4, Zero};
use log::{debug, trace};

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::FAR_DEPTH;
use crate::model::{Instance, Mesh};
use crate::rasterizer;
use crate::vertex::ClipPolygon;

use self::clip::{far_clip, near_clip};
use self::shader::{Shader, Uniforms};

/// 渲染目标的像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// 透视除法 + 视口变换，y 轴翻转，z 保留 NDC 值用于深度测试
    pub fn to_device(&self, clip: Vec4<f32>) -> Vec3<f32> {
        let ndc = clip.truncate() / clip.w;
        let half_width = self.width as f32 * 0.5;
        let half_height = self.height as f32 * 0.5;
        Vec3::new(
            ndc.x * half_width + half_width,
            -ndc.y * half_height + half_height,
            ndc.z,
        )
    }
}

/// 一次绘制的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// 提交的三角形数
    pub triangles: usize,
    /// 被近/远平面完全裁掉的三角形数
    pub clipped: usize,
    /// 通过深度测试的次数，扇形三角形共享边上的像素会被计两次
    pub fragments: usize,
}

impl RenderStats {
    pub fn merge(&mut self, other: RenderStats) {
        self.triangles += other.triangles;
        self.clipped += other.clipped;
        self.fragments += other.fragments;
    }
}

pub struct Renderer {
    viewport: Viewport,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            viewport: Viewport::new(width, height),
        }
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// 绘制一个三角形列表网格
    ///
    /// `canvas` 为 `None` 时只写深度。深度缓冲不会被清空，
    /// 多次调用之间由调用方决定何时重置。
    pub fn render(
        &self,
        mesh: &Mesh,
        camera: &Camera,
        shader: &mut dyn Shader,
        depth: &mut [f32],
        mut canvas: Option<&mut [Vec4<f32>]>,
    ) -> RenderResult<RenderStats> {
        self.check_buffers(depth, canvas.as_deref())?;
        check_mesh(mesh)?;

        let mut stats = RenderStats::default();
        // 每个三角形复用的裁剪缓冲
        let mut near_clipped = ClipPolygon::<4>::new();
        let mut far_clipped = ClipPolygon::<5>::new();
        let mut device = [Vec3::zero(); 5];

        for triangle in 0..mesh.triangle_count() {
            stats.triangles += 1;

            // 顶点着色
            let base = triangle * 3;
            let mut vertices = [
                shader.vertex(mesh, base, 0),
                shader.vertex(mesh, base + 1, 1),
                shader.vertex(mesh, base + 2, 2),
            ];
            shader.geometry(&mut vertices);

            // 裁剪
            let polygon = ClipPolygon::from_triangle(vertices);
            near_clip(&polygon, camera.near, &mut near_clipped);
            far_clip(&near_clipped, camera.far, &mut far_clipped);
            if far_clipped.len() < 3 {
                trace!("{} 第 {} 个三角形被完全裁掉", mesh.name, triangle);
                stats.clipped += 1;
                continue;
            }

            // 屏幕映射
            for (slot, vertex) in far_clipped.vertices().iter().enumerate() {
                device[slot] = self.viewport.to_device(*vertex);
            }

            // 光栅化
            stats.fragments += match canvas.as_deref_mut() {
                Some(canvas) => {
                    rasterizer::rasterize(&far_clipped, &device, self.viewport, shader, depth, canvas)
                }
                None => rasterizer::rasterize_depth(&far_clipped, &device, self.viewport, depth),
            };
        }

        debug!(
            "{}: {} 个三角形，裁掉 {}，写入 {} 个片元",
            mesh.name, stats.triangles, stats.clipped, stats.fragments
        );
        Ok(stats)
    }

    fn check_buffers(&self, depth: &[f32], canvas: Option<&[Vec4<f32>]>) -> RenderResult<()> {
        let expected = self.viewport.area();
        if depth.len() != expected {
            return Err(RenderError::DepthBufferSize {
                expected,
                actual: depth.len(),
            });
        }
        if let Some(canvas) = canvas {
            if canvas.len() != expected {
                return Err(RenderError::CanvasSize {
                    expected,
                    actual: canvas.len(),
                });
            }
        }
        Ok(())
    }

    /// 用实例的世界变换设置 uniforms 后绘制
    pub fn render_instance(
        &self,
        instance: &Instance,
        camera: &Camera,
        shader: &mut dyn Shader,
        depth: &mut [f32],
        canvas: Option<&mut [Vec4<f32>]>,
    ) -> RenderResult<RenderStats> {
        *shader.uniforms_mut() = Uniforms::new(instance.transform, camera);
        self.render(instance.mesh, camera, shader, depth, canvas)
    }

    /// 新的一帧：重置深度缓冲，再依次绘制所有实例
    pub fn render_instances(
        &self,
        instances: &[Instance],
        camera: &Camera,
        shader: &mut dyn Shader,
        depth: &mut [f32],
        mut canvas: Option<&mut [Vec4<f32>]>,
    ) -> RenderResult<RenderStats> {
        // 全部检查通过后才动缓冲
        self.check_buffers(depth, canvas.as_deref())?;
        for instance in instances {
            check_mesh(instance.mesh)?;
        }

        depth.fill(FAR_DEPTH);
        let mut total = RenderStats::default();
        for instance in instances {
            let stats = self.render_instance(instance, camera, shader, depth, canvas.as_deref_mut())?;
            total.merge(stats);
        }
        Ok(total)
    }
}

fn check_mesh(mesh: &Mesh) -> RenderResult<()> {
    if mesh.vertex.len() % 3 != 0 {
        return Err(RenderError::InvalidVertexCount(mesh.vertex.len()));
    }
    Ok(())
}
