//! 扫描线光栅化
//!
//! 裁剪后的凸多边形以 0 号顶点为中心拆成扇形三角形 (0, i-1, i)，
//! 逐行求出左右边界后在像素中心 (x+0.5, y+0.5) 采样。
//! 两个入口（着色 / 只写深度）共用 [`scan_triangle`]。

use cgmath::{InnerSpace, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4};
use std::ops::Range;

use crate::renderer::Viewport;
use crate::renderer::shader::Shader;
use crate::vertex::ClipPolygon;

/// 重心坐标覆盖判断和深度比较共用的容差
pub const EPSILON: f64 = 1e-6;

/// 扇形三角形 (a, b, c) 在屏幕空间的边向量基
///
/// 求解 p - a = u * (c - a) + v * (b - a)，
/// 于是 a、b、c 的权重分别为 (1-u-v, v, u)。
#[derive(Debug, Clone, Copy)]
pub struct EdgeBasis {
    origin: Vec2<f64>,
    v0: Vec2<f64>,
    v1: Vec2<f64>,
    dot00: f64,
    dot01: f64,
    dot11: f64,
    inverse: f64,
}

impl EdgeBasis {
    pub fn new(a: Vec3<f32>, b: Vec3<f32>, c: Vec3<f32>) -> Self {
        let origin = Vec2::new(a.x as f64, a.y as f64);
        let v0 = Vec2::new(c.x as f64, c.y as f64) - origin;
        let v1 = Vec2::new(b.x as f64, b.y as f64) - origin;
        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot11 = v1.dot(v1);
        Self {
            origin,
            v0,
            v1,
            dot00,
            dot01,
            dot11,
            // 退化三角形得到 inf，之后的 u/v 全部是 inf 或 NaN
            inverse: 1.0 / (dot00 * dot11 - dot01 * dot01),
        }
    }

    pub fn solve(&self, x: f64, y: f64) -> (f64, f64) {
        let v2 = Vec2::new(x, y) - self.origin;
        let dot02 = self.v0.dot(v2);
        let dot12 = self.v1.dot(v2);
        let u = (self.dot11 * dot02 - self.dot01 * dot12) * self.inverse;
        let v = (self.dot00 * dot12 - self.dot01 * dot02) * self.inverse;
        (u, v)
    }

    /// 写成正向比较，NaN 一律不覆盖
    pub fn covers(u: f64, v: f64) -> bool {
        u >= -EPSILON && v >= -EPSILON && u + v <= 1.0 + EPSILON
    }
}

/// 浮点边界转成 [0, limit) 内的像素下标区间
fn pixel_span(start: f32, end: f32, limit: usize) -> Range<usize> {
    let start = start.max(0.0) as usize;
    let end = end.min(limit as f32).max(0.0) as usize;
    start..end
}

/// 在 y 处沿边 p→q 线性插值出 x
fn edge_x(p: Vec3<f32>, q: Vec3<f32>, inverse: f32, y: f32) -> f32 {
    (p.x * (q.y - y) + q.x * (y - p.y)) * inverse
}

/// 遍历三角形覆盖的像素，对每个像素回调 (x, y, u, v)
fn scan_triangle<F>(a: Vec3<f32>, b: Vec3<f32>, c: Vec3<f32>, viewport: Viewport, mut visit: F)
where
    F: FnMut(usize, usize, f64, f64),
{
    let basis = EdgeBasis::new(a, b, c);

    // 按 y 排序：lower <= median <= upper
    let mut lower = a;
    let mut median = b;
    let mut upper = c;
    if lower.y > median.y {
        std::mem::swap(&mut lower, &mut median);
    }
    if median.y > upper.y {
        std::mem::swap(&mut median, &mut upper);
    }
    if lower.y > median.y {
        std::mem::swap(&mut lower, &mut median);
    }

    let inverse_ml = 1.0 / (median.y - lower.y);
    let inverse_um = 1.0 / (upper.y - median.y);
    let inverse_ul = 1.0 / (upper.y - lower.y);

    let rows = pixel_span((lower.y - 0.5).ceil(), (upper.y - 0.5).ceil(), viewport.height);
    for row in rows {
        let y = row as f32 + 0.5;
        // 中位点之前走 lower→median，之后走 median→upper
        let mut left = if y < median.y {
            edge_x(lower, median, inverse_ml, y)
        } else {
            edge_x(median, upper, inverse_um, y)
        };
        let mut right = edge_x(lower, upper, inverse_ul, y);
        if left > right {
            std::mem::swap(&mut left, &mut right);
        }

        let columns = pixel_span((left - 0.5).ceil(), (right - 0.5).floor() + 1.0, viewport.width);
        for column in columns {
            let (u, v) = basis.solve(column as f64 + 0.5, y as f64);
            if EdgeBasis::covers(u, v) {
                visit(column, row, u, v);
            }
        }
    }
}

fn interpolate_depth(a: Vec3<f32>, b: Vec3<f32>, c: Vec3<f32>, u: f64, v: f64) -> f64 {
    a.z as f64 * (1.0 - u - v) + b.z as f64 * v + c.z as f64 * u
}

/// NDC 范围内且不比已有深度更远
fn depth_test(z: f64, stored: f32) -> bool {
    z > -1.0 && z < 1.0 && z < stored as f64 + EPSILON
}

/// 由扇形三角形的屏幕空间权重恢复原始三角形的透视校正重心坐标
///
/// `fixed` 是扇形三个顶点各自的重心坐标，`inverse_w` 是它们裁剪空间 w 的倒数。
pub fn perspective_barycenter(fixed: [Vec3<f32>; 3], inverse_w: Vec3<f32>, u: f64, v: f64) -> Vec3<f32> {
    let weights = Vec3::new(
        (1.0 - u - v) as f32 * inverse_w.x,
        v as f32 * inverse_w.y,
        u as f32 * inverse_w.z,
    );
    let weights = weights / (weights.x + weights.y + weights.z);
    fixed[0] * weights.x + fixed[1] * weights.y + fixed[2] * weights.z
}

/// 着色光栅化，返回通过深度测试的次数
///
/// 中心恰好落在扇形共享边上的像素会被两个三角形各写一次，计数也算两次。
///
/// `device` 是 `polygon` 每个顶点经过透视除法和视口变换后的坐标；
/// `depth` 与 `canvas` 的长度必须等于视口面积。
pub fn rasterize<const N: usize>(
    polygon: &ClipPolygon<N>,
    device: &[Vec3<f32>],
    viewport: Viewport,
    shader: &mut dyn Shader,
    depth: &mut [f32],
    canvas: &mut [Vec4<f32>],
) -> usize {
    let vertices = polygon.vertices();
    let barycenters = polygon.barycenters();
    let (width, height) = (viewport.width as f32, viewport.height as f32);
    let mut written = 0;

    for i in 2..polygon.len() {
        let (a, b, c) = (device[0], device[i - 1], device[i]);
        let fixed = [barycenters[0], barycenters[i - 1], barycenters[i]];
        let inverse_w = Vec3::new(1.0 / vertices[0].w, 1.0 / vertices[i - 1].w, 1.0 / vertices[i].w);

        scan_triangle(a, b, c, viewport, |x, y, u, v| {
            let z = interpolate_depth(a, b, c, u, v);
            let location = x + y * viewport.width;
            if !depth_test(z, depth[location]) {
                return;
            }
            depth[location] = z as f32;

            let barycenter = perspective_barycenter(fixed, inverse_w, u, v);
            let screen = Vec2::new((x as f32 + 0.5) / width, (y as f32 + 0.5) / height);
            shader.fragment(barycenter, screen, &mut canvas[location]);
            written += 1;
        });
    }
    written
}

/// 只写深度的光栅化（阴影、遮挡预通道），返回通过深度测试的次数
pub fn rasterize_depth<const N: usize>(
    polygon: &ClipPolygon<N>,
    device: &[Vec3<f32>],
    viewport: Viewport,
    depth: &mut [f32],
) -> usize {
    let mut written = 0;
    for i in 2..polygon.len() {
        let (a, b, c) = (device[0], device[i - 1], device[i]);
        scan_triangle(a, b, c, viewport, |x, y, u, v| {
            let z = interpolate_depth(a, b, c, u, v);
            let location = x + y * viewport.width;
            if depth_test(z, depth[location]) {
                depth[location] = z as f32;
                written += 1;
            }
        });
    }
    written
}
