use cgmath::{Vector3 as Vec3, Vector4 as Vec4, Zero};

/// 原始三角形三个角的重心坐标
pub const IDENTITY_BARYCENTERS: [Vec3<f32>; 3] = [
    Vec3 { x: 1.0, y: 0.0, z: 0.0 },
    Vec3 { x: 0.0, y: 1.0, z: 0.0 },
    Vec3 { x: 0.0, y: 0.0, z: 1.0 },
];

/// 裁剪空间中的多边形（定长存储）
///
/// 每个顶点带一个齐次坐标和一个相对于*原始*三角形的重心坐标。
/// 三角形经过近平面裁剪最多变成 4 个顶点，再经过远平面裁剪最多 5 个，
/// 所以容量在编译期就确定，逐三角形处理时不需要堆分配。
#[derive(Debug, Clone, Copy)]
pub struct ClipPolygon<const N: usize> {
    vertices: [Vec4<f32>; N],
    barycenters: [Vec3<f32>; N],
    len: usize,
}

impl<const N: usize> ClipPolygon<N> {
    pub fn new() -> Self {
        Self {
            vertices: [Vec4::zero(); N],
            barycenters: [Vec3::zero(); N],
            len: 0,
        }
    }

    /// 追加一个顶点及其重心坐标，超出容量属于调用方错误
    pub fn push(&mut self, vertex: Vec4<f32>, barycenter: Vec3<f32>) {
        assert!(self.len < N, "裁剪多边形容量已满 ({})", N);
        self.vertices[self.len] = vertex;
        self.barycenters[self.len] = barycenter;
        self.len += 1;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn vertex(&self, i: usize) -> Vec4<f32> {
        self.vertices()[i]
    }

    pub fn barycenter(&self, i: usize) -> Vec3<f32> {
        self.barycenters()[i]
    }

    pub fn vertices(&self) -> &[Vec4<f32>] {
        &self.vertices[..self.len]
    }

    pub fn barycenters(&self) -> &[Vec3<f32>] {
        &self.barycenters[..self.len]
    }
}

impl ClipPolygon<3> {
    /// 由顶点着色器输出的三个裁剪空间顶点构造，重心坐标为单位基
    pub fn from_triangle(vertices: [Vec4<f32>; 3]) -> Self {
        Self {
            vertices,
            barycenters: IDENTITY_BARYCENTERS,
            len: 3,
        }
    }
}

impl<const N: usize> Default for ClipPolygon<N> {
    fn default() -> Self {
        Self::new()
    }
}
