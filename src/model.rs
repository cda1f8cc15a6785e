use cgmath::{Deg, InnerSpace, Matrix4 as Mat4, SquareMatrix, Vector3 as Vec3, Zero};
use log::warn;
use obj::Obj;
use std::path::Path;

/// 扁平的三角形列表网格，第 i 个三角形由顶点 3i、3i+1、3i+2 组成
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub vertex: Vec<Vec3<f32>>,
    pub normal: Vec<Vec3<f32>>,
    pub color: Vec<Vec3<f32>>,
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex.len() / 3
    }

    /// 追加一个三角形，法线取面法线
    pub fn push_triangle(&mut self, positions: [Vec3<f32>; 3], color: Vec3<f32>) {
        let normal = face_normal(&positions);
        for pos in positions {
            self.vertex.push(pos);
            self.normal.push(normal);
            self.color.push(color);
        }
    }

    /// 以原点为中心的立方体，面朝外（逆时针）
    pub fn cube(size: f32, color: Vec3<f32>) -> Self {
        let h = size / 2.0;
        let corners = [
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        // 每个面的四个角，逆时针
        let faces = [
            [4, 5, 6, 7], // +z
            [1, 0, 3, 2], // -z
            [5, 1, 2, 6], // +x
            [0, 4, 7, 3], // -x
            [7, 6, 2, 3], // +y
            [0, 1, 5, 4], // -y
        ];

        let mut mesh = Mesh::new("cube");
        for [a, b, c, d] in faces {
            mesh.push_triangle([corners[a], corners[b], corners[c]], color);
            mesh.push_triangle([corners[c], corners[d], corners[a]], color);
        }
        mesh
    }

    /// y = 0 平面上的棋盘格地板
    pub fn floor(size: f32, cell_count: usize) -> Self {
        let half_size = size / 2.0;
        let cell_size = size / cell_count as f32;
        let color1 = Vec3::new(0.5, 0.5, 0.5);
        let color2 = Vec3::new(0.3, 0.3, 0.3);

        let mut mesh = Mesh::new("floor");
        for z_idx in 0..cell_count {
            for x_idx in 0..cell_count {
                let x0 = -half_size + x_idx as f32 * cell_size;
                let x1 = x0 + cell_size;
                let z0 = -half_size + z_idx as f32 * cell_size;
                let z1 = z0 + cell_size;
                let color = if (x_idx + z_idx) % 2 == 0 { color1 } else { color2 };

                let v0 = Vec3::new(x0, 0.0, z0);
                let v1 = Vec3::new(x1, 0.0, z0);
                let v2 = Vec3::new(x1, 0.0, z1);
                let v3 = Vec3::new(x0, 0.0, z1);
                mesh.push_triangle([v0, v2, v1], color);
                mesh.push_triangle([v2, v0, v3], color);
            }
        }
        mesh
    }
}

fn face_normal(positions: &[Vec3<f32>; 3]) -> Vec3<f32> {
    let normal = (positions[1] - positions[0]).cross(positions[2] - positions[0]);
    if normal.is_zero() { normal } else { normal.normalize() }
}

/// 网格的一次摆放：世界变换 + 网格引用
#[derive(Debug, Clone, Copy)]
pub struct Instance<'a> {
    pub mesh: &'a Mesh,
    pub transform: Mat4<f32>,
}

impl<'a> Instance<'a> {
    pub fn new(mesh: &'a Mesh) -> Self {
        Self {
            mesh,
            transform: Mat4::identity(),
        }
    }

    /// 变换顺序：缩放 → 绕 z、y、x 旋转（角度制）→ 平移
    pub fn from_components(
        mesh: &'a Mesh,
        position: Vec3<f32>,
        angle: Vec3<f32>,
        scale: Vec3<f32>,
    ) -> Self {
        let rotation = Mat4::from_angle_x(Deg(angle.x))
            * Mat4::from_angle_y(Deg(angle.y))
            * Mat4::from_angle_z(Deg(angle.z));
        let transform = Mat4::from_translation(position)
            * rotation
            * Mat4::from_nonuniform_scale(scale.x, scale.y, scale.z);
        Self { mesh, transform }
    }
}

/// 读取 OBJ 文件，多边形按扇形拆成三角形
///
/// 文件没有法线时用相邻面法线的平均值
pub fn load_obj(path: &Path) -> Result<Mesh, obj::ObjError> {
    let obj = Obj::load(path)?;
    let data = &obj.data;

    let positions: Vec<Vec3<f32>> = data.position.iter().map(|p| Vec3::new(p[0], p[1], p[2])).collect();

    // 先把所有面拆成三角形的索引
    let mut corners = Vec::new();
    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                if poly.0.len() < 3 {
                    warn!("{}: 跳过只有 {} 个顶点的面", path.display(), poly.0.len());
                    continue;
                }
                for i in 2..poly.0.len() {
                    corners.push(poly.0[0]);
                    corners.push(poly.0[i - 1]);
                    corners.push(poly.0[i]);
                }
            }
        }
    }

    // 计算每个顶点的法线（平均相邻面的法线）
    let mut averaged = vec![Vec3::zero(); positions.len()];
    for tri in corners.chunks_exact(3) {
        let normal = face_normal(&[positions[tri[0].0], positions[tri[1].0], positions[tri[2].0]]);
        for idx in tri {
            averaged[idx.0] += normal;
        }
    }
    for n in averaged.iter_mut() {
        if !n.is_zero() {
            *n = n.normalize();
        }
    }

    let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let mut mesh = Mesh::new(&name);
    for idx in &corners {
        mesh.vertex.push(positions[idx.0]);
        mesh.normal.push(match idx.2 {
            Some(n) => Vec3::new(data.normal[n][0], data.normal[n][1], data.normal[n][2]),
            None => averaged[idx.0],
        });
        mesh.color.push(Vec3::new(0.8, 0.8, 0.8));
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::Transform;
    use cgmath::Point3;

    #[test]
    fn cube_faces_point_outward() {
        let mesh = Mesh::cube(2.0, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex.len(), mesh.normal.len());

        for tri in 0..mesh.triangle_count() {
            let center = (mesh.vertex[tri * 3] + mesh.vertex[tri * 3 + 1] + mesh.vertex[tri * 3 + 2]) / 3.0;
            assert!(center.dot(mesh.normal[tri * 3]) > 0.0, "第 {} 个三角形法线朝内", tri);
        }
    }

    #[test]
    fn floor_faces_up() {
        let mesh = Mesh::floor(4.0, 2);
        assert_eq!(mesh.triangle_count(), 8);
        for n in &mesh.normal {
            assert_abs_diff_eq!(*n, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn instance_transform_scales_rotates_then_translates() {
        let mesh = Mesh::new("empty");
        let instance = Instance::from_components(
            &mesh,
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 90.0, 0.0),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let p = instance.transform.transform_point(Point3::new(1.0, 0.0, 0.0));
        // x 轴缩放到 2，绕 y 转 90° 到 -z，再平移
        assert_abs_diff_eq!(p, Point3::new(0.0, 0.0, -7.0), epsilon = 1e-5);
    }

    #[test]
    fn load_missing_obj_is_an_error() {
        assert!(load_obj(Path::new("no/such/model.obj")).is_err());
    }
}
