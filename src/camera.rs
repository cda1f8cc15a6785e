use cgmath::{EuclideanSpace, InnerSpace, Matrix4 as Mat4, Point3, Rad, SquareMatrix, Vector3 as Vec3};

/// 透视投影（OpenGL 约定：NDC 的 z 在 [-1, 1]，w = -z_view）
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    near: f32,
    far: f32,
    mat: Mat4<f32>,
}

impl Frustum {
    #[rustfmt::skip]
    pub fn new(near: f32, aspect: f32, far: f32, fovy: Rad<f32>) -> Self {
        let tan_half_fovy = (fovy.0 / 2.0).tan();
        let a = 1.0 / (aspect * tan_half_fovy);
        let b = 1.0 / tan_half_fovy;
        let c = -(far + near) / (far - near);
        let d = -2.0 * far * near / (far - near);

        // 列主序
        let mat = Mat4::new(
            a,    0.0,   0.0,   0.0,
            0.0,  b,     0.0,   0.0,
            0.0,  0.0,   c,    -1.0,
            0.0,  0.0,   d,     0.0,
        );

        Self { near, far, mat }
    }

    pub fn get_mat(&self) -> &Mat4<f32> {
        &self.mat
    }
}

/// 渲染核心只读取 `near`、`far`、`viewing`、`projection` 四项
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3<f32>,
    pub direction: Vec3<f32>,
    pub up: Vec3<f32>,
    pub near: f32,
    pub far: f32,
    pub viewing: Mat4<f32>,
    pub projection: Mat4<f32>,
}

impl Camera {
    /// 位于原点、朝向 -z 的透视相机
    pub fn perspective(fovy: Rad<f32>, aspect: f32, near: f32, far: f32) -> Self {
        let frustum = Frustum::new(near, aspect, far, fovy);
        Self {
            position: Vec3::new(0.0, 0.0, 0.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            near: frustum.near,
            far: frustum.far,
            viewing: Mat4::identity(),
            projection: *frustum.get_mat(),
        }
    }

    pub fn look_at(&mut self, position: Vec3<f32>, target: Vec3<f32>, up: Vec3<f32>) {
        self.position = position;
        self.direction = (target - position).normalize();
        self.up = up.normalize();
        self.viewing = Mat4::look_at_rh(Point3::from_vec(position), Point3::from_vec(target), up);
    }

    pub fn get_view_proj_mat(&self) -> Mat4<f32> {
        self.projection * self.viewing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::{Deg, Vector4 as Vec4};

    #[test]
    fn projection_puts_view_depth_into_w() {
        let camera = Camera::perspective(Deg(90.0).into(), 1.0, 1.0, 10.0);
        let near = camera.projection * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = camera.projection * Vec4::new(0.0, 0.0, -10.0, 1.0);

        assert_abs_diff_eq!(near.w, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(near.z / near.w, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.w, 10.0, epsilon = 1e-6);
        assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_moves_target_onto_negative_z() {
        let mut camera = Camera::perspective(Deg(60.0).into(), 1.0, 0.1, 100.0);
        camera.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

        let origin = camera.viewing * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(origin, Vec4::new(0.0, 0.0, -5.0, 1.0), epsilon = 1e-5);
        assert_abs_diff_eq!(camera.direction, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }
}
