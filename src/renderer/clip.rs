use cgmath::{Vector3 as Vec3, Vector4 as Vec4};

use crate::vertex::ClipPolygon;

/// 齐次裁剪空间中以 w 阈值定义的裁剪平面
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipPlane {
    /// w > d 的一侧为内侧
    Near(f32),
    /// w < d 的一侧为内侧
    Far(f32),
}

impl ClipPlane {
    pub fn has_inside(self, w: f32) -> bool {
        match self {
            ClipPlane::Near(d) => w > d,
            ClipPlane::Far(d) => w < d,
        }
    }

    fn distance(self, w: f32) -> f32 {
        match self {
            ClipPlane::Near(d) | ClipPlane::Far(d) => (w - d).abs(),
        }
    }

    /// 边与平面的交点，位置和重心坐标按到平面的距离加权
    fn intersect(
        self,
        (v1, b1): (Vec4<f32>, Vec3<f32>),
        (v2, b2): (Vec4<f32>, Vec3<f32>),
    ) -> (Vec4<f32>, Vec3<f32>) {
        let weight1 = self.distance(v1.w);
        let weight2 = self.distance(v2.w);
        let inverse = 1.0 / (weight1 + weight2);
        (
            (v1 * weight2 + v2 * weight1) * inverse,
            (b1 * weight2 + b2 * weight1) * inverse,
        )
    }

    /// 用该平面裁剪 `input`，结果写入 `output`（先清空）
    ///
    /// 边按 (v[n-1], v[0]), (v[0], v[1]), ... 的顺序遍历，
    /// 所以完全在内侧的多边形原样输出。恰好落在平面上的顶点视为外侧。
    pub fn clip<const I: usize, const O: usize>(
        self,
        input: &ClipPolygon<I>,
        output: &mut ClipPolygon<O>,
    ) {
        output.clear();
        let n = input.len();
        for i in 0..n {
            let prev = (i + n - 1) % n;
            let first = (input.vertex(prev), input.barycenter(prev));
            let second = (input.vertex(i), input.barycenter(i));

            match (self.has_inside(first.0.w), self.has_inside(second.0.w)) {
                // 都在外侧
                (false, false) => {}
                // 都在内侧
                (true, true) => output.push(second.0, second.1),
                // 从内到外
                (true, false) => {
                    let (v, b) = self.intersect(first, second);
                    output.push(v, b);
                }
                // 从外到内
                (false, true) => {
                    let (v, b) = self.intersect(first, second);
                    output.push(v, b);
                    output.push(second.0, second.1);
                }
            }
        }
    }
}

/// 近平面裁剪（w > near 为可见）
pub fn near_clip<const I: usize, const O: usize>(
    input: &ClipPolygon<I>,
    near: f32,
    output: &mut ClipPolygon<O>,
) {
    ClipPlane::Near(near).clip(input, output);
}

/// 远平面裁剪（w < far 为可见）
pub fn far_clip<const I: usize, const O: usize>(
    input: &ClipPolygon<I>,
    far: f32,
    output: &mut ClipPolygon<O>,
) {
    ClipPlane::Far(far).clip(input, output);
}
