use approx::assert_abs_diff_eq;
use cgmath::{Deg, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4, Zero};

use rs_rasterizer::renderer::fragment_shader::{LambertShader, Light};
use rs_rasterizer::{Camera, FAR_DEPTH, FrameBuffer, Instance, Mesh, Renderer, Shader, Uniforms, Viewport};

const SIZE: usize = 8;

fn camera() -> Camera {
    Camera::perspective(Deg(90.0).into(), 1.0, 0.1, 100.0)
}

/// 只输出顶点颜色的 Lambert 着色器
fn flat_shader() -> LambertShader {
    LambertShader::new(Light {
        intensity: 0.0,
        ambient_strength: 1.0,
        ambient_color: Vec3::new(1.0, 1.0, 1.0),
        ..Light::default()
    })
}

fn triangle_at(depth: f32, color: Vec3<f32>) -> Mesh {
    // 不同深度的三角形投影到相同的屏幕区域
    let s = -depth / 2.0;
    let mut mesh = Mesh::new("tri");
    mesh.push_triangle(
        [
            Vec3::new(-s, -s, depth),
            Vec3::new(s, -s, depth),
            Vec3::new(0.0, s, depth),
        ],
        color,
    );
    mesh
}

fn render_frame(instances: &[Instance], camera: &Camera, shader: &mut dyn Shader) -> FrameBuffer {
    let renderer = Renderer::new(SIZE, SIZE);
    let mut fb = FrameBuffer::new(SIZE, SIZE);
    let (depth, color) = fb.buffers_mut();
    renderer
        .render_instances(instances, camera, shader, depth, Some(color))
        .unwrap();
    fb
}

#[test]
fn cube_render_is_deterministic() {
    let cube = Mesh::cube(1.0, Vec3::new(0.2, 0.6, 0.9));
    let instances = [Instance::from_components(
        &cube,
        Vec3::zero(),
        Vec3::new(0.0, 30.0, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
    )];
    let mut camera = camera();
    camera.look_at(Vec3::new(2.0, 1.5, 2.0), Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));

    let first = render_frame(&instances, &camera, &mut LambertShader::default());
    let second = render_frame(&instances, &camera, &mut LambertShader::default());

    assert_eq!(first, second);
    assert!(first.depth_at(SIZE / 2, SIZE / 2) < FAR_DEPTH);
    assert!(!first.pixel(SIZE / 2, SIZE / 2).is_zero());
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    let red = Vec3::new(1.0, 0.0, 0.0);
    let green = Vec3::new(0.0, 1.0, 0.0);
    let near = triangle_at(-2.0, red);
    let far = triangle_at(-3.0, green);
    let camera = camera();

    let near_first = render_frame(
        &[Instance::new(&near), Instance::new(&far)],
        &camera,
        &mut flat_shader(),
    );
    let far_first = render_frame(
        &[Instance::new(&far), Instance::new(&near)],
        &camera,
        &mut flat_shader(),
    );

    assert_eq!(near_first.depth, far_first.depth);
    assert_abs_diff_eq!(near_first.pixel(4, 4), red.extend(1.0), epsilon = 1e-6);
    assert_abs_diff_eq!(far_first.pixel(4, 4), red.extend(1.0), epsilon = 1e-6);
}

#[test]
fn rendering_twice_into_one_buffer_matches_a_fresh_frame() {
    let mesh = triangle_at(-2.0, Vec3::new(0.5, 0.5, 0.5));
    let instances = [Instance::new(&mesh)];
    let camera = camera();
    let renderer = Renderer::new(SIZE, SIZE);
    let mut shader = flat_shader();

    let mut fb = FrameBuffer::new(SIZE, SIZE);
    for _ in 0..2 {
        let (depth, color) = fb.buffers_mut();
        renderer
            .render_instances(&instances, &camera, &mut shader, depth, Some(color))
            .unwrap();
    }

    assert_eq!(fb, render_frame(&instances, &camera, &mut flat_shader()));
}

/// 固定输出裁剪空间坐标，并记录片元阶段收到的重心坐标
struct RecordingShader {
    uniforms: Uniforms,
    positions: [Vec4<f32>; 3],
    fragments: Vec<(Vec3<f32>, Vec2<f32>)>,
}

impl Shader for RecordingShader {
    fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    fn vertex(&mut self, _mesh: &Mesh, _index: usize, slot: usize) -> Vec4<f32> {
        self.positions[slot]
    }

    fn fragment(&mut self, barycenter: Vec3<f32>, screen: Vec2<f32>, color: &mut Vec4<f32>) {
        self.fragments.push((barycenter, screen));
        *color = Vec4::new(1.0, 1.0, 1.0, 1.0);
    }
}

#[test]
fn triangle_crossing_near_plane_keeps_valid_barycenters() {
    let camera = Camera::perspective(Deg(90.0).into(), 1.0, 1.0, 100.0);
    let mut shader = RecordingShader {
        uniforms: Uniforms::default(),
        positions: [
            Vec4::new(0.0, 0.0, 0.0, 0.5),
            Vec4::new(1.5, -1.0, 0.0, 2.0),
            Vec4::new(-1.5, -1.0, 0.0, 2.0),
        ],
        fragments: Vec::new(),
    };
    let mesh = triangle_at(-2.0, Vec3::new(1.0, 1.0, 1.0));
    let mut fb = FrameBuffer::new(SIZE, SIZE);
    let (depth, color) = fb.buffers_mut();

    let stats = Renderer::new(SIZE, SIZE)
        .render(&mesh, &camera, &mut shader, depth, Some(color))
        .unwrap();

    assert_eq!(stats.clipped, 0);
    assert!(stats.fragments > 0);
    assert_eq!(stats.fragments, shader.fragments.len());
    for (b, _) in &shader.fragments {
        assert_abs_diff_eq!(b.x + b.y + b.z, 1.0, epsilon = 1e-5);
        for component in [b.x, b.y, b.z] {
            assert!((-1e-5..=1.0 + 1e-5).contains(&component), "{:?}", b);
        }
        // 近平面上的交点只带走第一个顶点 2/3 的权重
        assert!(b.x <= 2.0 / 3.0 + 1e-4, "{:?}", b);
    }
}

#[test]
fn recovered_barycenter_projects_onto_pixel_center() {
    // 0 号顶点在近平面前，2 号顶点在远平面后，裁剪后是五边形
    let positions = [
        Vec4::new(0.0, 1.0, 0.0, 0.5),
        Vec4::new(6.0, -4.0, 0.0, 8.0),
        Vec4::new(-12.0, -8.0, 0.0, 16.0),
    ];
    let camera = Camera::perspective(Deg(90.0).into(), 1.0, 1.0, 10.0);
    let mut shader = RecordingShader {
        uniforms: Uniforms::default(),
        positions,
        fragments: Vec::new(),
    };
    let size = 32;
    let mesh = triangle_at(-2.0, Vec3::new(1.0, 1.0, 1.0));
    let mut fb = FrameBuffer::new(size, size);
    let (depth, color) = fb.buffers_mut();

    let stats = Renderer::new(size, size)
        .render(&mesh, &camera, &mut shader, depth, Some(color))
        .unwrap();
    assert_eq!(stats.clipped, 0);
    assert!(stats.fragments > 0);

    let viewport = Viewport::new(size, size);
    for (b, screen) in &shader.fragments {
        let clip = positions[0] * b.x + positions[1] * b.y + positions[2] * b.z;
        // 裁剪空间中的点必须在两个平面之间
        assert!(clip.w > 1.0 - 1e-4 && clip.w < 10.0 + 1e-4, "{:?}", clip);
        let device = viewport.to_device(clip);
        assert_abs_diff_eq!(device.x, screen.x * size as f32, epsilon = 1e-3);
        assert_abs_diff_eq!(device.y, screen.y * size as f32, epsilon = 1e-3);
    }
}
