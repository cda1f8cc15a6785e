use cgmath::{Deg, Vector3 as Vec3, Vector4 as Vec4};
use log::info;
use serde_json::from_reader;
use std::{error::Error, fs::File, path::Path};

use rs_rasterizer::{
    Camera, FrameBuffer, Instance, Mesh, Renderer, Shader,
    model::load_obj,
    renderer::fragment_shader::{LambertShader, Light, NormalShader},
};

use crate::json_struct::{CameraConfig, JsonConfig, LightConfig, ModelConfig, ShaderKind};

pub fn parse_json(path: &Path) -> Result<JsonConfig, Box<dyn Error>> {
    let file = File::open(path)?;
    let config: JsonConfig = from_reader(file)?;
    info!("成功读取场景 {}", path.display());
    Ok(config)
}

pub fn run_json() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err("参数不足！使用方式: rs-rasterizer <json路径>".into());
    }
    let config = parse_json(Path::new(&args[1]))?;
    if config.width == 0 || config.height == 0 {
        return Err("画面宽高必须大于 0".into());
    }

    let camera = set_camera(&config.camera, config.width as f32 / config.height as f32);
    let renderer = Renderer::new(config.width, config.height);
    let mut framebuffer = FrameBuffer::new(config.width, config.height);
    framebuffer.clear(Vec4::new(0.1, 0.1, 0.15, 1.0));

    let meshes = config
        .models
        .iter()
        .map(load_mesh)
        .collect::<Result<Vec<_>, _>>()?;
    let instances: Vec<Instance> = meshes
        .iter()
        .zip(&config.models)
        .map(|(mesh, model)| {
            Instance::from_components(mesh, model.position.into(), model.angle.into(), model.scale.into())
        })
        .collect();

    let mut shader: Box<dyn Shader> = match config.shader {
        ShaderKind::Lambert => Box::new(LambertShader::new(set_light(config.light.as_ref()))),
        ShaderKind::Normal => Box::new(NormalShader::default()),
    };

    info!("开始渲染 {} 个模型（{}x{}）", instances.len(), config.width, config.height);
    let (depth, color) = framebuffer.buffers_mut();
    let stats = renderer.render_instances(&instances, &camera, shader.as_mut(), depth, Some(color))?;
    info!(
        "渲染完成：{} 个三角形，裁掉 {}，{} 个片元",
        stats.triangles, stats.clipped, stats.fragments
    );

    framebuffer.save_to_image(&config.output)?;
    info!("已保存 {}", config.output);
    if let Some(depth_output) = &config.depth_output {
        framebuffer.save_depth_as_image(depth_output)?;
        info!("已保存深度图 {}", depth_output);
    }
    Ok(())
}

fn load_mesh(config: &ModelConfig) -> Result<Mesh, Box<dyn Error>> {
    let color = Vec3::from(config.color);
    match &config.path {
        Some(path) => {
            let mut mesh = load_obj(Path::new(path))?;
            mesh.color.fill(color);
            info!("成功读取模型 {}（{} 个三角形）", path, mesh.triangle_count());
            Ok(mesh)
        }
        None => {
            info!("未指定模型路径，使用内置立方体");
            Ok(Mesh::cube(1.0, color))
        }
    }
}

pub fn set_camera(config: &CameraConfig, aspect: f32) -> Camera {
    let mut camera = Camera::perspective(Deg(config.fov).into(), aspect, config.near, config.far);
    camera.look_at(config.position.into(), config.target.into(), config.up.into());
    camera
}

pub fn set_light(config: Option<&LightConfig>) -> Light {
    let mut light = Light::default();
    if let Some(config) = config {
        light.set_light(config.color, config.direction);
        light.ambient_strength = config.ambient;
    }
    light
}
