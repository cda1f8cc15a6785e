use cgmath::{Vector4 as Vec4, Zero};

/// 新一轮渲染时深度缓冲的初值（NDC 远平面）
pub const FAR_DEPTH: f32 = 1.0;

/// 渲染目标：RGBA 颜色（0.0 ~ 1.0）+ 深度，行主序
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub color: Vec<Vec4<f32>>,
    pub depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            color: vec![Vec4::zero(); width * height],
            depth: vec![FAR_DEPTH; width * height],
        }
    }

    pub fn clear(&mut self, color: Vec4<f32>) {
        self.color.fill(color);
        self.clear_depth();
    }

    pub fn clear_depth(&mut self) {
        self.depth.fill(FAR_DEPTH);
    }

    /// 同时可变借用深度和颜色缓冲，供渲染器使用
    pub fn buffers_mut(&mut self) -> (&mut [f32], &mut [Vec4<f32>]) {
        (self.depth.as_mut_slice(), self.color.as_mut_slice())
    }

    pub fn pixel(&self, x: usize, y: usize) -> Vec4<f32> {
        self.color[y * self.width + x]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    pub fn save_to_image(&self, filepath: &str) -> Result<(), image::ImageError> {
        use image::{ImageBuffer, Rgba};

        let mut img = ImageBuffer::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.pixel(x, y);
                let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                img.put_pixel(x as u32, y as u32, Rgba([to_u8(c.x), to_u8(c.y), to_u8(c.z), to_u8(c.w)]));
            }
        }
        img.save(filepath)
    }

    // 将深度缓冲可视化为图片（近→亮，远→暗）
    pub fn save_depth_as_image(&self, filepath: &str) -> Result<(), image::ImageError> {
        use image::{ImageBuffer, Rgba};

        let mut img = ImageBuffer::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                // NDC [-1, 1] 映射到 [0, 1]
                let normalized = ((self.depth_at(x, y) + 1.0) * 0.5).clamp(0.0, 1.0);
                let val = ((1.0 - normalized) * 255.0) as u8;
                img.put_pixel(x as u32, y as u32, Rgba([val, val, val, 255]));
            }
        }
        img.save(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.depth[5] = -0.5;
        fb.clear(Vec4::new(0.0, 0.0, 1.0, 1.0));

        assert_eq!(fb.color.len(), 12);
        assert!(fb.depth.iter().all(|&d| d == FAR_DEPTH));
        assert_eq!(fb.pixel(3, 2), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn pixel_indexing_is_row_major() {
        let mut fb = FrameBuffer::new(4, 3);
        let (depth, color) = fb.buffers_mut();
        depth[2 * 4 + 1] = 0.25;
        color[2 * 4 + 1] = Vec4::new(1.0, 0.0, 0.0, 1.0);

        assert_eq!(fb.depth_at(1, 2), 0.25);
        assert_eq!(fb.pixel(1, 2).x, 1.0);
    }
}
