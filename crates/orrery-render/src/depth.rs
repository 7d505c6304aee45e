//! Depth buffer management with reverse-Z for improved precision at scene scale.
//!
//! Uses reverse-Z depth mapping where near plane maps to 1.0 and far plane maps
//! to 0.0. The far plane sits at 8000 units while the clouds hover 0.3 units
//! above the planet surface, so the extra precision matters.

/// Depth buffer with reverse-Z configuration.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl DepthBuffer {
    /// 32-bit float depth format for maximum precision with reverse-Z.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Reverse-Z clear value: 0.0 represents the far plane.
    pub const CLEAR_VALUE: f32 = 0.0;

    /// Reverse-Z depth comparison: closer objects have higher depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    /// Create a new depth buffer. `sample_count` must match the color target
    /// of the pass this depth buffer is attached to.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            format: Self::FORMAT,
            width,
            height,
            sample_count,
        }
    }

    /// Resize the depth buffer to new dimensions.
    /// No-op if dimensions and sample count are unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32, sample_count: u32) {
        if self.width == width && self.height == height && self.sample_count == sample_count {
            return;
        }
        *self = Self::new(device, width, height, sample_count);
    }

    /// Get the current width of the depth buffer.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the current height of the depth buffer.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the sample count of the depth buffer.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;

    #[test]
    fn test_depth_texture_format_is_depth32float() {
        assert_eq!(DepthBuffer::FORMAT, wgpu::TextureFormat::Depth32Float);
    }

    #[test]
    fn test_reverse_z_clear_value_is_zero() {
        // In reverse-Z, the far plane is 0.0, which is the clear value.
        assert_eq!(DepthBuffer::CLEAR_VALUE, 0.0);
    }

    #[test]
    fn test_depth_compare_function_is_greater_equal() {
        // Reverse-Z: closer objects have HIGHER depth values.
        assert_eq!(
            DepthBuffer::COMPARE_FUNCTION,
            wgpu::CompareFunction::GreaterEqual
        );
    }

    #[test]
    fn test_depth_texture_dimensions_match_surface() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let depth = DepthBuffer::new(&device, 1920, 1080, 1);
        assert_eq!(depth.width(), 1920);
        assert_eq!(depth.height(), 1080);
        assert_eq!(depth.sample_count(), 1);
    }

    #[test]
    fn test_resize_updates_dimensions() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut depth = DepthBuffer::new(&device, 800, 600, 1);
        depth.resize(&device, 1920, 1080, 1);
        assert_eq!(depth.width(), 1920);
        assert_eq!(depth.height(), 1080);
    }

    #[test]
    fn test_resize_recreates_on_sample_count_change() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut depth = DepthBuffer::new(&device, 800, 600, 1);
        depth.resize(&device, 800, 600, 4);
        assert_eq!(depth.sample_count(), 4);
        assert_eq!(depth.texture.sample_count(), 4);
    }

    #[test]
    fn test_resize_noop_when_same_dimensions() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut depth = DepthBuffer::new(&device, 800, 600, 1);
        depth.resize(&device, 800, 600, 1);
        assert_eq!(depth.width(), 800);
        assert_eq!(depth.height(), 600);
    }
}
