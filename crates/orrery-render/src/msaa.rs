//! Multisampled color target for antialiased rendering.
//!
//! When antialiasing is on, the scene is drawn into this target and resolved
//! to the swapchain texture at the end of the pass. With a sample count of 1
//! no intermediate texture is allocated and the scene draws straight to the
//! swapchain.

/// A multisampled color texture matching the surface format.
pub struct MsaaColorTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl MsaaColorTarget {
    /// Create a new multisampled color target. `sample_count` must be > 1;
    /// callers should skip the target entirely for single-sampled rendering.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        debug_assert!(sample_count > 1, "MSAA target requires sample_count > 1");

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color-target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
            sample_count,
        }
    }

    /// Resize the target. No-op if dimensions and sample count are unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32, sample_count: u32) {
        if self.width == width && self.height == height && self.sample_count == sample_count {
            return;
        }
        *self = Self::new(device, self.texture.format(), width, height, sample_count);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;

    #[test]
    fn test_msaa_target_has_requested_sample_count() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let target = MsaaColorTarget::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, 800, 600, 4);
        assert_eq!(target.sample_count(), 4);
        assert_eq!(target.texture.sample_count(), 4);
    }

    #[test]
    fn test_resize_keeps_format() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut target =
            MsaaColorTarget::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, 800, 600, 4);
        target.resize(&device, 1024, 768, 4);
        assert_eq!(target.texture.format(), wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(target.width(), 1024);
        assert_eq!(target.height(), 768);
    }
}
