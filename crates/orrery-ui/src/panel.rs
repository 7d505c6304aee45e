//! The tweak panel: one collapsible section per scene entity.
//!
//! The panel only mutates the [`Scene`]; the app layer watches the scene
//! afterwards for quality-guard hits, antialias flips and shadow map
//! resizes and reacts to those.

use egui::{CollapsingHeader, ComboBox, DragValue, Slider};
use orrery_scene::{QualitySetting, Scene};

/// Panel state that is not part of the scene itself.
pub struct TweakPanel {
    /// Smoothed frames per second, shown in the header when set.
    pub fps: Option<f32>,
    /// Last value picked in the global quality selector.
    global_quality: QualitySetting,
}

impl TweakPanel {
    pub fn new() -> Self {
        Self {
            fps: None,
            global_quality: QualitySetting::Default,
        }
    }

    /// Draw the panel and apply edits to `scene`.
    pub fn show(&mut self, ctx: &egui::Context, scene: &mut Scene) {
        egui::Window::new("Controls")
            .default_width(280.0)
            .resizable(false)
            .show(ctx, |ui| {
                self.global_section(ui, scene);
                self.renderer_section(ui, scene);
                self.camera_section(ui, scene);
                self.skymap_section(ui, scene);
                self.sun_section(ui, scene);
                self.earth_section(ui, scene);
                self.cloud_section(ui, scene);
                self.moon_section(ui, scene);
                self.shadow_section(ui, scene);
                self.orbit_section(ui, scene);
            });
    }

    fn global_section(&mut self, ui: &mut egui::Ui, scene: &mut Scene) {
        if let Some(fps) = self.fps {
            ui.label(format!("{fps:.0} fps"));
        }
        ui.horizontal(|ui| {
            if ui.button("RESET ALL").clicked() {
                scene.reset_all();
                self.global_quality = QualitySetting::Default;
            }
            let before = self.global_quality;
            quality_selector(ui, "img def all", &mut self.global_quality);
            if self.global_quality != before {
                scene.set_global_quality(self.global_quality);
            }
        });
        ui.separator();
    }

    fn renderer_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Renderer").show(ui, |ui| {
            ui.checkbox(&mut scene.renderer.antialias, "antialias");
            if ui.button("reset").clicked() {
                scene.renderer.reset();
            }
        });
    }

    fn camera_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Camera").show(ui, |ui| {
            ui.add(Slider::new(&mut scene.camera.fov_y_degrees, 20.0..=120.0).text("fov"));
            ui.add(Slider::new(&mut scene.camera.near, 0.1..=5.0).text("near"));
            ui.add(Slider::new(&mut scene.camera.far, 100.0..=10_000.0).text("far"));
            vec3_row(ui, "position", &mut scene.camera.position);
            if ui.button("reset").clicked() {
                scene.camera.reset();
            }
        });
    }

    fn skymap_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Skymap").show(ui, |ui| {
            quality_selector(ui, "img def", &mut scene.skymap.quality);
            if ui.button("reset").clicked() {
                scene.skymap.reset();
            }
        });
    }

    fn sun_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Sun").show(ui, |ui| {
            ui.checkbox(&mut scene.sun.visible, "visible");
            CollapsingHeader::new("Light").show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut scene.sun.color);
                    ui.label("color");
                });
                ui.add(Slider::new(&mut scene.sun.intensity, 0.0..=5.0).text("intensity"));
            });
            CollapsingHeader::new("Position").show(ui, |ui| {
                vec3_row(ui, "position", &mut scene.sun.position);
            });
            CollapsingHeader::new("Lens flares").show(ui, |ui| {
                ui.checkbox(&mut scene.sun.flares_enabled, "enabled");
                for (i, element) in scene.sun.flare_elements.iter_mut().enumerate() {
                    CollapsingHeader::new(format!("flare {i}")).show(ui, |ui| {
                        ui.add(Slider::new(&mut element.size, 0.0..=1500.0).text("size"));
                        ui.add(Slider::new(&mut element.opacity, 0.0..=1.0).text("opacity"));
                        ui.add(Slider::new(&mut element.distance, 0.0..=1.0).text("distance"));
                    });
                }
            });
            quality_selector(ui, "img def", &mut scene.sun.quality);
            if ui.button("reset").clicked() {
                scene.sun.reset();
            }
        });
    }

    fn earth_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Earth").show(ui, |ui| {
            ui.checkbox(&mut scene.earth.visible, "visible");
            CollapsingHeader::new("Material").show(ui, |ui| {
                ui.checkbox(&mut scene.earth.wireframe, "wireframe");
                ui.add(Slider::new(&mut scene.earth.bump_scale, 0.0..=2.0).text("bump scale"));
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut scene.earth.specular_color);
                    ui.label("specular");
                });
                ui.add(Slider::new(&mut scene.earth.shininess, 0.0..=100.0).text("shininess"));
            });
            CollapsingHeader::new("Animate").show(ui, |ui| {
                ui.checkbox(&mut scene.earth.animated, "enabled");
                ui.add(
                    Slider::new(&mut scene.earth.rotations_y_per_second, -0.1..=0.1)
                        .text("rotation y"),
                );
            });
            quality_selector(ui, "img def", &mut scene.earth.quality);
            if ui.button("reset").clicked() {
                scene.earth.reset();
            }
        });
    }

    fn cloud_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Cloud").show(ui, |ui| {
            ui.checkbox(&mut scene.cloud.visible, "visible");
            CollapsingHeader::new("Material").show(ui, |ui| {
                ui.checkbox(&mut scene.cloud.wireframe, "wireframe");
                ui.checkbox(&mut scene.cloud.transparent, "transparent");
                ui.add(Slider::new(&mut scene.cloud.opacity, 0.0..=1.0).text("opacity"));
                ui.add(Slider::new(&mut scene.cloud.bump_scale, 0.0..=2.0).text("bump scale"));
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut scene.cloud.color);
                    ui.label("color");
                });
            });
            CollapsingHeader::new("Animate").show(ui, |ui| {
                ui.checkbox(&mut scene.cloud.animated, "enabled");
                ui.add(
                    Slider::new(&mut scene.cloud.rotations_y_per_second, -0.01..=0.01)
                        .text("rotation y"),
                );
            });
            quality_selector(ui, "img def", &mut scene.cloud.quality);
            if ui.button("reset").clicked() {
                scene.cloud.reset();
            }
        });
    }

    fn moon_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Moon").show(ui, |ui| {
            ui.checkbox(&mut scene.moon.visible, "visible");
            CollapsingHeader::new("Position").show(ui, |ui| {
                vec3_row(ui, "position", &mut scene.moon.position);
            });
            CollapsingHeader::new("Material").show(ui, |ui| {
                ui.checkbox(&mut scene.moon.wireframe, "wireframe");
                ui.add(Slider::new(&mut scene.moon.bump_scale, 0.0..=2.0).text("bump scale"));
                ui.add(Slider::new(&mut scene.moon.shininess, 0.0..=100.0).text("shininess"));
            });
            CollapsingHeader::new("Animate").show(ui, |ui| {
                ui.checkbox(&mut scene.moon.animated, "enabled");
                ui.add(
                    Slider::new(&mut scene.moon.pivot_rotations_y_per_second, -0.5..=0.5)
                        .text("pivot rotation y"),
                );
            });
            quality_selector(ui, "img def", &mut scene.moon.quality);
            if ui.button("reset").clicked() {
                scene.moon.reset();
            }
        });
    }

    fn shadow_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Shadow").show(ui, |ui| {
            ui.checkbox(&mut scene.shadow.enabled, "enabled");
            ui.checkbox(&mut scene.shadow.helper_visible, "camera helper");
            let params = &mut scene.shadow.params;
            ui.add(DragValue::new(&mut params.left).prefix("left "));
            ui.add(DragValue::new(&mut params.right).prefix("right "));
            ui.add(DragValue::new(&mut params.top).prefix("top "));
            ui.add(DragValue::new(&mut params.bottom).prefix("bottom "));
            ui.add(DragValue::new(&mut params.near).prefix("near "));
            ui.add(DragValue::new(&mut params.far).prefix("far "));
            ui.add(
                DragValue::new(&mut params.bias)
                    .speed(0.0001)
                    .prefix("bias "),
            );
            ComboBox::from_label("map size")
                .selected_text(scene.shadow.map_size.to_string())
                .show_ui(ui, |ui| {
                    for size in [256_u32, 512, 1024, 2048] {
                        ui.selectable_value(&mut scene.shadow.map_size, size, size.to_string());
                    }
                });
            if ui.button("reset").clicked() {
                scene.shadow.reset();
            }
        });
    }

    fn orbit_section(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        CollapsingHeader::new("Orbit controls").show(ui, |ui| {
            ui.checkbox(&mut scene.orbit.auto_rotate, "auto rotate");
            ui.add(Slider::new(&mut scene.orbit.auto_rotate_speed, 0.0..=2.0).text("speed"));
            ui.checkbox(&mut scene.orbit.enable_damping, "damping");
            if ui.button("reset").clicked() {
                scene.orbit.reset();
            }
        });
    }
}

impl Default for TweakPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn quality_selector(ui: &mut egui::Ui, label: &str, quality: &mut QualitySetting) {
    ComboBox::from_label(label)
        .selected_text(quality.label())
        .show_ui(ui, |ui| {
            for setting in QualitySetting::ALL {
                ui.selectable_value(quality, setting, setting.label());
            }
        });
}

fn vec3_row(ui: &mut egui::Ui, label: &str, value: &mut glam::Vec3) {
    ui.horizontal(|ui| {
        ui.add(DragValue::new(&mut value.x).prefix("x "));
        ui.add(DragValue::new(&mut value.y).prefix("y "));
        ui.add(DragValue::new(&mut value.z).prefix("z "));
        ui.label(label);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    // The panel runs headless under a bare egui context.
    #[test]
    fn test_panel_renders_without_panicking() {
        let ctx = egui::Context::default();
        let mut panel = TweakPanel::new();
        let mut scene = Scene::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            panel.show(ctx, &mut scene);
        });
    }

    #[test]
    fn test_camera_clip_planes_survive_panel_pass() {
        let ctx = egui::Context::default();
        let mut panel = TweakPanel::new();
        let mut scene = Scene::new();
        scene.camera.near = 2.0;
        scene.camera.far = 6000.0;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            panel.show(ctx, &mut scene);
        });
        assert_eq!(scene.camera.near, 2.0);
        assert_eq!(scene.camera.far, 6000.0);
    }

    #[test]
    fn test_panel_leaves_scene_untouched_without_input() {
        let ctx = egui::Context::default();
        let mut panel = TweakPanel::new();
        let mut scene = Scene::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            panel.show(ctx, &mut scene);
        });
        assert_eq!(scene, Scene::new());
    }
}
