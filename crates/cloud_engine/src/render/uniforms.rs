//! GPU uniform block for the cloud pass
//!
//! Everything is packed in vec4 lanes so the block has identical layout under
//! std140 and std430. Matrices are column-major.

use bytemuck::{Pod, Zeroable};

use super::snapshot::FrameSnapshot;
use crate::foundation::math::{Mat4, Vec3};

/// Cloud parameters for one frame, ready for upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CloudUniforms {
    /// World to container-local transform
    pub world_to_local: [[f32; 4]; 4],
    /// Container-local to world transform
    pub local_to_world: [[f32; 4]; 4],
    /// Far-plane corner directions: bottom-left, top-left, top-right, bottom-right
    pub frustum_corners: [[f32; 4]; 4],
    /// Camera position, time in w
    pub camera_position: [f32; 4],
    /// Container world min corner, render distance in w
    pub bounds_min: [f32; 4],
    /// Container world max corner, debug depth threshold in w
    pub bounds_max: [f32; 4],
    /// Direction toward the sun, intensity in w
    pub to_sun: [f32; 4],
    /// Sun color
    pub sun_color: [f32; 4],
    /// Lit tint, density threshold in w
    pub cloud_color: [f32; 4],
    /// Shadow tint, density multiplier in w
    pub shadow_color: [f32; 4],
    /// Base noise offset, cloud scale in w
    pub base_offset: [f32; 4],
    /// Detail noise offset, detail scale in w
    pub detail_offset: [f32; 4],
    /// Extra detail noise offset, extra detail scale in w
    pub extra_detail_offset: [f32; 4],
    /// Edge fade distance, softness start, softness end, ray offset strength
    pub edge: [f32; 4],
    /// Bottom fade start/end, top fade start/end
    pub height_fade: [f32; 4],
    /// Detail weight, extra detail weight, absorption through cloud, absorption toward sun
    pub erosion_absorption: [f32; 4],
    /// Darkness threshold, powder intensity, base brightness, phase factor
    pub light: [f32; 4],
    /// Forward scattering, backward scattering, unused, unused
    pub scattering: [f32; 4],
    /// Steps, light steps, width, height
    pub counts: [u32; 4],
}

fn lanes(v: &Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

fn columns(m: &Mat4) -> [[f32; 4]; 4] {
    (*m).into()
}

impl CloudUniforms {
    /// Pack a frame snapshot
    pub fn from_snapshot(snapshot: &FrameSnapshot) -> Self {
        let p = &snapshot.params;
        let container = &snapshot.container;
        let frustum = &snapshot.frustum;
        let sun = &snapshot.sun;

        Self {
            world_to_local: columns(&container.world_to_local),
            local_to_world: columns(&container.local_to_world),
            frustum_corners: [
                lanes(&frustum.bottom_left, 0.0),
                lanes(&frustum.top_left, 0.0),
                lanes(&frustum.top_right, 0.0),
                lanes(&frustum.bottom_right, 0.0),
            ],
            camera_position: lanes(&snapshot.camera_position, snapshot.time),
            bounds_min: lanes(&container.bounds.min, p.render_distance),
            bounds_max: lanes(&container.bounds.max, p.debug_depth_threshold),
            to_sun: lanes(&sun.to_sun(), sun.intensity),
            sun_color: lanes(&sun.color, 0.0),
            cloud_color: lanes(&p.color, p.density_threshold),
            shadow_color: lanes(&p.shadow_color, p.density_multiplier),
            base_offset: lanes(&p.wind_offset, p.cloud_scale),
            detail_offset: lanes(&p.detail_offset, p.detail_scale),
            extra_detail_offset: lanes(&p.extra_detail_offset, p.extra_detail_scale),
            edge: [
                p.edge_fade_distance,
                p.edge_softness_start,
                p.edge_softness_end,
                p.ray_offset_strength,
            ],
            height_fade: [
                p.height_fade.bottom_start,
                p.height_fade.bottom_end,
                p.height_fade.top_start,
                p.height_fade.top_end,
            ],
            erosion_absorption: [
                p.detail_weight,
                p.extra_detail_weight,
                p.absorption_through_cloud,
                p.absorption_toward_sun,
            ],
            light: [
                p.darkness_threshold,
                p.powder_intensity,
                p.phase.base_brightness,
                p.phase.factor,
            ],
            scattering: [p.phase.forward, p.phase.backward, 0.0, 0.0],
            counts: [p.steps, p.light_steps, snapshot.width, snapshot.height],
        }
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
