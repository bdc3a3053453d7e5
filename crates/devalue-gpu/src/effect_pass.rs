//! One compute pipeline per effect variant.
//!
//! Shaders are assembled at runtime from `color_math.wgsl`,
//! `effect_common.wgsl` and the variant's `transform` function. Parameter
//! values travel in a fixed 16-slot uniform block; each variant declares
//! which uniform key lands in which slot.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use devalue_core::effect::{GAMMA, INTENSITY, TARGET_LUMA, TARGET_VALUE};
use devalue_core::{EffectKind, UniformBindings};

use crate::buffers::BYTES_PER_PIXEL;

/// Threads per workgroup, matching `@workgroup_size` in `effect_common.wgsl`.
pub const WORKGROUP_SIZE: u32 = 256;

/// Per-dimension dispatch limit guaranteed by wgpu's default limits.
pub const MAX_WORKGROUPS_PER_DIM: u32 = 65_535;

/// Number of scalar parameter slots in [`EffectUniformsGpu`].
pub const PARAM_SLOTS: usize = 16;

const COLOR_MATH_WGSL: &str = include_str!("../shaders/color_math.wgsl");
const EFFECT_COMMON_WGSL: &str = include_str!("../shaders/effect_common.wgsl");

/// GPU-side uniform block. Must match `EffectUniforms` in
/// `effect_common.wgsl` (80 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EffectUniformsGpu {
    pub slots: [[f32; 4]; 4],
    pub pixel_count: u32,
    pub row_stride: u32,
    pub _pad: [u32; 2],
}

impl EffectUniformsGpu {
    /// Pack a parameter snapshot into slot order for `kind`.
    ///
    /// Missing keys take the same fallback the CPU transform uses.
    pub fn pack(kind: EffectKind, uniforms: &UniformBindings, pixel_count: u32) -> Self {
        let mut flat = [0.0f32; PARAM_SLOTS];
        for (slot, &(key, fallback)) in uniform_layout(kind).iter().enumerate() {
            flat[slot] = uniforms.get_or(key, fallback);
        }

        let (_, _, row_stride) = dispatch_size(pixel_count);
        Self {
            slots: std::array::from_fn(|i| std::array::from_fn(|j| flat[i * 4 + j])),
            pixel_count,
            row_stride,
            _pad: [0; 2],
        }
    }

    /// Value stored in scalar slot `slot`.
    pub fn slot(&self, slot: usize) -> f32 {
        self.slots[slot / 4][slot % 4]
    }
}

/// Uniform keys bound by each variant, in slot order, with their fallbacks.
pub fn uniform_layout(kind: EffectKind) -> &'static [(&'static str, f32)] {
    match kind {
        EffectKind::ValueBlend | EffectKind::HsvDevalue => {
            &[(INTENSITY, 0.0), (TARGET_VALUE, 0.5)]
        }
        EffectKind::Deluma => &[(INTENSITY, 0.0), (TARGET_LUMA, 0.5), (GAMMA, 1.0)],
    }
}

/// Full WGSL source for `kind`.
pub fn shader_source(kind: EffectKind) -> String {
    let variant = match kind {
        EffectKind::ValueBlend => include_str!("../shaders/value_blend.wgsl"),
        EffectKind::HsvDevalue => include_str!("../shaders/hsv_devalue.wgsl"),
        EffectKind::Deluma => include_str!("../shaders/deluma.wgsl"),
    };
    format!("{COLOR_MATH_WGSL}\n{EFFECT_COMMON_WGSL}\n{variant}")
}

/// Workgroup grid `(x, y)` and the row stride in invocations for a
/// 1D pixel range. Large images wrap into a second dimension once `x`
/// hits the per-dimension limit.
pub fn dispatch_size(pixel_count: u32) -> (u32, u32, u32) {
    let groups = pixel_count.div_ceil(WORKGROUP_SIZE).max(1);
    if groups <= MAX_WORKGROUPS_PER_DIM {
        (groups, 1, groups * WORKGROUP_SIZE)
    } else {
        let y = groups.div_ceil(MAX_WORKGROUPS_PER_DIM);
        (
            MAX_WORKGROUPS_PER_DIM,
            y,
            MAX_WORKGROUPS_PER_DIM * WORKGROUP_SIZE,
        )
    }
}

/// Compiled compute pipeline for one effect variant.
pub struct EffectPass {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl EffectPass {
    /// Compile the shader and pipeline for `kind`.
    pub fn new(device: &wgpu::Device, kind: EffectKind) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("devalue_{}_shader", label_suffix(kind))),
            source: wgpu::ShaderSource::Wgsl(shader_source(kind).into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("devalue_effect_layout"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<EffectUniformsGpu>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("devalue_effect_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(&format!("devalue_{}_pipeline", label_suffix(kind))),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("apply_effect"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        tracing::debug!(effect = kind.name(), "compiled effect pipeline");

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// Record the effect dispatch from `input` into `output`.
    pub fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        input: &wgpu::Buffer,
        output: &wgpu::Buffer,
        uniforms: &wgpu::Buffer,
        pixel_count: u32,
    ) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("devalue_effect_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: input.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });

        let (x, y, _) = dispatch_size(pixel_count);

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("devalue_effect_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(x, y, 1);
    }
}

fn label_suffix(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::ValueBlend => "value_blend",
        EffectKind::HsvDevalue => "hsv_devalue",
        EffectKind::Deluma => "deluma",
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(BYTES_PER_PIXEL),
        },
        count: None,
    }
}
