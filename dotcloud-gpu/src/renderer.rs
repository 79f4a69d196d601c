use std::sync::Arc;

use crate::device::GpuContext;
use crate::material::{DotMaterial, DOT_SHADER};
use bytemuck::{Pod, Zeroable};
use dotcloud_core::{Error, PointSet, Result};
use nalgebra::Matrix4;
use tracing::{debug, info, warn};
use winit::window::Window;

/// Per-instance vertex buffer layouts: positions at location 0, colors at 1
pub fn instance_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const COLOR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &POSITION,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &COLOR,
        },
    ]
}

/// Uniform block shared by both shader stages
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DotUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub size: f32,
    pub scale: f32,
    pub decode_srgb: u32,
    pub _padding: [u32; 3],
}

impl DotUniform {
    pub fn new(material: &DotMaterial, viewport: [f32; 2], decode_srgb: bool) -> Self {
        Self {
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
            viewport,
            size: material.size,
            scale: material.scale,
            decode_srgb: decode_srgb as u32,
            _padding: [0; 3],
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_color: [0.1, 0.1, 0.1, 1.0],
            enable_depth_test: true,
        }
    }
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU buffers mirroring a point set
struct PointBuffers {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    count: u32,
    generation: u64,
}

/// Renders a point set as round dots into a window surface
pub struct DotRenderer {
    pub gpu_context: GpuContext,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub render_pipeline: wgpu::RenderPipeline,
    pub uniform: DotUniform,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub material: DotMaterial,
    pub config: RenderConfig,
    depth_view: Option<wgpu::TextureView>,
    buffers: Option<PointBuffers>,
}

impl DotRenderer {
    /// Create a renderer presenting to `window`
    pub async fn new(window: Arc<Window>, material: DotMaterial, config: RenderConfig) -> Result<Self> {
        let instance = GpuContext::create_instance();
        let size = window.inner_size();

        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Gpu(format!("Failed to create surface: {:?}", e)))?;
        let gpu_context = GpuContext::new(instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        // Colors are stored sRGB-encoded; prefer a format that passes them through
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface reports no supported formats".to_string()))?;
        let decode_srgb = surface_format.is_srgb();

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);
        info!(format = ?surface_format, width = surface_config.width, height = surface_config.height, "configured surface");

        let uniform = DotUniform::new(
            &material,
            [surface_config.width as f32, surface_config.height as f32],
            decode_srgb,
        );
        let uniform_buffer = gpu_context.create_buffer_init(
            "Dot Uniform Buffer",
            &[uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let uniform_bind_group_layout = gpu_context.create_bind_group_layout(
            "dot_uniform_bind_group_layout",
            &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        );

        let uniform_bind_group = gpu_context.create_bind_group(
            "dot_uniform_bind_group",
            &uniform_bind_group_layout,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        );

        let shader = gpu_context.create_shader_module("Dot Shader", DOT_SHADER);

        let render_pipeline_layout = gpu_context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Dot Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = gpu_context.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Dot Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &instance_buffer_layouts(),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(material.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: if config.enable_depth_test {
                Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: material.depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                })
            } else {
                None
            },
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let mut renderer = Self {
            gpu_context,
            surface,
            surface_config,
            render_pipeline,
            uniform,
            uniform_buffer,
            uniform_bind_group,
            material,
            config,
            depth_view: None,
            buffers: None,
        };
        renderer.recreate_depth_view();
        Ok(renderer)
    }

    /// Update camera view and projection matrices
    pub fn update_camera(&mut self, view_matrix: Matrix4<f32>, proj_matrix: Matrix4<f32>) {
        self.uniform.view = view_matrix.into();
        self.uniform.proj = proj_matrix.into();
        self.write_uniform();
    }

    /// Resize renderer surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.gpu_context.device, &self.surface_config);
            self.uniform.viewport = [new_size.width as f32, new_size.height as f32];
            self.write_uniform();
            self.recreate_depth_view();
        }
    }

    /// Bring the GPU copies of `points` up to date
    ///
    /// A new `generation` replaces both buffers. Otherwise only a dirty color
    /// buffer is rewritten. Clears the dirty flag and returns `true` when
    /// anything was uploaded.
    pub fn sync_points(&mut self, points: &mut PointSet, generation: u64) -> bool {
        let stale = self.buffers.as_ref().map_or(true, |b| b.generation != generation);

        if stale {
            self.buffers = if points.is_empty() {
                None
            } else {
                Some(PointBuffers {
                    positions: self.gpu_context.create_buffer_init(
                        "Dot Position Buffer",
                        points.positions().as_slice(),
                        wgpu::BufferUsages::VERTEX,
                    ),
                    colors: self.gpu_context.create_buffer_init(
                        "Dot Color Buffer",
                        points.colors().as_slice(),
                        wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    ),
                    count: points.len() as u32,
                    generation,
                })
            };
            points.colors_mut().mark_uploaded();
            debug!(points = points.len(), generation, "uploaded point buffers");
            return true;
        }

        if !points.colors().needs_update {
            return false;
        }
        if let Some(buffers) = &self.buffers {
            self.gpu_context.queue.write_buffer(
                &buffers.colors,
                0,
                bytemuck::cast_slice(points.colors().as_slice()),
            );
        }
        points.colors_mut().mark_uploaded();
        true
    }

    /// Render the uploaded points
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.gpu_context.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface texture timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu_context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Dot Render Encoder"),
        });

        {
            let depth_stencil_attachment = self.depth_view.as_ref().map(|depth_view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            });

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Dot Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.config.background_color[0],
                            g: self.config.background_color[1],
                            b: self.config.background_color[2],
                            a: self.config.background_color[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffers) = &self.buffers {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffers.positions.slice(..));
                render_pass.set_vertex_buffer(1, buffers.colors.slice(..));
                render_pass.draw(0..6, 0..buffers.count);
            }
        }

        self.gpu_context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn write_uniform(&self) {
        self.gpu_context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniform),
        );
    }

    fn recreate_depth_view(&mut self) {
        if !self.config.enable_depth_test {
            self.depth_view = None;
            return;
        }

        let texture = self.gpu_context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Dot Depth Texture"),
            size: wgpu::Extent3d {
                width: self.surface_config.width,
                height: self.surface_config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        self.depth_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
    }
}
