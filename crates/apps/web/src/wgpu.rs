#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;

    use gpu::{Globals, MarkerInstance, PerspectiveCamera, RendererOptions, marker_instances};
    use scene::Scene;
    use scene::mesh::{MeshData, sphere_mesh};

    use crate::error::GlobeError;
    use crate::platform::SurfaceSize;

    const DEPTH_FORMAT: ::wgpu::TextureFormat = ::wgpu::TextureFormat::Depth24Plus;

    /// Segments of the unit sphere every marker instance is drawn from.
    const MARKER_SEGMENTS: u32 = 16;

    const GLOBALS_WGSL: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    star_model: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
    globe_color: vec4<f32>,
    globe_emissive: vec4<f32>,
    star_color: vec4<f32>,
    depth: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct FragOut {
    @location(0) color: vec4<f32>,
    @builtin(frag_depth) depth: f32,
};

// Logarithmic depth when enabled, the rasterized depth otherwise.
fn frag_depth(frag_z: f32, clip_w: f32) -> f32 {
    if (globals.depth.x > 0.0) {
        return log2(max(1e-6, 1.0 + clip_w)) * globals.depth.x;
    }
    return frag_z;
}
"#;

    const STARS_WGSL: &str = r#"
struct StarOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) clip_w: f32,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> StarOut {
    let clip = globals.view_proj * globals.star_model * vec4<f32>(position, 1.0);
    var out: StarOut;
    out.pos = clip;
    out.clip_w = clip.w;
    return out;
}

@fragment
fn fs_main(v: StarOut) -> FragOut {
    var out: FragOut;
    out.color = globals.star_color;
    out.depth = frag_depth(v.pos.z, v.clip_w);
    return out;
}
"#;

    const SURFACE_WGSL: &str = r#"
const SHININESS: f32 = 30.0;
const SPECULAR: vec3<f32> = vec3<f32>(0.0667, 0.0667, 0.0667);

struct SurfaceOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) world: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) clip_w: f32,
    @location(3) color: vec4<f32>,
    @location(4) emissive: vec3<f32>,
};

fn surface_out(world: vec3<f32>, normal: vec3<f32>, color: vec4<f32>, emissive: vec3<f32>) -> SurfaceOut {
    let clip = globals.view_proj * vec4<f32>(world, 1.0);
    var out: SurfaceOut;
    out.pos = clip;
    out.world = world;
    out.normal = normal;
    out.clip_w = clip.w;
    out.color = color;
    out.emissive = emissive;
    return out;
}

@vertex
fn vs_globe(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> SurfaceOut {
    return surface_out(position, normal, globals.globe_color, globals.globe_emissive.rgb);
}

@vertex
fn vs_marker(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) offset_scale: vec4<f32>,
    @location(3) color: vec4<f32>,
    @location(4) emissive: vec4<f32>,
) -> SurfaceOut {
    let world = offset_scale.xyz + position * offset_scale.w;
    return surface_out(world, normal, color, emissive.rgb);
}

@fragment
fn fs_main(v: SurfaceOut) -> FragOut {
    let n = normalize(v.normal);
    let l = normalize(globals.light_dir.xyz);
    let view = normalize(globals.camera_pos.xyz - v.world);
    let ndl = max(dot(n, l), 0.0);
    let h = normalize(l + view);
    let spec = pow(max(dot(n, h), 0.0), SHININESS) * ndl;
    let lit = v.color.rgb * (globals.ambient.rgb + globals.light_color.rgb * ndl)
        + SPECULAR * globals.light_color.rgb * spec
        + v.emissive;

    var out: FragOut;
    out.color = vec4<f32>(lit, v.color.a);
    out.depth = frag_depth(v.pos.z, v.clip_w);
    return out;
}
"#;

    const POSITION_ATTRS: [::wgpu::VertexAttribute; 1] =
        ::wgpu::vertex_attr_array![0 => Float32x3];
    const NORMAL_ATTRS: [::wgpu::VertexAttribute; 1] = ::wgpu::vertex_attr_array![1 => Float32x3];
    const INSTANCE_ATTRS: [::wgpu::VertexAttribute; 3] =
        ::wgpu::vertex_attr_array![2 => Float32x4, 3 => Float32x4, 4 => Float32x4];

    fn vec3_layout(attributes: &[::wgpu::VertexAttribute]) -> ::wgpu::VertexBufferLayout<'_> {
        ::wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: ::wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }

    fn instance_layout() -> ::wgpu::VertexBufferLayout<'static> {
        ::wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MarkerInstance>() as u64,
            step_mode: ::wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRS,
        }
    }

    struct MeshBuffers {
        positions: ::wgpu::Buffer,
        normals: ::wgpu::Buffer,
        indices: ::wgpu::Buffer,
        index_count: u32,
    }

    impl MeshBuffers {
        fn upload(device: &::wgpu::Device, label: &str, mesh: &MeshData) -> Self {
            let positions = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-positions")),
                contents: bytemuck::cast_slice(&mesh.positions),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            let normals = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-normals")),
                contents: bytemuck::cast_slice(&mesh.normals),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            let indices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: ::wgpu::BufferUsages::INDEX,
            });
            Self {
                positions,
                normals,
                indices,
                index_count: mesh.indices.len() as u32,
            }
        }

        fn destroy(&self) {
            self.positions.destroy();
            self.normals.destroy();
            self.indices.destroy();
        }
    }

    /// Geometry uploaded on the first frame; none of it changes afterwards.
    struct SceneBuffers {
        stars: ::wgpu::Buffer,
        star_count: u32,
        globe: MeshBuffers,
        marker_mesh: MeshBuffers,
        markers: ::wgpu::Buffer,
        marker_count: u32,
    }

    impl SceneBuffers {
        fn upload(device: &::wgpu::Device, scene: &Scene) -> Self {
            let stars = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("globe-stars"),
                contents: bytemuck::cast_slice(&scene.starfield.positions),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            let instances = marker_instances(scene);
            let markers = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("globe-marker-instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            Self {
                stars,
                star_count: scene.starfield.len() as u32,
                globe: MeshBuffers::upload(device, "globe-sphere", &scene.globe.mesh),
                marker_mesh: MeshBuffers::upload(
                    device,
                    "globe-marker",
                    &sphere_mesh(1.0, MARKER_SEGMENTS, MARKER_SEGMENTS),
                ),
                markers,
                marker_count: instances.len() as u32,
            }
        }

        fn destroy(&self) {
            self.stars.destroy();
            self.globe.destroy();
            self.marker_mesh.destroy();
            self.markers.destroy();
        }
    }

    struct Attachments {
        depth: ::wgpu::Texture,
        depth_view: ::wgpu::TextureView,
        msaa: Option<(::wgpu::Texture, ::wgpu::TextureView)>,
    }

    impl Attachments {
        fn new(
            device: &::wgpu::Device,
            config: &::wgpu::SurfaceConfiguration,
            sample_count: u32,
        ) -> Self {
            let size = ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            };
            let depth = device.create_texture(&::wgpu::TextureDescriptor {
                label: Some("globe-depth"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: ::wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let depth_view = depth.create_view(&::wgpu::TextureViewDescriptor::default());
            let msaa = (sample_count > 1).then(|| {
                let tex = device.create_texture(&::wgpu::TextureDescriptor {
                    label: Some("globe-msaa"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: ::wgpu::TextureDimension::D2,
                    format: config.format,
                    usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                });
                let view = tex.create_view(&::wgpu::TextureViewDescriptor::default());
                (tex, view)
            });
            Self {
                depth,
                depth_view,
                msaa,
            }
        }

        fn destroy(&self) {
            self.depth.destroy();
            if let Some((tex, _)) = &self.msaa {
                tex.destroy();
            }
        }
    }

    pub struct GpuContext {
        surface: ::wgpu::Surface<'static>,
        device: ::wgpu::Device,
        queue: ::wgpu::Queue,
        config: ::wgpu::SurfaceConfiguration,
        options: RendererOptions,
        sample_count: u32,
        clear_color: ::wgpu::Color,
        globals_buffer: ::wgpu::Buffer,
        globals_bind_group: ::wgpu::BindGroup,
        stars_pipeline: ::wgpu::RenderPipeline,
        globe_pipeline: ::wgpu::RenderPipeline,
        marker_pipeline: ::wgpu::RenderPipeline,
        attachments: Attachments,
        scene_buffers: Option<SceneBuffers>,
        // Declared last: the surface must be dropped before its instance.
        _instance: ::wgpu::Instance,
    }

    struct PipelineDesc<'a> {
        label: &'a str,
        module: &'a ::wgpu::ShaderModule,
        vs_entry: &'a str,
        buffers: &'a [::wgpu::VertexBufferLayout<'a>],
        topology: ::wgpu::PrimitiveTopology,
        blend: ::wgpu::BlendState,
    }

    fn create_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        format: ::wgpu::TextureFormat,
        sample_count: u32,
        desc: PipelineDesc<'_>,
    ) -> ::wgpu::RenderPipeline {
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module: desc.module,
                entry_point: Some(desc.vs_entry),
                compilation_options: Default::default(),
                buffers: desc.buffers,
            },
            fragment: Some(::wgpu::FragmentState {
                module: desc.module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(desc.blend),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::LessEqual,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        })
    }

    fn shader(device: &::wgpu::Device, label: &str, body: &str) -> ::wgpu::ShaderModule {
        device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(format!("{GLOBALS_WGSL}{body}"))),
        })
    }

    pub async fn create_context(
        canvas: web_sys::HtmlCanvasElement,
        options: RendererOptions,
        size: SurfaceSize,
    ) -> Result<GpuContext, GlobeError> {
        // Prefer WebGPU when available, but allow WebGL as a fallback.
        let instance = ::wgpu::Instance::new(&::wgpu::InstanceDescriptor {
            backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| GlobeError::Gpu(format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GlobeError::Gpu(format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("globe-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| GlobeError::Gpu(format!("device error: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| GlobeError::Gpu("surface reports no formats".to_string()))?;
        let see_through = options
            .transparent
            .then(|| {
                caps.alpha_modes
                    .iter()
                    .copied()
                    .find(|m| *m != ::wgpu::CompositeAlphaMode::Opaque)
            })
            .flatten();
        let alpha_mode = see_through
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let sample_count = options.sample_count();
        let attachments = Attachments::new(&device, &config, sample_count);

        let globals_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-globals-bgl"),
            entries: &[::wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: ::wgpu::BindingType::Buffer {
                    ty: ::wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-globals-bg"),
            layout: &globals_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&globals_layout],
            immediate_size: 0,
        });

        let stars_shader = shader(&device, "globe-stars-shader", STARS_WGSL);
        let surface_shader = shader(&device, "globe-surface-shader", SURFACE_WGSL);

        let stars_pipeline = create_pipeline(
            &device,
            &layout,
            format,
            sample_count,
            PipelineDesc {
                label: "globe-stars-pipeline",
                module: &stars_shader,
                vs_entry: "vs_main",
                buffers: &[vec3_layout(&POSITION_ATTRS)],
                topology: ::wgpu::PrimitiveTopology::PointList,
                blend: ::wgpu::BlendState::REPLACE,
            },
        );
        let marker_pipeline = create_pipeline(
            &device,
            &layout,
            format,
            sample_count,
            PipelineDesc {
                label: "globe-marker-pipeline",
                module: &surface_shader,
                vs_entry: "vs_marker",
                buffers: &[
                    vec3_layout(&POSITION_ATTRS),
                    vec3_layout(&NORMAL_ATTRS),
                    instance_layout(),
                ],
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                blend: ::wgpu::BlendState::REPLACE,
            },
        );
        let globe_pipeline = create_pipeline(
            &device,
            &layout,
            format,
            sample_count,
            PipelineDesc {
                label: "globe-sphere-pipeline",
                module: &surface_shader,
                vs_entry: "vs_globe",
                buffers: &[vec3_layout(&POSITION_ATTRS), vec3_layout(&NORMAL_ATTRS)],
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                blend: ::wgpu::BlendState::ALPHA_BLENDING,
            },
        );

        let [r, g, b] = options.clear_color.to_linear().to_array();
        Ok(GpuContext {
            surface,
            device,
            queue,
            config,
            options,
            sample_count,
            clear_color: ::wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: options.clear_alpha,
            },
            globals_buffer,
            globals_bind_group,
            stars_pipeline,
            globe_pipeline,
            marker_pipeline,
            attachments,
            scene_buffers: None,
            _instance: instance,
        })
    }

    impl GpuContext {
        pub fn resize(&mut self, size: SurfaceSize) {
            let (width, height) = (size.width.max(1), size.height.max(1));
            if (width, height) == (self.config.width, self.config.height) {
                return;
            }
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.attachments.destroy();
            self.attachments = Attachments::new(&self.device, &self.config, self.sample_count);
        }

        pub fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), GlobeError> {
            let frame = match self.surface.get_current_texture() {
                Ok(frame) => frame,
                Err(::wgpu::SurfaceError::Lost | ::wgpu::SurfaceError::Outdated) => {
                    self.surface.configure(&self.device, &self.config);
                    return Ok(());
                }
                Err(e) => return Err(GlobeError::Gpu(format!("surface acquire failed: {e}"))),
            };
            let view = frame
                .texture
                .create_view(&::wgpu::TextureViewDescriptor::default());

            let device = &self.device;
            let buffers = self
                .scene_buffers
                .get_or_insert_with(|| SceneBuffers::upload(device, scene));

            let globals = Globals::new(scene, camera, &self.options);
            self.queue
                .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

            let mut encoder = self
                .device
                .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                    label: Some("globe-frame-encoder"),
                });

            let (target, resolve_target) = match &self.attachments.msaa {
                Some((_, msaa_view)) => (msaa_view, Some(&view)),
                None => (&view, None),
            };

            {
                let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                    label: Some("globe-pass"),
                    color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target,
                        depth_slice: None,
                        ops: ::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(self.clear_color),
                            store: ::wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                        view: &self.attachments.depth_view,
                        depth_ops: Some(::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(1.0),
                            store: ::wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                    multiview_mask: None,
                });
                rpass.set_bind_group(0, &self.globals_bind_group, &[]);

                rpass.set_pipeline(&self.stars_pipeline);
                rpass.set_vertex_buffer(0, buffers.stars.slice(..));
                rpass.draw(0..buffers.star_count, 0..1);

                // Opaque markers before the translucent globe.
                let marker = &buffers.marker_mesh;
                rpass.set_pipeline(&self.marker_pipeline);
                rpass.set_vertex_buffer(0, marker.positions.slice(..));
                rpass.set_vertex_buffer(1, marker.normals.slice(..));
                rpass.set_vertex_buffer(2, buffers.markers.slice(..));
                rpass.set_index_buffer(marker.indices.slice(..), ::wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..marker.index_count, 0, 0..buffers.marker_count);

                let globe = &buffers.globe;
                rpass.set_pipeline(&self.globe_pipeline);
                rpass.set_vertex_buffer(0, globe.positions.slice(..));
                rpass.set_vertex_buffer(1, globe.normals.slice(..));
                rpass.set_index_buffer(globe.indices.slice(..), ::wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..globe.index_count, 0, 0..1);
            }

            self.queue.submit(std::iter::once(encoder.finish()));
            frame.present();
            Ok(())
        }

        /// Free every GPU allocation now instead of waiting for garbage collection.
        pub fn destroy(self) {
            if let Some(buffers) = &self.scene_buffers {
                buffers.destroy();
            }
            self.attachments.destroy();
            self.globals_buffer.destroy();
            self.device.destroy();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use gpu::{PerspectiveCamera, RendererOptions};
    use scene::Scene;

    use crate::error::GlobeError;
    use crate::platform::SurfaceSize;

    #[derive(Debug, Default)]
    pub struct GpuContext;

    pub async fn create_context(
        _canvas: web_sys::HtmlCanvasElement,
        _options: RendererOptions,
        _size: SurfaceSize,
    ) -> Result<GpuContext, GlobeError> {
        Err(GlobeError::Gpu(
            "wgpu initialization is only available on wasm32 targets".to_string(),
        ))
    }

    impl GpuContext {
        pub fn resize(&mut self, _size: SurfaceSize) {}

        pub fn render(
            &mut self,
            _scene: &Scene,
            _camera: &PerspectiveCamera,
        ) -> Result<(), GlobeError> {
            Err(GlobeError::Gpu(
                "wgpu rendering is only available on wasm32 targets".to_string(),
            ))
        }

        pub fn destroy(self) {}
    }
}

pub use imp::{GpuContext, create_context};
