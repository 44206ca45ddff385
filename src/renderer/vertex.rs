//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Convert a `0xRRGGBB` literal to an opaque color
pub const fn hex(rgb: u32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::hex;

    /// Bulb colors, indexed by palette slot: red, green, blue, yellow, magenta, cyan
    pub const PALETTE: [[f32; 4]; 6] = [
        hex(0xFF3333),
        hex(0x33FF33),
        hex(0x3333FF),
        hex(0xFFFF33),
        hex(0xFF33FF),
        hex(0x33FFFF),
    ];

    pub const SKY: [(f32, [f32; 4]); 4] = [
        (0.0, hex(0x0a1128)),
        (0.3, hex(0x1a2850)),
        (0.7, hex(0x0f1b3d)),
        (1.0, hex(0x050814)),
    ];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const SNOW: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const WOOD: [(f32, [f32; 4]); 5] = [
        (0.0, hex(0x4a2f1a)),
        (0.2, hex(0x5d3a21)),
        (0.5, hex(0x6b4423)),
        (0.8, hex(0x5d3a21)),
        (1.0, hex(0x3d2412)),
    ];
    pub const WOOD_GRAIN: [f32; 4] = [0.0, 0.0, 0.0, 0.1];
    pub const WOOD_BORDER: [f32; 4] = hex(0x2d1a0d);
    pub const WOOD_HIGHLIGHT: [f32; 4] = [139.0 / 255.0, 90.0 / 255.0, 43.0 / 255.0, 0.3];

    pub const WIRE: [f32; 4] = hex(0x2d4a2d);
    pub const WIRE_SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const SOCKET: [f32; 4] = hex(0x3a3a3a);
    pub const SOCKET_EDGE: [f32; 4] = hex(0x2a2a2a);

    pub const BULB_OFF: [f32; 4] = hex(0x1a1a1a);
    pub const BULB_OFF_HIGHLIGHT: [f32; 4] = hex(0x2a2a2a);
    /// Tint of a wrongly placed bulb after a failed check
    pub const BULB_WRONG: [f32; 4] = hex(0x444444);
    pub const BULB_OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 0.4];
    pub const GLASS_SHINE: [f32; 4] = [1.0, 1.0, 1.0, 0.6];

    pub const MENU_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
    pub const MENU_PANEL: [f32; 4] = [20.0 / 255.0, 30.0 / 255.0, 50.0 / 255.0, 0.9];
    pub const GOLD: [f32; 4] = hex(0xFFD700);

    pub const DRAG_RIM: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
}
