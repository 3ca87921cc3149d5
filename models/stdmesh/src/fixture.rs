//! Synthetic meshes for unit tests

use ultraviolet::{
	mat::Mat4,
	vec::Vec3
};

use crate::{
	attrib::{
		DeclType,
		Usage,
		VertexAttribute
	},
	mesh::{
		Bone,
		BoundingBox,
		Bounds,
		Geometry,
		Header,
		Lod,
		Material,
		Rig,
		StdMesh,
		VERSION_BUNDLED,
		VERSION_STATIC
	}
};

pub const BOX_TEXTURE: &str = "objects/staticobjects/test/evil_box/textures/evil_box_c.dds";

/// The 72 byte vertex layout of the editor's static meshes
pub fn static_layout() -> Vec<VertexAttribute> {
	vec![
		VertexAttribute::new(0, DeclType::Float3, Usage::Position, 0),
		VertexAttribute::new(12, DeclType::Float3, Usage::Normal, 0),
		VertexAttribute::new(24, DeclType::D3DColor, Usage::BlendIndices, 0),
		VertexAttribute::new(28, DeclType::Float2, Usage::TexCoord, 0),
		VertexAttribute::new(36, DeclType::Float2, Usage::TexCoord, 1),
		VertexAttribute::new(44, DeclType::Float2, Usage::TexCoord, 2),
		VertexAttribute::new(52, DeclType::Float2, Usage::TexCoord, 3),
		VertexAttribute::new(60, DeclType::Float3, Usage::Tangent, 0),
	]
}

/// Value stored at element `word` of vertex `vertex`
pub fn word_value(vertex: usize, word: usize) -> f32 {
	(vertex * 100 + word) as f32
}

/// One geometry, one lod, one material: 25 vertices and 36 indices
pub fn box_mesh() -> StdMesh {
	let header = Header {
		version: VERSION_STATIC,
		..Header::default()
	};
	let mut mesh = StdMesh::new(header, static_layout(), 4, 72);

	mesh.geometries.push(Geometry {
		lods: vec![Lod {
			bounds: Bounds {
				min: Vec3::new(-0.5, 0.0, -0.5),
				max: Vec3::new(0.5, 1.0, 0.5),
				pivot: Vec3::new(0.5, 1.0, 0.5),
			},
			rigs: vec![],
			materials: vec![Material {
				vertex_start: 0,
				vertex_count: 25,
				index_start: 0,
				index_count: 36,
				bbox: BoundingBox {
					min: Vec3::new(-0.5, 0.0, -0.5),
					max: Vec3::new(0.5, 1.0, 0.5),
				},
				maps: vec![BOX_TEXTURE.to_string(), "common/textures/default_b.dds".to_string()],
			}],
		}],
	});

	mesh.vertices = (0..25).flat_map(|v| (0..18).map(move |w| word_value(v, w))).collect();
	mesh.vertices[0..3].copy_from_slice(&[0.5, 1.0, -0.5]);
	mesh.indices = (0..36u16).map(|k| (k * 7) % 25).collect();
	mesh.rig_marker = 8;

	mesh
}

/// Builds a mesh where `geoms[g][l]` is the vertex count of the single
/// material of lod `l` in geometry `g`. Each material owns three indices
/// per vertex, all pointing inside its own range.
pub fn layered_mesh(geoms: &[&[u32]], skinned: bool) -> StdMesh {
	let header = Header {
		version: if skinned { VERSION_BUNDLED } else { VERSION_STATIC },
		..Header::default()
	};
	let mut mesh = StdMesh::new(header, static_layout(), 4, 72);
	let words = mesh.stride_words();

	for (g, lods) in geoms.iter().enumerate() {
		let mut geom = Geometry::default();

		for (l, &vcount) in lods.iter().enumerate() {
			let vstart = mesh.vertices.len() / words;
			let istart = mesh.indices.len();

			for v in vstart..vstart + vcount as usize {
				mesh.vertices.extend((0..words).map(|w| word_value(v, w)));
			}

			for k in 0..(vcount * 3) {
				mesh.indices.push((vstart as u32 + k % vcount) as u16);
			}

			let rigs = if skinned {
				vec![Rig {
					bones: (0..2).map(|b| Bone {
						id: (g * 10 + l + b) as i32,
						matrix: Mat4::identity(),
					}).collect(),
				}]
			} else {
				vec![]
			};

			geom.lods.push(Lod {
				bounds: Bounds::default(),
				rigs: rigs,
				materials: vec![Material {
					vertex_start: vstart as u32,
					vertex_count: vcount,
					index_start: istart as u32,
					index_count: vcount * 3,
					bbox: BoundingBox::default(),
					maps: vec![format!("geom{}/lod{}_c.dds", g, l)],
				}],
			});
		}

		mesh.geometries.push(geom);
	}

	mesh
}
