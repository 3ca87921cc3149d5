use std::ops::Range;

use thiserror::Error;

use ultraviolet::{
	mat::Mat4,
	vec::Vec3
};

use crate::attrib::{
	Usage,
	VertexAttribute
};

/// Header version written by the editor for `.staticmesh` files
pub const VERSION_STATIC: i32 = 11;
/// Header version of most `.bundledmesh` and `.skinnedMesh` files
pub const VERSION_BUNDLED: i32 = 10;
/// Header version of some older `.bundledmesh` files
pub const VERSION_BUNDLED_OLD: i32 = 6;
pub const KNOWN_VERSIONS: [i32; 3] = [VERSION_BUNDLED_OLD, VERSION_BUNDLED, VERSION_STATIC];

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EditError {
	#[error("{what} index {index} out of range ({count} available)")]
	IndexOutOfRange {
		what: &'static str,
		index: usize,
		count: usize,
	},
	#[error("{usage}{channel} takes {expected} components, got {actual}")]
	ComponentCountMismatch {
		usage: Usage,
		channel: u8,
		expected: usize,
		actual: usize,
	},
	#[error("Mesh is malformed: {0}")]
	MalformedMesh(String),
	#[error("No {usage}{channel} vertex attribute")]
	NoSuchAttribute {
		usage: Usage,
		channel: u8,
	},
	#[error("Vertex formats differ, meshes cannot share buffers")]
	IncompatibleLayout,
	#[error("Not a permutation of {count} geometries: {order:?}")]
	InvalidPermutation {
		order: Vec<usize>,
		count: usize,
	},
	#[error("{0} vertices cannot be addressed by 16-bit indices")]
	VertexLimit(usize),
	#[error("Texture path cannot be stored one byte per char: {0:?}")]
	UnencodablePath(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
	pub u1: i32,
	/// Informational only, see [`StdMesh::is_skinned`]
	pub version: i32,
	pub u3: i32,
	pub u4: i32,
	pub u5: i32,
}

/// Extents of a level of detail
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min: Vec3,
	pub max: Vec3,
	pub pivot: Vec3,
}

impl Default for Bounds {
	fn default() -> Self {
		Self {
			min: Vec3::zero(),
			max: Vec3::zero(),
			pivot: Vec3::zero(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	pub min: Vec3,
	pub max: Vec3,
}

impl Default for BoundingBox {
	fn default() -> Self {
		Self {
			min: Vec3::zero(),
			max: Vec3::zero(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bone {
	pub id: i32,
	pub matrix: Mat4,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rig {
	pub bones: Vec<Bone>,
}

/// A contiguous vertex/index range drawn in one batch.
///
/// Starts are absolute offsets into the buffers shared by the whole file,
/// counted in vertices and indices respectively.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
	pub vertex_start: u32,
	pub vertex_count: u32,
	pub index_start: u32,
	pub index_count: u32,
	pub bbox: BoundingBox,
	pub maps: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lod {
	pub bounds: Bounds,
	pub rigs: Vec<Rig>,
	pub materials: Vec<Material>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
	pub lods: Vec<Lod>,
}

impl Geometry {
	/// Materials of every lod, in file order
	pub fn materials(&self) -> impl Iterator<Item = &Material> {
		self.lods.iter().flat_map(|lod| lod.materials.iter())
	}

	pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
		self.lods.iter_mut().flat_map(|lod| lod.materials.iter_mut())
	}

	pub fn vertex_count(&self) -> usize {
		self.materials().map(|m| m.vertex_count as usize).sum()
	}

	pub fn index_count(&self) -> usize {
		self.materials().map(|m| m.index_count as usize).sum()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKind {
	Static,
	Bundled,
	Skinned,
	Unknown,
}

/// Buffer ranges owned by one geometry, in vertices and indices
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Span {
	pub vertices: Range<usize>,
	pub indices: Range<usize>,
}

/// A decoded `.staticmesh`, `.bundledmesh` or `.skinnedMesh` file.
///
/// Vertex and index counts are not stored separately, they are always
/// derived from the buffers. The attribute table terminator is kept apart
/// from [`StdMesh::attributes`] and cannot be edited.
#[derive(Clone, Debug, PartialEq)]
pub struct StdMesh {
	pub header: Header,
	pub reserved: u8,
	pub geometries: Vec<Geometry>,
	pub attributes: Vec<VertexAttribute>,
	pub(crate) terminator: VertexAttribute,
	/// Width of one vertex buffer element in bytes
	pub element_size: u32,
	/// Size of one vertex record in bytes
	pub stride: u32,
	pub vertices: Vec<f32>,
	pub indices: Vec<u16>,
	/// Trailing word, only meaningful for skinned meshes
	pub rig_marker: i32,
}

impl StdMesh {
	/// Creates an empty mesh with the given vertex format
	pub fn new(header: Header, attributes: Vec<VertexAttribute>, element_size: u32, stride: u32) -> StdMesh {
		StdMesh {
			header: header,
			reserved: 0,
			geometries: vec![],
			attributes: attributes,
			terminator: VertexAttribute::TERMINATOR,
			element_size: element_size,
			stride: stride,
			vertices: vec![],
			indices: vec![],
			rig_marker: 0,
		}
	}

	pub fn terminator(&self) -> &VertexAttribute {
		&self.terminator
	}

	/// Number of buffer elements making up one vertex record
	pub fn stride_words(&self) -> usize {
		if self.element_size == 0 {
			return 0;
		}

		(self.stride / self.element_size) as usize
	}

	pub fn vertex_count(&self) -> usize {
		match self.stride_words() {
			0 => 0,
			words => self.vertices.len() / words,
		}
	}

	pub fn index_count(&self) -> usize {
		self.indices.len()
	}

	/// True when any lod carries a rig. The header version is not consulted.
	pub fn is_skinned(&self) -> bool {
		self.geometries.iter()
			.flat_map(|g| g.lods.iter())
			.any(|lod| !lod.rigs.is_empty())
	}

	/// Best guess at the file flavour, for display
	pub fn kind(&self) -> MeshKind {
		if self.is_skinned() {
			return MeshKind::Skinned;
		}

		match self.header.version {
			VERSION_STATIC => MeshKind::Static,
			VERSION_BUNDLED | VERSION_BUNDLED_OLD => MeshKind::Bundled,
			_ => MeshKind::Unknown,
		}
	}

	/// Every material of the file, in file order
	pub fn materials(&self) -> impl Iterator<Item = &Material> {
		self.geometries.iter().flat_map(|g| g.materials())
	}

	/// Checks that the material ranges tile both buffers in file order,
	/// that the vertex buffer holds whole records and that every index
	/// addresses an existing vertex.
	pub fn validate(&self) -> Result<(), EditError> {
		let words = self.stride_words();
		if words == 0 && !self.vertices.is_empty() {
			return Err(EditError::MalformedMesh(format!("vertex stride {} with element size {}",
				self.stride, self.element_size)));
		}

		if words != 0 && self.vertices.len() % words != 0 {
			return Err(EditError::MalformedMesh(format!(
				"vertex buffer of {} elements is not a multiple of the {} element stride",
				self.vertices.len(), words)));
		}

		let (mut vnext, mut inext) = (0usize, 0usize);
		for (i, m) in self.materials().enumerate() {
			if m.vertex_start as usize != vnext || m.index_start as usize != inext {
				return Err(EditError::MalformedMesh(format!(
					"material {} starts at vertex {} / index {}, expected {} / {}",
					i, m.vertex_start, m.index_start, vnext, inext)));
			}

			vnext += m.vertex_count as usize;
			inext += m.index_count as usize;
		}

		if vnext != self.vertex_count() || inext != self.index_count() {
			return Err(EditError::MalformedMesh(format!(
				"materials cover {} vertices / {} indices, buffers hold {} / {}",
				vnext, inext, self.vertex_count(), self.index_count())));
		}

		let vcount = self.vertex_count();
		if let Some(i) = self.indices.iter().position(|&i| i as usize >= vcount) {
			return Err(EditError::MalformedMesh(format!("index {} addresses vertex {} of {}",
				i, self.indices[i], vcount)));
		}

		Ok(())
	}

	/// Splits the buffers into the ranges owned by each geometry.
	/// Fails unless the mesh validates.
	pub(crate) fn spans(&self) -> Result<Vec<Span>, EditError> {
		self.validate()?;

		let (mut vnext, mut inext) = (0usize, 0usize);
		let mut spans = Vec::with_capacity(self.geometries.len());
		for geom in self.geometries.iter() {
			let span = Span {
				vertices: vnext..vnext + geom.vertex_count(),
				indices: inext..inext + geom.index_count(),
			};

			vnext = span.vertices.end;
			inext = span.indices.end;
			spans.push(span);
		}

		Ok(spans)
	}
}
