//! Reading, writing and editing of Battlefield 2 StdMesh files
//! (`.staticmesh`, `.bundledmesh` and `.skinnedmesh`).
//!
//! A [`StdMesh`] owns one interleaved vertex buffer and one index buffer
//! shared by every geometry. Each material of each lod claims a contiguous
//! range of both, and the structural edits keep those ranges tiled in
//! geometry order.

pub mod attrib;
pub mod codec;
pub mod mesh;
mod transform;
mod vertex;

#[cfg(test)]
mod fixture;

pub use attrib::{
	DeclType,
	Usage,
	VertexAttribute
};

#[cfg(feature = "export")]
pub use codec::export::ExportError;

#[cfg(feature = "import")]
pub use codec::import::{
	ImportCfg,
	ImportError,
	ImportFlag
};

pub use mesh::{
	EditError,
	Geometry,
	Lod,
	Material,
	MeshKind,
	StdMesh
};
