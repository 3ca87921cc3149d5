//! Binary layout of StdMesh files.
//!
//! There are no fixed record sizes: every list is preceded by a 32-bit
//! count, so the file can only be walked front to back. The geometry tree
//! comes first, then the vertex attribute table, the vertex buffer, the
//! index buffer and a trailing marker word.

#[cfg(feature = "import")]
pub mod import {
	use bitflags::bitflags;
	use byteorder::LE;
	use log::{
		debug,
		trace,
		warn
	};

	use thiserror::Error;

	use mesher_core::io_ext::{
		SliceReader,
		Truncated
	};

	use crate::{
		attrib::{
			DeclType,
			self,
			VertexAttribute
		},
		mesh::*
	};

	bitflags! {
		pub struct ImportFlag: u32 {
			/// Fail unless material ranges tile the buffers and every index is in range
			const VERIFY_LAYOUT = 1;
			/// Fail on header versions other than 6, 10 and 11
			const KNOWN_VERSIONS_ONLY = 2;
		}
	}

	impl Default for ImportFlag {
		fn default() -> Self {
			ImportFlag::empty()
		}
	}

	#[derive(Clone, Debug, Default, PartialEq)]
	pub struct ImportCfg {
		pub flags: ImportFlag,
	}

	#[derive(Debug, Error)]
	pub enum ImportError {
		#[error("Truncated file: {source}")]
		TruncatedFile {
			#[from]
			source: Truncated,
		},
		#[error("Vertex attribute row {row}: {source}")]
		UnknownAttributeCode {
			row: usize,
			source: attrib::UnknownAttributeCode,
		},
		#[error("Negative {what} count: {value}")]
		NegativeCount {
			what: &'static str,
			value: i32,
		},
		#[error("Vertex attribute table does not end with a terminator row")]
		MissingTerminator,
		#[error("Vertex attribute table terminated early at row {0}")]
		EarlyTerminator(usize),
		#[error("Unsupported vertex format: {stride} byte stride, {element_size} byte elements")]
		BadVertexFormat {
			element_size: u32,
			stride: u32,
		},
		#[error("Unknown/unsupported format version: {0}")]
		Version(i32),
		#[error("Mesh layout is inconsistent: {0}")]
		Layout(#[from] EditError),
	}

	fn count(buf: &mut SliceReader, what: &'static str) -> Result<usize, ImportError> {
		let value = buf.read_i32::<LE>()?;

		usize::try_from(value).map_err(|_| ImportError::NegativeCount {
			what: what,
			value: value,
		})
	}

	impl Header {
		fn read(buf: &mut SliceReader) -> Result<Header, ImportError> {
			Ok(Header {
				u1: buf.read_i32::<LE>()?,
				version: buf.read_i32::<LE>()?,
				u3: buf.read_i32::<LE>()?,
				u4: buf.read_i32::<LE>()?,
				u5: buf.read_i32::<LE>()?,
			})
		}
	}

	impl Bone {
		fn read(buf: &mut SliceReader) -> Result<Bone, ImportError> {
			Ok(Bone {
				id: buf.read_i32::<LE>()?,
				matrix: buf.read_mat4_le()?,
			})
		}
	}

	impl Rig {
		fn read(buf: &mut SliceReader) -> Result<Rig, ImportError> {
			let nbones = count(buf, "bone")?;

			let mut bones = vec![];
			for _ in 0..nbones {
				bones.push(Bone::read(buf)?);
			}

			Ok(Rig {
				bones: bones,
			})
		}
	}

	impl Material {
		fn read(buf: &mut SliceReader) -> Result<Material, ImportError> {
			let vstart = buf.read_u32::<LE>()?;
			let vnum = buf.read_u32::<LE>()?;
			let istart = buf.read_u32::<LE>()?;
			let inum = buf.read_u32::<LE>()?;
			let bbox = BoundingBox {
				min: buf.read_vec3_le()?,
				max: buf.read_vec3_le()?,
			};

			let nmaps = count(buf, "texture map")?;
			let mut maps = vec![];
			for _ in 0..nmaps {
				maps.push(buf.read_lstr()?);
			}

			Ok(Material {
				vertex_start: vstart,
				vertex_count: vnum,
				index_start: istart,
				index_count: inum,
				bbox: bbox,
				maps: maps,
			})
		}
	}

	impl Lod {
		fn read(buf: &mut SliceReader) -> Result<Lod, ImportError> {
			let bounds = Bounds {
				min: buf.read_vec3_le()?,
				max: buf.read_vec3_le()?,
				pivot: buf.read_vec3_le()?,
			};

			let nrigs = count(buf, "rig")?;
			let mut rigs = vec![];
			for _ in 0..nrigs {
				rigs.push(Rig::read(buf)?);
			}

			let nmats = count(buf, "material")?;
			let mut materials = vec![];
			for _ in 0..nmats {
				materials.push(Material::read(buf)?);
			}

			Ok(Lod {
				bounds: bounds,
				rigs: rigs,
				materials: materials,
			})
		}
	}

	impl Geometry {
		fn read(buf: &mut SliceReader) -> Result<Geometry, ImportError> {
			let nlods = count(buf, "lod")?;

			let mut lods = vec![];
			for _ in 0..nlods {
				lods.push(Lod::read(buf)?);
			}

			Ok(Geometry {
				lods: lods,
			})
		}
	}

	/// Reads the attribute table, splitting off its terminator row.
	/// The stored row count includes the terminator.
	fn attributes(buf: &mut SliceReader) -> Result<(Vec<VertexAttribute>, VertexAttribute), ImportError> {
		let nrows = count(buf, "vertex attribute")?;
		buf.require(nrows.saturating_mul(8))?;

		let mut rows = Vec::with_capacity(nrows);
		for row in 0..nrows {
			let raw = [buf.read_u16::<LE>()?, buf.read_u16::<LE>()?, buf.read_u16::<LE>()?,
				buf.read_u16::<LE>()?];

			rows.push(VertexAttribute::decode(raw).map_err(|e| ImportError::UnknownAttributeCode {
				row: row,
				source: e,
			})?);
		}

		let terminator = match rows.pop() {
			Some(last) if last.is_terminator() => last,
			_ => return Err(ImportError::MissingTerminator),
		};

		if let Some(row) = rows.iter().position(|a| a.decl == DeclType::Unused) {
			return Err(ImportError::EarlyTerminator(row));
		}

		Ok((rows, terminator))
	}

	impl StdMesh {
		/// Decodes a complete mesh file with the default [`ImportCfg`]
		pub fn read(data: &[u8]) -> Result<StdMesh, ImportError> {
			StdMesh::read_with(data, &ImportCfg::default())
		}

		pub fn read_with(data: &[u8], cfg: &ImportCfg) -> Result<StdMesh, ImportError> {
			let buf = &mut SliceReader::new(data);

			let header = Header::read(buf)?;
			if !KNOWN_VERSIONS.contains(&header.version) {
				if cfg.flags.contains(ImportFlag::KNOWN_VERSIONS_ONLY) {
					return Err(ImportError::Version(header.version));
				}

				warn!("Unknown StdMesh version {}, reading anyway", header.version);
			}

			let reserved = buf.read_u8()?;

			let ngeoms = count(buf, "geometry")?;
			let mut geometries = vec![];
			for g in 0..ngeoms {
				let geom = Geometry::read(buf)?;
				trace!("Geometry {}: {} lods, {} vertices, {} indices", g, geom.lods.len(),
					geom.vertex_count(), geom.index_count());
				geometries.push(geom);
			}

			let (attributes, terminator) = attributes(buf)?;

			let element_size = count(buf, "vertex element size")? as u32;
			let stride = count(buf, "vertex stride")? as u32;
			if element_size == 0 || stride < element_size || stride % element_size != 0 {
				return Err(ImportError::BadVertexFormat {
					element_size: element_size,
					stride: stride,
				});
			}

			let nverts = count(buf, "vertex")?;
			let nwords = ((stride / element_size) as usize).saturating_mul(nverts);
			let vertices = buf.read_f32_vec::<LE>(nwords)?;

			let nindices = count(buf, "index")?;
			let indices = buf.read_u16_vec::<LE>(nindices)?;

			let rig_marker = buf.read_i32::<LE>()?;
			if buf.remaining() > 0 {
				warn!("Ignoring {} bytes after the end of the mesh", buf.remaining());
			}

			let mesh = StdMesh {
				header: header,
				reserved: reserved,
				geometries: geometries,
				attributes: attributes,
				terminator: terminator,
				element_size: element_size,
				stride: stride,
				vertices: vertices,
				indices: indices,
				rig_marker: rig_marker,
			};

			if cfg.flags.contains(ImportFlag::VERIFY_LAYOUT) {
				mesh.validate()?;
			}

			debug!("Read {:?} mesh: {} geometries, {} attributes, {} vertices, {} indices", mesh.kind(),
				mesh.geometries.len(), mesh.attributes.len(), nverts, nindices);

			Ok(mesh)
		}
	}
}

#[cfg(feature = "export")]
pub mod export {
	use byteorder::{
		LE,
		WriteBytesExt
	};

	use log::debug;

	use std::io;
	use thiserror::Error;

	use mesher_core::io_ext::WriteBinExt;

	use crate::mesh::*;

	#[derive(Debug, Error)]
	pub enum ExportError {
		#[error("Too many {what} for a 32-bit count: {count}")]
		CountOverflow {
			what: &'static str,
			count: usize,
		},
		#[error("Vertex buffer of {len} elements does not hold whole {stride_words} element records")]
		RaggedVertices {
			len: usize,
			stride_words: usize,
		},
		#[error("I/O error")]
		IO {
			#[from]
			source: io::Error,
		},
	}

	fn write_count<W>(buf: &mut W, what: &'static str, count: usize) -> Result<(), ExportError>
	where
		W: WriteBytesExt,
	{
		let value = i32::try_from(count).map_err(|_| ExportError::CountOverflow {
			what: what,
			count: count,
		})?;

		Ok(buf.write_i32::<LE>(value)?)
	}

	impl Header {
		fn write<W>(&self, buf: &mut W) -> io::Result<()>
		where
			W: WriteBytesExt,
		{
			buf.write_i32::<LE>(self.u1)?;
			buf.write_i32::<LE>(self.version)?;
			buf.write_i32::<LE>(self.u3)?;
			buf.write_i32::<LE>(self.u4)?;
			buf.write_i32::<LE>(self.u5)
		}
	}

	impl Rig {
		fn write<W>(&self, buf: &mut W) -> Result<(), ExportError>
		where
			W: WriteBytesExt,
		{
			write_count(buf, "bones", self.bones.len())?;

			for bone in self.bones.iter() {
				buf.write_i32::<LE>(bone.id)?;
				buf.write_mat4_le(&bone.matrix)?;
			}

			Ok(())
		}
	}

	impl Material {
		fn write<W>(&self, buf: &mut W) -> Result<(), ExportError>
		where
			W: WriteBytesExt,
		{
			buf.write_u32::<LE>(self.vertex_start)?;
			buf.write_u32::<LE>(self.vertex_count)?;
			buf.write_u32::<LE>(self.index_start)?;
			buf.write_u32::<LE>(self.index_count)?;
			buf.write_vec3_le(self.bbox.min)?;
			buf.write_vec3_le(self.bbox.max)?;

			write_count(buf, "texture maps", self.maps.len())?;
			for map in self.maps.iter() {
				buf.write_lstr(map)?;
			}

			Ok(())
		}
	}

	impl Lod {
		fn write<W>(&self, buf: &mut W) -> Result<(), ExportError>
		where
			W: WriteBytesExt,
		{
			buf.write_vec3_le(self.bounds.min)?;
			buf.write_vec3_le(self.bounds.max)?;
			buf.write_vec3_le(self.bounds.pivot)?;

			write_count(buf, "rigs", self.rigs.len())?;
			for rig in self.rigs.iter() {
				rig.write(buf)?;
			}

			write_count(buf, "materials", self.materials.len())?;
			for material in self.materials.iter() {
				material.write(buf)?;
			}

			Ok(())
		}
	}

	impl StdMesh {
		/// Encodes the mesh. Every count is taken from the live containers.
		pub fn write<W>(&self, buf: &mut W) -> Result<(), ExportError>
		where
			W: WriteBytesExt,
		{
			let words = self.stride_words();
			if (words == 0 && !self.vertices.is_empty()) || (words != 0 && self.vertices.len() % words != 0) {
				return Err(ExportError::RaggedVertices {
					len: self.vertices.len(),
					stride_words: words,
				});
			}

			self.header.write(buf)?;
			buf.write_u8(self.reserved)?;

			write_count(buf, "geometries", self.geometries.len())?;
			for geom in self.geometries.iter() {
				write_count(buf, "lods", geom.lods.len())?;
				for lod in geom.lods.iter() {
					lod.write(buf)?;
				}
			}

			write_count(buf, "vertex attributes", self.attributes.len() + 1)?;
			for attr in self.attributes.iter().chain(std::iter::once(&self.terminator)) {
				for word in attr.raw() {
					buf.write_u16::<LE>(word)?;
				}
			}

			write_count(buf, "vertex element size", self.element_size as usize)?;
			write_count(buf, "vertex stride", self.stride as usize)?;
			write_count(buf, "vertices", self.vertex_count())?;
			for v in self.vertices.iter() {
				buf.write_f32::<LE>(*v)?;
			}

			write_count(buf, "indices", self.indices.len())?;
			for i in self.indices.iter() {
				buf.write_u16::<LE>(*i)?;
			}

			buf.write_i32::<LE>(self.rig_marker)?;

			Ok(())
		}

		/// Encodes the mesh into a new buffer
		pub fn to_bytes(&self) -> Result<Vec<u8>, ExportError> {
			let mut out = vec![];
			self.write(&mut out)?;
			debug!("Wrote {} byte mesh: {} geometries, {} vertices, {} indices", out.len(),
				self.geometries.len(), self.vertex_count(), self.index_count());

			Ok(out)
		}
	}
}

#[cfg(all(test, feature = "import", feature = "export"))]
mod tests {
	use byteorder::{
		ByteOrder,
		LE,
		WriteBytesExt
	};

	use ultraviolet::vec::{
		Vec3,
		Vec4
	};

	use crate::{
		attrib::{
			DeclType,
			Usage,
			self
		},
		fixture::{
			box_mesh,
			layered_mesh
		},
		mesh::{
			EditError,
			MeshKind,
			StdMesh
		}
	};

	use super::{
		export::ExportError,
		import::{
			ImportCfg,
			ImportError,
			ImportFlag
		}
	};

	/// Offset of the attribute row count in an encoded box mesh
	fn box_table_offset(bytes: &[u8]) -> usize {
		// marker, indices, index count, vertices, vertex count, stride, element size, 9 rows
		bytes.len() - 4 - 36 * 2 - 4 - 450 * 4 - 4 - 4 - 4 - 9 * 8 - 4
	}

	#[test]
	fn test_box_scenario() {
		let bytes = box_mesh().to_bytes().unwrap();

		let header: Vec<i32> = bytes[0..20].chunks(4).map(LE::read_i32).collect();
		assert_eq!(vec![0, 11, 0, 0, 0], header);

		let table = box_table_offset(&bytes);
		assert_eq!(9, LE::read_i32(&bytes[table..]));
		assert_eq!(4, LE::read_i32(&bytes[table + 4 + 72..]));
		assert_eq!(72, LE::read_i32(&bytes[table + 4 + 72 + 4..]));
		assert_eq!(25, LE::read_i32(&bytes[table + 4 + 72 + 8..]));

		let mesh = StdMesh::read(&bytes).unwrap();
		assert_eq!(11, mesh.header.version);
		assert_eq!(1, mesh.geometries.len());
		assert_eq!(8, mesh.attributes.len());
		assert_eq!([255, 0, 17, 0], mesh.terminator().raw());
		assert_eq!(450, mesh.vertices.len());
		assert_eq!(36, mesh.indices.len());
		assert_eq!(8, mesh.rig_marker);
		assert_eq!(Usage::TexCoord, mesh.attributes[4].usage);
		assert_eq!(1, mesh.attributes[4].channel);
	}

	#[test]
	fn test_round_trip() {
		for mesh in [box_mesh(), layered_mesh(&[&[3, 2], &[4, 1], &[5]], true),
			layered_mesh(&[&[6], &[], &[2]], false)]
		{
			let bytes = mesh.to_bytes().unwrap();
			let decoded = StdMesh::read(&bytes).unwrap();
			assert_eq!(mesh, decoded);
			assert_eq!(bytes, decoded.to_bytes().unwrap());
		}
	}

	#[test]
	fn test_round_trip_raw_bits() {
		let mut mesh = box_mesh();
		// packed colors and odd paths keep their exact bytes
		mesh.vertices[6] = f32::from_bits(0xFF80_40C0);
		mesh.geometries[0].lods[0].materials[0].maps[1] = "caf\u{e9}/\u{ff}.dds".to_string();
		mesh.reserved = 3;
		mesh.header.u5 = -7;

		let bytes = mesh.to_bytes().unwrap();
		let decoded = StdMesh::read(&bytes).unwrap();
		assert_eq!(0xFF80_40C0, decoded.vertices[6].to_bits());
		assert_eq!(bytes, decoded.to_bytes().unwrap());
	}

	#[test]
	fn test_truncated_anywhere() {
		let bytes = layered_mesh(&[&[2, 1], &[3]], true).to_bytes().unwrap();

		for cut in 0..bytes.len() {
			match StdMesh::read(&bytes[..cut]) {
				Err(ImportError::TruncatedFile { source }) => {
					assert_eq!(cut, source.offset + source.available);
					assert!(source.expected > source.available);
				},
				other => panic!("cut at {}: {:?}", cut, other),
			}
		}
	}

	#[test]
	fn test_truncated_context() {
		let bytes = box_mesh().to_bytes().unwrap();
		match StdMesh::read(&bytes[..10]) {
			Err(ImportError::TruncatedFile { source }) => {
				assert_eq!((8, 4, 2), (source.offset, source.expected, source.available));
			},
			other => panic!("{:?}", other),
		}
	}

	#[test]
	fn test_unknown_decl_type() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		let row = box_table_offset(&bytes) + 4;
		LE::write_u16(&mut bytes[row + 4..], 99);

		assert!(matches!(StdMesh::read(&bytes), Err(ImportError::UnknownAttributeCode {
			row: 0,
			source: attrib::UnknownAttributeCode::DeclType(99),
		})));
	}

	#[test]
	fn test_unknown_usage() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		let row = box_table_offset(&bytes) + 4 + 8 * 3;
		LE::write_u16(&mut bytes[row + 6..], 0x0120);

		assert!(matches!(StdMesh::read(&bytes), Err(ImportError::UnknownAttributeCode {
			row: 3,
			source: attrib::UnknownAttributeCode::Usage(0x0120),
		})));
	}

	#[test]
	fn test_missing_terminator() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		let last_row = box_table_offset(&bytes) + 4 + 8 * 8;
		LE::write_u16(&mut bytes[last_row..], 0);

		assert!(matches!(StdMesh::read(&bytes), Err(ImportError::MissingTerminator)));
	}

	#[test]
	fn test_early_terminator() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		let row = box_table_offset(&bytes) + 4 + 8 * 2;
		LE::write_u16(&mut bytes[row..], 255);
		LE::write_u16(&mut bytes[row + 4..], 17);

		assert!(matches!(StdMesh::read(&bytes), Err(ImportError::EarlyTerminator(2))));
	}

	#[test]
	fn test_bad_vertex_format() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		let format = box_table_offset(&bytes) + 4 + 72;
		LE::write_i32(&mut bytes[format..], 0);

		assert!(matches!(StdMesh::read(&bytes), Err(ImportError::BadVertexFormat {
			element_size: 0,
			stride: 72,
		})));
	}

	#[test]
	fn test_negative_count() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		LE::write_i32(&mut bytes[21..], -1);

		assert!(matches!(StdMesh::read(&bytes), Err(ImportError::NegativeCount {
			what: "geometry",
			value: -1,
		})));
	}

	#[test]
	fn test_version_policy() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		LE::write_i32(&mut bytes[4..], 3);

		assert_eq!(3, StdMesh::read(&bytes).unwrap().header.version);

		let cfg = ImportCfg {
			flags: ImportFlag::KNOWN_VERSIONS_ONLY,
		};
		assert!(matches!(StdMesh::read_with(&bytes, &cfg), Err(ImportError::Version(3))));
	}

	#[test]
	fn test_verify_layout() {
		let mut mesh = layered_mesh(&[&[3], &[4]], false);
		mesh.geometries[1].lods[0].materials[0].index_start = 0;
		let bytes = mesh.to_bytes().unwrap();

		assert!(StdMesh::read(&bytes).is_ok());

		let cfg = ImportCfg {
			flags: ImportFlag::VERIFY_LAYOUT,
		};
		assert!(matches!(StdMesh::read_with(&bytes, &cfg),
			Err(ImportError::Layout(EditError::MalformedMesh(_)))));
	}

	#[test]
	fn test_trailing_bytes() {
		let mut bytes = box_mesh().to_bytes().unwrap();
		bytes.extend_from_slice(&[0xAB; 3]);

		assert_eq!(box_mesh(), StdMesh::read(&bytes).unwrap());
	}

	#[test]
	fn test_ragged_vertices() {
		let mut mesh = box_mesh();
		mesh.vertices.pop();

		assert!(matches!(mesh.to_bytes(), Err(ExportError::RaggedVertices {
			len: 449,
			stride_words: 18,
		})));
	}

	#[test]
	fn test_unencodable_map() {
		let mut mesh = box_mesh();
		mesh.geometries[0].lods[0].materials[0].maps[0] = "\u{263A}.dds".to_string();

		assert!(matches!(mesh.to_bytes(), Err(ExportError::IO { .. })));
	}

	/// One skinned geometry with a single bone and a two map material,
	/// laid out field by field
	fn skinned_bytes() -> Vec<u8> {
		let mut out = vec![];
		for v in [7, 10, -1, 2, 3] {
			out.write_i32::<LE>(v).unwrap();
		}
		out.write_u8(1).unwrap();

		// geometries, lods
		out.write_i32::<LE>(1).unwrap();
		out.write_i32::<LE>(1).unwrap();
		for v in 1..=9 {
			out.write_f32::<LE>(v as f32).unwrap();
		}

		// rigs, bones
		out.write_i32::<LE>(1).unwrap();
		out.write_i32::<LE>(1).unwrap();
		out.write_i32::<LE>(42).unwrap();
		for v in 10..26 {
			out.write_f32::<LE>(v as f32).unwrap();
		}

		// materials
		out.write_i32::<LE>(1).unwrap();
		for v in [0, 3, 0, 3] {
			out.write_i32::<LE>(v).unwrap();
		}
		for v in [-1.0, -2.0, -3.0, 1.0, 2.0, 3.0] {
			out.write_f32::<LE>(v).unwrap();
		}
		out.write_i32::<LE>(2).unwrap();
		out.extend_from_slice(b"\x05\x00\x00\x00a.dds\x06\x00\x00\x00bb.dds");

		// attribute table
		out.write_i32::<LE>(3).unwrap();
		for v in [0, 0, 2, 0, 0, 12, 1, 0x0105, 255, 0, 17, 0] {
			out.write_u16::<LE>(v).unwrap();
		}

		out.write_i32::<LE>(4).unwrap();
		out.write_i32::<LE>(20).unwrap();
		out.write_i32::<LE>(3).unwrap();
		for v in 0..15 {
			out.write_f32::<LE>(v as f32 * 0.5).unwrap();
		}

		out.write_i32::<LE>(3).unwrap();
		for v in [2, 0, 1] {
			out.write_u16::<LE>(v).unwrap();
		}
		out.write_i32::<LE>(8).unwrap();

		out
	}

	#[test]
	fn test_read_skinned_layout() {
		let bytes = skinned_bytes();
		let mesh = StdMesh::read(&bytes).unwrap();

		assert_eq!((7, 10, -1, 2, 3), (mesh.header.u1, mesh.header.version, mesh.header.u3, mesh.header.u4,
			mesh.header.u5));
		assert_eq!(1, mesh.reserved);
		assert_eq!(MeshKind::Skinned, mesh.kind());

		let lod = &mesh.geometries[0].lods[0];
		assert_eq!(Vec3::new(1.0, 2.0, 3.0), lod.bounds.min);
		assert_eq!(Vec3::new(4.0, 5.0, 6.0), lod.bounds.max);
		assert_eq!(Vec3::new(7.0, 8.0, 9.0), lod.bounds.pivot);

		let bone = &lod.rigs[0].bones[0];
		assert_eq!(42, bone.id);
		assert_eq!(Vec4::new(10.0, 11.0, 12.0, 13.0), bone.matrix.cols[0]);
		assert_eq!(Vec4::new(22.0, 23.0, 24.0, 25.0), bone.matrix.cols[3]);

		let material = &lod.materials[0];
		assert_eq!((0, 3, 0, 3), (material.vertex_start, material.vertex_count, material.index_start,
			material.index_count));
		assert_eq!(Vec3::new(-1.0, -2.0, -3.0), material.bbox.min);
		assert_eq!(Vec3::new(1.0, 2.0, 3.0), material.bbox.max);
		assert_eq!(vec!["a.dds".to_string(), "bb.dds".to_string()], material.maps);

		assert_eq!(2, mesh.attributes.len());
		assert_eq!(DeclType::Float2, mesh.attributes[1].decl);
		assert_eq!((Usage::TexCoord, 1, 12), (mesh.attributes[1].usage, mesh.attributes[1].channel,
			mesh.attributes[1].offset));
		assert_eq!((4, 20), (mesh.element_size, mesh.stride));
		assert_eq!(&[5.0, 5.5, 6.0][..], mesh.vertex_data(2, Usage::Position, 0).unwrap());
		assert_eq!(&[4.0, 4.5][..], mesh.vertex_data(1, Usage::TexCoord, 1).unwrap());
		assert_eq!(vec![2, 0, 1], mesh.indices);
		assert_eq!(8, mesh.rig_marker);
		assert_eq!(Ok(()), mesh.validate());

		assert_eq!(bytes, mesh.to_bytes().unwrap());
	}
}
