//! Structural edits.
//!
//! Merging appends the other mesh's data behind this one. Delete, copy and
//! reorder cut the mesh into per-geometry pieces, shuffle the pieces, and
//! hand them to a single re-layout pass which rebuilds both buffers in
//! geometry order and rewrites every material start and index value. All
//! checks happen before the mesh is touched, so a failed edit leaves it as
//! it was.

use log::debug;

use std::ops::Range;

use ultraviolet::vec::Vec3;

use mesher_core::io_ext::latin1_bytes;

use crate::{
	attrib::Usage,
	mesh::{
		EditError,
		Geometry,
		StdMesh
	}
};

/// Highest vertex count a 16-bit index buffer can address
const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// A geometry together with the buffer data it owns
#[derive(Clone, Debug)]
struct Piece {
	geometry: Geometry,
	/// Vertices of the piece in the buffer it was cut from
	vertex_range: Range<usize>,
	index_base: usize,
	vertices: Vec<f32>,
	indices: Vec<u16>,
	/// Duplicate of another piece; indices into other geometries keep
	/// following the original's data
	copy: bool,
}

impl StdMesh {
	fn cut(&self) -> Result<Vec<Piece>, EditError> {
		let words = self.stride_words();

		Ok(self.spans()?.into_iter().zip(self.geometries.iter()).map(|(span, geom)| Piece {
			geometry: geom.clone(),
			vertex_range: span.vertices.clone(),
			index_base: span.indices.start,
			vertices: self.vertices[span.vertices.start * words..span.vertices.end * words].to_vec(),
			indices: self.indices[span.indices].to_vec(),
			copy: false,
		}).collect())
	}

	/// Lays the pieces out back to back and makes every material and index
	/// point at the new location of its data.
	///
	/// An index inside its own geometry moves with that geometry. An index
	/// into another geometry follows the vertex it points at, and fails if
	/// that vertex is not kept.
	fn relayout(&mut self, pieces: Vec<Piece>) -> Result<(), EditError> {
		let total_vertices: usize = pieces.iter().map(|p| p.vertex_range.len()).sum();
		if total_vertices > MAX_VERTICES {
			return Err(EditError::VertexLimit(total_vertices));
		}

		let mut moved: Vec<Option<usize>> = vec![None; self.vertex_count()];
		let mut bases = Vec::with_capacity(pieces.len());
		let mut next = 0;
		for piece in pieces.iter() {
			if !piece.copy {
				for (v, slot) in moved[piece.vertex_range.clone()].iter_mut().enumerate() {
					*slot = Some(next + v);
				}
			}

			bases.push(next);
			next += piece.vertex_range.len();
		}

		let total_indices: usize = pieces.iter().map(|p| p.indices.len()).sum();
		let mut geometries = Vec::with_capacity(pieces.len());
		let mut vertices = Vec::with_capacity(pieces.iter().map(|p| p.vertices.len()).sum());
		let mut indices = Vec::with_capacity(total_indices);

		for (g, (mut piece, vertex_base)) in pieces.into_iter().zip(bases).enumerate() {
			let own = piece.vertex_range.clone();
			let remapped = piece.indices.iter()
				.map(|&i| {
					let i = i as usize;
					let target = if own.contains(&i) {
						Some(i - own.start + vertex_base)
					} else {
						moved.get(i).copied().flatten()
					};

					target.map(|t| t as u16).ok_or_else(|| EditError::MalformedMesh(format!(
						"geometry {} references vertex {}, which the edit removes", g, i)))
				})
				.collect::<Result<Vec<u16>, EditError>>()?;

			let index_base = indices.len();
			for m in piece.geometry.materials_mut() {
				m.vertex_start = (m.vertex_start as usize - own.start + vertex_base) as u32;
				m.index_start = (m.index_start as usize - piece.index_base + index_base) as u32;
			}

			indices.extend(remapped);
			vertices.extend_from_slice(&piece.vertices);
			geometries.push(piece.geometry);
		}

		self.geometries = geometries;
		self.vertices = vertices;
		self.indices = indices;

		Ok(())
	}

	/// Replaces one texture map path of a material
	pub fn rename_texture_map(&mut self, geom: usize, lod: usize, material: usize, map: usize, path: &str)
		-> Result<(), EditError>
	{
		if latin1_bytes(path).is_none() {
			return Err(EditError::UnencodablePath(path.to_string()));
		}

		let slot = get_mut(&mut self.geometries, geom, "geometry")
			.and_then(|g| get_mut(&mut g.lods, lod, "lod"))
			.and_then(|l| get_mut(&mut l.materials, material, "material"))
			.and_then(|m| get_mut(&mut m.maps, map, "map"))?;

		debug!("Renaming texture map {:?} to {:?}", slot, path);
		*slot = path.to_string();

		Ok(())
	}

	/// Overwrites one attribute of one vertex, nothing else changes
	pub fn edit_vertex(&mut self, vertex: usize, usage: Usage, channel: u8, values: &[f32])
		-> Result<(), EditError>
	{
		self.set_vertex_data(vertex, usage, channel, values)
	}

	/// Moves every vertex by `translation`
	pub fn offset_mesh_vertices(&mut self, translation: Vec3) -> Result<(), EditError> {
		let count = self.vertex_count();
		if count == 0 {
			return Ok(());
		}

		// Every record has the same layout, so locate the field once
		let first = self.locate(0, Usage::Position, 0)?;
		if first.len() < 3 {
			return Err(EditError::ComponentCountMismatch {
				usage: Usage::Position,
				channel: 0,
				expected: 3,
				actual: first.len(),
			});
		}

		debug!("Offsetting {} vertices by {:?}", count, translation);
		let words = self.stride_words();
		for record in self.vertices.chunks_exact_mut(words) {
			let pos = &mut record[first.start..first.start + 3];
			pos[0] += translation.x;
			pos[1] += translation.y;
			pos[2] += translation.z;
		}

		Ok(())
	}

	/// Appends the geometries and buffer data of `other`.
	///
	/// Both meshes must share a vertex format. Data already in this mesh
	/// stays where it is, `other`'s indices are shifted by the vertex count
	/// before the merge. `other` is left as it was.
	pub fn merge_mesh(&mut self, other: &StdMesh) -> Result<(), EditError> {
		if self.element_size != other.element_size || self.stride != other.stride ||
			self.attributes != other.attributes
		{
			return Err(EditError::IncompatibleLayout);
		}

		self.validate()?;
		other.validate()?;

		let vertex_base = self.vertex_count();
		let index_base = self.index_count();
		let total = vertex_base + other.vertex_count();
		if total > MAX_VERTICES {
			return Err(EditError::VertexLimit(total));
		}

		debug!("Merging {} geometries ({} vertices) into {} ({} vertices)", other.geometries.len(),
			other.vertex_count(), self.geometries.len(), vertex_base);

		self.geometries.extend(other.geometries.iter().cloned().map(|mut geom| {
			for m in geom.materials_mut() {
				m.vertex_start += vertex_base as u32;
				m.index_start += index_base as u32;
			}

			geom
		}));
		self.vertices.extend_from_slice(&other.vertices);
		self.indices.extend(other.indices.iter().map(|&i| (i as usize + vertex_base) as u16));

		Ok(())
	}

	/// Removes a geometry along with its vertex and index data
	pub fn delete_geometry(&mut self, geom: usize) -> Result<(), EditError> {
		check_index(geom, self.geometries.len(), "geometry")?;

		let mut pieces = self.cut()?;
		let removed = pieces.remove(geom);

		debug!("Deleting geometry {}: {} vertices, {} indices", geom,
			removed.geometry.vertex_count(), removed.indices.len());
		self.relayout(pieces)
	}

	/// Inserts a full copy of geometry `source` at position `dest`.
	///
	/// The copy gets its own vertex and index data, editing either geometry
	/// afterwards does not affect the other.
	pub fn copy_geometry(&mut self, source: usize, dest: usize) -> Result<(), EditError> {
		check_index(source, self.geometries.len(), "geometry")?;
		check_index(dest, self.geometries.len() + 1, "destination geometry")?;

		let mut pieces = self.cut()?;
		let mut copy = pieces[source].clone();
		copy.copy = true;
		pieces.insert(dest, copy);

		debug!("Copying geometry {} to {}", source, dest);
		self.relayout(pieces)
	}

	/// Reorders geometries so that new position `i` holds old geometry
	/// `order[i]`, moving their buffer data to match.
	pub fn reorder_geometries(&mut self, order: &[usize]) -> Result<(), EditError> {
		let count = self.geometries.len();
		let mut seen = vec![false; count];
		let is_permutation = order.len() == count && order.iter().all(|&i| {
			i < count && !std::mem::replace(&mut seen[i], true)
		});
		if !is_permutation {
			return Err(EditError::InvalidPermutation {
				order: order.to_vec(),
				count: count,
			});
		}

		let mut slots: Vec<Option<Piece>> = self.cut()?.into_iter().map(Some).collect();
		let pieces = order.iter().filter_map(|&i| slots[i].take()).collect();

		debug!("Reordering geometries as {:?}", order);
		self.relayout(pieces)
	}
}

fn check_index(index: usize, count: usize, what: &'static str) -> Result<(), EditError> {
	if index >= count {
		return Err(EditError::IndexOutOfRange {
			what: what,
			index: index,
			count: count,
		});
	}

	Ok(())
}

fn get_mut<'a, T>(items: &'a mut [T], index: usize, what: &'static str) -> Result<&'a mut T, EditError> {
	let count = items.len();

	items.get_mut(index).ok_or(EditError::IndexOutOfRange {
		what: what,
		index: index,
		count: count,
	})
}
