use std::ops::Range;

use ultraviolet::vec::Vec3;

use crate::{
	attrib::{
		Usage,
		VertexAttribute
	},
	mesh::{
		EditError,
		StdMesh
	}
};

impl StdMesh {
	/// Returns the attribute with the given usage and channel, if declared
	pub fn attribute(&self, usage: Usage, channel: u8) -> Option<&VertexAttribute> {
		self.attributes.iter().find(|a| a.usage == usage && a.channel == channel)
	}

	/// Range of the vertex buffer holding one attribute of one vertex
	pub(crate) fn locate(&self, vertex: usize, usage: Usage, channel: u8) -> Result<Range<usize>, EditError> {
		let attr = self.attribute(usage, channel)
			.ok_or(EditError::NoSuchAttribute { usage: usage, channel: channel })?;

		let count = self.vertex_count();
		if vertex >= count {
			return Err(EditError::IndexOutOfRange {
				what: "vertex",
				index: vertex,
				count: count,
			});
		}

		let element = self.element_size as usize;
		if attr.offset as usize % element != 0 {
			return Err(EditError::MalformedMesh(format!("{} is not aligned to {} byte elements",
				attr, element)));
		}

		let start = vertex * self.stride_words() + attr.offset as usize / element;
		let range = start..start + attr.decl.size() / element;
		if range.end > self.vertices.len() {
			return Err(EditError::MalformedMesh(format!("{} runs past the end of vertex {}", attr, vertex)));
		}

		Ok(range)
	}

	/// Reads one attribute of one vertex
	pub fn vertex_data(&self, vertex: usize, usage: Usage, channel: u8) -> Result<&[f32], EditError> {
		let range = self.locate(vertex, usage, channel)?;

		Ok(&self.vertices[range])
	}

	/// Overwrites one attribute of one vertex.
	/// `values` must hold exactly as many elements as the attribute occupies.
	pub fn set_vertex_data(&mut self, vertex: usize, usage: Usage, channel: u8, values: &[f32])
		-> Result<(), EditError>
	{
		let range = self.locate(vertex, usage, channel)?;
		if values.len() != range.len() {
			return Err(EditError::ComponentCountMismatch {
				usage: usage,
				channel: channel,
				expected: range.len(),
				actual: values.len(),
			});
		}

		self.vertices[range].copy_from_slice(values);

		Ok(())
	}

	/// Reads the first three elements of POSITION, channel 0
	pub fn position(&self, vertex: usize) -> Result<Vec3, EditError> {
		match self.vertex_data(vertex, Usage::Position, 0)? {
			[x, y, z, ..] => Ok(Vec3::new(*x, *y, *z)),
			short => Err(EditError::ComponentCountMismatch {
				usage: Usage::Position,
				channel: 0,
				expected: 3,
				actual: short.len(),
			}),
		}
	}

	/// Overwrites the first three elements of POSITION, channel 0
	pub fn set_position(&mut self, vertex: usize, position: Vec3) -> Result<(), EditError> {
		let range = self.locate(vertex, Usage::Position, 0)?;
		if range.len() < 3 {
			return Err(EditError::ComponentCountMismatch {
				usage: Usage::Position,
				channel: 0,
				expected: 3,
				actual: range.len(),
			});
		}

		self.vertices[range.start..range.start + 3].copy_from_slice(&[position.x, position.y, position.z]);

		Ok(())
	}
}
