use byteorder::{
	ByteOrder,
	LE,
	WriteBytesExt
};

use std::io::{
	ErrorKind,
	self,
	Write
};

use thiserror::Error;

use ultraviolet::{
	mat::Mat4,
	vec::{
		Vec3,
		Vec4
	}
};

/// Raised when a read would run past the end of the input
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Truncated input at offset {offset}: {expected} bytes needed, {available} available")]
pub struct Truncated {
	pub offset: usize,
	pub expected: usize,
	pub available: usize,
}

/// Sequential reader over an in-memory byte slice.
///
/// Every read checks the remaining length up front, so a short buffer is
/// reported as [`Truncated`] with the cursor position instead of an opaque
/// end-of-file error.
#[derive(Clone, Debug)]
pub struct SliceReader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> SliceReader<'a> {
	pub fn new(data: &'a [u8]) -> SliceReader<'a> {
		SliceReader {
			data: data,
			pos: 0,
		}
	}

	/// Current cursor offset from the start of the input
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Number of bytes left after the cursor
	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	/// Fails unless at least `length` bytes remain
	pub fn require(&self, length: usize) -> Result<(), Truncated> {
		let available = self.remaining();
		if length > available {
			return Err(Truncated {
				offset: self.pos,
				expected: length,
				available: available,
			});
		}

		Ok(())
	}

	/// Consumes the next `length` bytes
	pub fn take(&mut self, length: usize) -> Result<&'a [u8], Truncated> {
		self.require(length)?;

		let bytes = &self.data[self.pos..self.pos + length];
		self.pos += length;

		Ok(bytes)
	}

	pub fn read_u8(&mut self) -> Result<u8, Truncated> {
		Ok(self.take(1)?[0])
	}

	pub fn read_u16<B: ByteOrder>(&mut self) -> Result<u16, Truncated> {
		Ok(B::read_u16(self.take(2)?))
	}

	pub fn read_u32<B: ByteOrder>(&mut self) -> Result<u32, Truncated> {
		Ok(B::read_u32(self.take(4)?))
	}

	pub fn read_i32<B: ByteOrder>(&mut self) -> Result<i32, Truncated> {
		Ok(B::read_i32(self.take(4)?))
	}

	/// Reads `count` consecutive 16-bit integers.
	/// The byte length is checked before anything is allocated.
	pub fn read_u16_vec<B: ByteOrder>(&mut self, count: usize) -> Result<Vec<u16>, Truncated> {
		let bytes = self.take(count.checked_mul(2).unwrap_or(usize::MAX))?;
		let mut out = vec![0; count];
		B::read_u16_into(bytes, &mut out);

		Ok(out)
	}

	/// Reads `count` consecutive 32-bit floats.
	/// The byte length is checked before anything is allocated.
	pub fn read_f32_vec<B: ByteOrder>(&mut self, count: usize) -> Result<Vec<f32>, Truncated> {
		let bytes = self.take(count.checked_mul(4).unwrap_or(usize::MAX))?;
		let mut out = vec![0.0; count];
		B::read_f32_into(bytes, &mut out);

		Ok(out)
	}

	/// Reads a little endian 3D vector
	pub fn read_vec3_le(&mut self) -> Result<Vec3, Truncated> {
		let b = self.take(12)?;

		Ok(Vec3::new(LE::read_f32(&b[0..4]), LE::read_f32(&b[4..8]), LE::read_f32(&b[8..12])))
	}

	/// Reads a little endian 4D vector
	pub fn read_vec4_le(&mut self) -> Result<Vec4, Truncated> {
		let b = self.take(16)?;

		Ok(Vec4::new(LE::read_f32(&b[0..4]), LE::read_f32(&b[4..8]), LE::read_f32(&b[8..12]),
			LE::read_f32(&b[12..16])))
	}

	/// Reads a little endian 4x4 matrix stored column by column
	pub fn read_mat4_le(&mut self) -> Result<Mat4, Truncated> {
		self.require(64)?;

		Ok(Mat4::new(self.read_vec4_le()?, self.read_vec4_le()?, self.read_vec4_le()?,
			self.read_vec4_le()?))
	}

	/// Reads a string prefixed by its 32-bit little endian byte length.
	/// Each byte maps to the char of the same value, so any byte string survives a round trip.
	pub fn read_lstr(&mut self) -> Result<String, Truncated> {
		let length = self.read_u32::<LE>()? as usize;

		Ok(self.take(length)?.iter().map(|&b| b as char).collect())
	}
}

/// Encodes a string one byte per char, or `None` if any char is above U+00FF
pub fn latin1_bytes(s: &str) -> Option<Vec<u8>> {
	s.chars().map(|c| u8::try_from(c).ok()).collect()
}

pub trait WriteBinExt: Write {
	/// Writes a little endian 3D vector
	#[inline]
	fn write_vec3_le(&mut self, v: Vec3) -> io::Result<()> {
		self.write_f32::<LE>(v.x)?;
		self.write_f32::<LE>(v.y)?;
		self.write_f32::<LE>(v.z)
	}

	/// Writes a little endian 4D vector
	#[inline]
	fn write_vec4_le(&mut self, v: Vec4) -> io::Result<()> {
		self.write_f32::<LE>(v.x)?;
		self.write_f32::<LE>(v.y)?;
		self.write_f32::<LE>(v.z)?;
		self.write_f32::<LE>(v.w)
	}

	/// Writes a little endian 4x4 matrix column by column
	#[inline]
	fn write_mat4_le(&mut self, m: &Mat4) -> io::Result<()> {
		for col in m.cols.iter() {
			self.write_vec4_le(*col)?;
		}

		Ok(())
	}

	/// Writes a string prefixed by its 32-bit little endian byte length
	#[inline]
	fn write_lstr(&mut self, s: &str) -> io::Result<()> {
		let bytes = latin1_bytes(s).ok_or_else(|| io::Error::new(ErrorKind::InvalidInput,
			format!("String is not byte encodable: {:?}", s)))?;
		let length = u32::try_from(bytes.len()).map_err(|_| io::Error::new(ErrorKind::InvalidInput,
			"String too long for a 32-bit length prefix"))?;

		self.write_u32::<LE>(length)?;
		self.write_all(&bytes)
	}
}

impl<W> WriteBinExt for W
where
	W: Write + ?Sized,
{
}
