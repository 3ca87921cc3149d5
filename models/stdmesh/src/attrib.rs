//! Vertex declaration tables.
//!
//! The attribute table inside a mesh describes one interleaved vertex record
//! with Direct3D 9 style declarations: a declaration type giving the binary
//! layout of a field, and a usage giving its meaning. The usage word carries
//! a channel number in its high byte, so a second texture coordinate set is
//! `1 << 8 | TEXCOORD`.

use std::{
	fmt::{
		Display,
		Formatter,
		self
	},
	str::FromStr
};

use thiserror::Error;

/// Flag value of the row terminating the attribute table
pub const TERMINATOR_FLAG: u16 = 255;

/// Highest usage index Direct3D accepts
pub const MAX_CHANNEL: u8 = 15;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum UnknownAttributeCode {
	#[error("Unknown vertex declaration type: {0}")]
	DeclType(u16),
	#[error("Unknown vertex usage: {0:#06x}")]
	Usage(u16),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Unknown vertex usage name: {0}")]
pub struct UnknownUsageName(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DeclType {
	Float1 = 0,
	Float2,
	Float3,
	Float4,
	D3DColor,
	UByte4,
	Short2,
	Short4,
	UByte4N,
	Short2N,
	Short4N,
	UShort2N,
	UShort4N,
	UDec3,
	Dec3N,
	Float16x2,
	Float16x4,
	Unused,
}

impl DeclType {
	pub fn from_code(code: u16) -> Option<DeclType> {
		use DeclType::*;

		Some(match code {
			0 => Float1,
			1 => Float2,
			2 => Float3,
			3 => Float4,
			4 => D3DColor,
			5 => UByte4,
			6 => Short2,
			7 => Short4,
			8 => UByte4N,
			9 => Short2N,
			10 => Short4N,
			11 => UShort2N,
			12 => UShort4N,
			13 => UDec3,
			14 => Dec3N,
			15 => Float16x2,
			16 => Float16x4,
			17 => Unused,
			_ => return None,
		})
	}

	pub const fn code(self) -> u16 {
		self as u16
	}

	/// Number of logical components the field decodes to
	pub const fn components(self) -> usize {
		use DeclType::*;

		match self {
			Float1 => 1,
			Float2 | Short2 | Short2N | UShort2N | Float16x2 => 2,
			Float3 | UDec3 | Dec3N => 3,
			Float4 | D3DColor | UByte4 | Short4 | UByte4N | Short4N | UShort4N | Float16x4 => 4,
			Unused => 0,
		}
	}

	/// Size of the field in bytes
	pub const fn size(self) -> usize {
		use DeclType::*;

		match self {
			Float1 | D3DColor | UByte4 | Short2 | UByte4N | Short2N | UShort2N | UDec3 | Dec3N |
				Float16x2 => 4,
			Float2 | Short4 | Short4N | UShort4N | Float16x4 => 8,
			Float3 => 12,
			Float4 => 16,
			Unused => 0,
		}
	}

	/// Number of 32-bit slots the field occupies in the vertex buffer.
	/// Packed types keep their raw bits inside those slots.
	pub const fn words(self) -> usize {
		self.size() / 4
	}

	pub const fn name(self) -> &'static str {
		use DeclType::*;

		match self {
			Float1 => "FLOAT1",
			Float2 => "FLOAT2",
			Float3 => "FLOAT3",
			Float4 => "FLOAT4",
			D3DColor => "D3DCOLOR",
			UByte4 => "UBYTE4",
			Short2 => "SHORT2",
			Short4 => "SHORT4",
			UByte4N => "UBYTE4N",
			Short2N => "SHORT2N",
			Short4N => "SHORT4N",
			UShort2N => "USHORT2N",
			UShort4N => "USHORT4N",
			UDec3 => "UDEC3",
			Dec3N => "DEC3N",
			Float16x2 => "FLOAT16_2",
			Float16x4 => "FLOAT16_4",
			Unused => "UNUSED",
		}
	}
}

impl Display for DeclType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Usage {
	Position = 0,
	BlendWeight,
	BlendIndices,
	Normal,
	PSize,
	TexCoord,
	Tangent,
	Binormal,
	TessFactor,
	PositionT,
	Color,
	Fog,
	Depth,
	Sample,
}

impl Usage {
	pub const ALL: [Usage; 14] = [Usage::Position, Usage::BlendWeight, Usage::BlendIndices,
		Usage::Normal, Usage::PSize, Usage::TexCoord, Usage::Tangent, Usage::Binormal,
		Usage::TessFactor, Usage::PositionT, Usage::Color, Usage::Fog, Usage::Depth, Usage::Sample];

	pub fn from_code(code: u8) -> Option<Usage> {
		Usage::ALL.get(code as usize).copied()
	}

	pub const fn code(self) -> u8 {
		self as u8
	}

	pub const fn name(self) -> &'static str {
		use Usage::*;

		match self {
			Position => "POSITION",
			BlendWeight => "BLENDWEIGHT",
			BlendIndices => "BLENDINDICES",
			Normal => "NORMAL",
			PSize => "PSIZE",
			TexCoord => "TEXCOORD",
			Tangent => "TANGENT",
			Binormal => "BINORMAL",
			TessFactor => "TESSFACTOR",
			PositionT => "POSITIONT",
			Color => "COLOR",
			Fog => "FOG",
			Depth => "DEPTH",
			Sample => "SAMPLE",
		}
	}
}

impl Display for Usage {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Usage {
	type Err = UnknownUsageName;

	fn from_str(s: &str) -> Result<Usage, UnknownUsageName> {
		Usage::ALL.iter()
			.find(|u| u.name().eq_ignore_ascii_case(s))
			.copied()
			.ok_or_else(|| UnknownUsageName(s.to_string()))
	}
}

/// One row of the vertex attribute table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
	pub flag: u16,
	/// Byte offset of the field inside one vertex record
	pub offset: u16,
	pub decl: DeclType,
	pub usage: Usage,
	pub channel: u8,
}

impl VertexAttribute {
	/// The row every attribute table ends with
	pub const TERMINATOR: VertexAttribute = VertexAttribute {
		flag: TERMINATOR_FLAG,
		offset: 0,
		decl: DeclType::Unused,
		usage: Usage::Position,
		channel: 0,
	};

	pub fn new(offset: u16, decl: DeclType, usage: Usage, channel: u8) -> VertexAttribute {
		VertexAttribute {
			flag: 0,
			offset: offset,
			decl: decl,
			usage: usage,
			channel: channel,
		}
	}

	/// Decodes a raw `(flag, offset, decl type, usage)` row
	pub fn decode(raw: [u16; 4]) -> Result<VertexAttribute, UnknownAttributeCode> {
		let [flag, offset, decl, usage] = raw;

		let channel = (usage >> 8) as u8;
		if channel > MAX_CHANNEL {
			return Err(UnknownAttributeCode::Usage(usage));
		}

		Ok(VertexAttribute {
			flag: flag,
			offset: offset,
			decl: DeclType::from_code(decl).ok_or(UnknownAttributeCode::DeclType(decl))?,
			usage: Usage::from_code((usage & 0xFF) as u8).ok_or(UnknownAttributeCode::Usage(usage))?,
			channel: channel,
		})
	}

	/// Re-encodes the row exactly as it was read
	pub fn raw(&self) -> [u16; 4] {
		[self.flag, self.offset, self.decl.code(), self.usage_code()]
	}

	pub fn usage_code(&self) -> u16 {
		(self.channel as u16) << 8 | self.usage.code() as u16
	}

	pub fn is_terminator(&self) -> bool {
		self.flag == TERMINATOR_FLAG && self.decl == DeclType::Unused
	}
}

impl Display for VertexAttribute {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}{} {} @{}", self.usage, self.channel, self.decl, self.offset)
	}
}
