use anyhow::{
	bail,
	Context
};

use std::{
	env,
	fs::read
};

use mesher_stdmesh::StdMesh;

fn main() -> anyhow::Result<()> {
	env_logger::init();

	let args: Vec<String> = env::args().collect();
	if args.len() != 2 {
		bail!("Usage: {} <mesh file>", args[0]);
	}

	let data = read(&args[1]).with_context(|| format!("Failed to read {}", args[1]))?;
	let mesh = StdMesh::read(&data).with_context(|| format!("Failed to decode {}", args[1]))?;

	println!("{:?} mesh, header {:?}", mesh.kind(), mesh.header);
	for (g, geom) in mesh.geometries.iter().enumerate() {
		println!("geometry {}", g);
		for (l, lod) in geom.lods.iter().enumerate() {
			println!("  lod {}: {} rigs", l, lod.rigs.len());
			for (m, mat) in lod.materials.iter().enumerate() {
				println!("    material {}: vertices {}+{}, indices {}+{}", m, mat.vertex_start,
					mat.vertex_count, mat.index_start, mat.index_count);
				for map in mat.maps.iter() {
					println!("      {}", map);
				}
			}
		}
	}

	for attr in mesh.attributes.iter() {
		println!("{}", attr);
	}

	println!("{} byte elements, {} byte stride, {} vertices, {} indices", mesh.element_size, mesh.stride,
		mesh.vertex_count(), mesh.index_count());

	if let Err(e) = mesh.validate() {
		println!("layout: {}", e);
	}

	let encoded = mesh.to_bytes().context("Failed to re-encode mesh")?;
	println!("re-encoded {}", if encoded == data { "identical" } else { "with differences" });

	Ok(())
}
