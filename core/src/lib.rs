//! Common routines shared by the mesher format crates

#[cfg(feature = "io_ext")]
pub mod io_ext;
