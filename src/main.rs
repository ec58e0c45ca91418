//! # Voxel World Entry Point
//!
//! This is the main entry point of the headless streaming driver. It simply calls
//! into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_world::run();
}
