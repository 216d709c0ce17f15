pub mod assets;
pub mod core;
pub mod mesh;
pub mod scene;
pub mod shaders;
pub mod systems;
