pub mod body;
pub mod consts;
pub mod interaction;
pub mod vec2;
pub mod world;
