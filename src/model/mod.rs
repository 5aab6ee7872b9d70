pub mod body;
pub mod focus;
pub mod scene;

pub use body::{Body, BodyKind, Decor, DecorKind};
pub use focus::FocusTable;
pub use scene::SceneGraph;
