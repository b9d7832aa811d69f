//! Scene and render collaborators for streamed chunks.
//!
//! The streaming core never talks to a GPU or a windowing system. It hands
//! finished meshes to a [`ModelFactory`], keeps the resulting handles in a
//! name-keyed [`Cache`], and attaches one [`SceneObject`] per chunk to a
//! [`Scene`]. The headless implementations here are what the demo and the
//! tests run against.

pub mod cache;
pub mod model;
pub mod object;
pub mod scene;

pub use cache::Cache;
pub use model::{
    HeadlessModelFactory, ModelFactory, ModelHandle, RenderError, RenderResources, TextureHandle,
};
pub use object::{Drawable, ObjectId, ObjectKind, SceneObject};
pub use scene::{HeadlessScene, Scene};
