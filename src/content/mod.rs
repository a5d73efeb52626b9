//! Content module - post models, portable text, and the stores they come from

pub mod fixtures;
pub mod loader;
pub mod portable_text;
mod post;
pub mod sanity;
mod store;

pub use fixtures::FixtureStore;
pub use loader::ContentLoader;
pub use portable_text::{Block, PortableTextRenderer};
pub use post::{Author, Comment, ImageAsset, ImageRef, Post, Reference, Slug};
pub use sanity::SanityStore;
pub use store::ContentStore;
