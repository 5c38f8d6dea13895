pub mod chunking;
pub mod models;
pub mod server;

pub use chunking::{chunk_plan, split_into_chunks, ChunkPlan, ChunkSpan, MAX_CHUNK_CHARS};
pub use models::*;
pub use server::{ServerUrl, ServerUrlError};
