pub mod image;
pub mod mock;
pub mod prompt;
pub mod providers;
pub mod rag;
pub mod retriever;
pub mod storage;

pub use image::{ImageClient, ImagePromptWriter, ImageService};
pub use providers::{BedrockInvoker, CompletionClient, ModelFamily, ModelInvoker};
pub use rag::RagService;
pub use retriever::{KendraSearchClient, Retriever, SearchClient};
pub use storage::{ObjectStore, S3ObjectStore};
