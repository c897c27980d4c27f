pub mod event;
pub mod response;

pub use event::{InboundEvent, PromptRequest};
pub use response::{HandlerResponse, ResponseBody};
