pub mod cache_service;
pub mod eval_service;
pub mod prompt_service;
pub mod sheet_logger;
pub mod token_service;

pub use cache_service::ParseCache;
pub use eval_service::{EvalInvoker, EvalService};
pub use prompt_service::{assemble, AssembledPrompt};
pub use sheet_logger::{extract_rubric_section, EvalRecord, SheetLogger};
pub use token_service::TokenCounter;
