pub mod chat_handlers;
pub mod expense_handlers;
pub mod page;
pub mod project_handlers;
pub mod report_handlers;
pub mod user_handlers;

pub use chat_handlers::*;
pub use expense_handlers::*;
pub use project_handlers::*;
pub use report_handlers::*;
pub use user_handlers::*;
