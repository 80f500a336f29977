//! One service per aggregate. Each method is a single linear operation over
//! the repositories it holds.

pub mod attachment;
pub mod file;
pub mod todo;

pub use attachment::AttachmentService;
pub use file::FileService;
pub use todo::TodoService;
