//! Domain types shared between the todo service and its clients.
//!
//! Nothing in here touches the network, the database or the disk.

pub mod attachment;
pub mod error;
pub mod file;
pub mod identifier;
pub mod status;
pub mod todo;

pub use attachment::{AttachFileRequest, Attachment, AttachmentDto, MAX_FILE_SIZE};
pub use error::TodoError;
pub use file::{validate_key, FileListResponse, FileObject, FileResponse};
pub use identifier::Identifier;
pub use status::Status;
pub use todo::{
    CreateTodoRequest, MessageResponse, PersistedTodo, Todo, TodoDto, TodoListResponse,
    TodoResponse, UpdateTodoRequest,
};
