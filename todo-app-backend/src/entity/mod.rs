pub mod attachment;
pub mod todo;

pub use attachment::Entity as Attachment;
pub use todo::Entity as Todo;
