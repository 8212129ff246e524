pub mod answers;
pub mod dispatch;
pub mod render;
pub mod session;
pub mod submission;

pub use answers::*;
pub use dispatch::*;
pub use render::*;
pub use session::*;
pub use submission::*;
