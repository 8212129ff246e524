pub mod answer;
pub mod error;
pub mod locale;
pub mod question;

pub use answer::*;
pub use error::*;
pub use locale::*;
pub use question::*;
