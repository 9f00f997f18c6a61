pub mod codec;
pub mod entities;
pub mod errors;
pub mod guard;
pub mod lifecycle;
pub mod permissions;
pub mod slots;

pub use codec::*;
pub use entities::*;
pub use errors::*;
pub use guard::*;
pub use lifecycle::*;
pub use permissions::*;
pub use slots::*;
