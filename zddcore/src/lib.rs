pub mod dot;
pub mod dump;
pub mod manager;

pub mod prelude {
    pub use ddcommon::prelude::*;

    pub use crate::manager::ZddManager;
}
