pub mod compose;
pub mod copy;
pub mod dot;
pub mod dump;
pub mod from_expr;
pub mod from_truth;
pub mod manager;
pub mod ops;
pub mod support;

pub mod prelude {
    pub use ddcommon::prelude::*;

    pub use crate::from_expr::BoolExpr;
    pub use crate::manager::BddManager;
    pub use crate::ops::{Apply2Key, Apply3Key};
}
