pub mod engine;
pub mod ig_partition;
pub mod input_info;
pub mod pol_conf;

pub mod prelude {
    pub use ddcommon::prelude::*;

    pub use crate::engine::NpnEngine;
    pub use crate::ig_partition::IgPartition;
    pub use crate::input_info::InputInfo;
    pub use crate::pol_conf::PolConf;
}
