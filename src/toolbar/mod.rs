//! 工具栏渲染投影：chip 聚合、删除路由、分面控件

pub mod chips;
pub mod controls;
pub mod deletion;

pub use chips::{build_chips, is_filter_selected, ChipContext};
pub use controls::{controls, FacetControl};
pub use deletion::route_deletion;
