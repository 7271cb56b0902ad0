//! 核心层：错误、分面状态与 reducer、工具栏编排、生命周期监管、后台运行时

pub mod error;
pub mod orchestrator;
pub mod reducer;
pub mod runtime;
pub mod state;
pub mod supervisor;

pub use error::{FilterError, SourceError, ToolbarError};
pub use orchestrator::Toolbar;
pub use reducer::{FacetAction, FacetChange, SetAction, TagsAction, TextAction};
pub use runtime::{spawn_toolbar, spawn_with, Command, ToolbarHandle};
pub use state::{ContextUpdate, EnabledFacets, FilterState, ToolbarContext, ToolbarView};
pub use supervisor::ToolbarSupervisor;
