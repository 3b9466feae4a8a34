//! Planning entities, dialects and rendering.

pub mod dialect;
pub mod entities;
pub mod model;
pub mod render;

pub use dialect::Dialect;
pub use entities::{
    Action, Literal, Method, ObjectList, ParameterList, Predicate, Task, TypeDecl, TypeHierarchy,
};
pub use model::{ExtractedModel, ModelHeader, PlanningModel};
pub use render::RenderError;
