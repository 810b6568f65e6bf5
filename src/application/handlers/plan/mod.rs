//! Plan catalog handlers.

mod create_plan;
mod list_plans;
mod toggle_plan;
mod update_plan;

pub use create_plan::{CreatePlanCommand, CreatePlanHandler};
pub use list_plans::{ListPlansHandler, ListPlansQuery};
pub use toggle_plan::{TogglePlanCommand, TogglePlanHandler};
pub use update_plan::{UpdatePlanCommand, UpdatePlanHandler};
