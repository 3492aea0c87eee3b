//! Datasource request planning
//!
//! Glue between dashboard objects and the GridDB web API:
//!
//! - **Request**: panel targets and TQL request bodies
//! - **Annotation**: point and region annotation definitions
//! - **Endpoint**: API paths, methods and parameters
//! - **Planner**: validate, render and expand into requests

mod annotation;
mod endpoint;
mod planner;
mod request;

pub use annotation::AnnotationQuery;
pub use endpoint::{ApiCall, Endpoint, Method, CONTAINER_LIST_LIMIT};
pub use planner::{plan_annotation, plan_target, plan_targets, plan_variable_query, validate_target};
pub use request::{ContainerType, Target, TqlRequest};
