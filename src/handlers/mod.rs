pub mod common;
pub mod environment;
pub mod health;

pub use common::{double_option, fallback, validate_required, JsonBody};
pub use environment::{
    create_environment, delete_environment, get_environment, list_environments,
    update_environment, CreateEnvironmentRequest, EnvironmentResponse, UpdateEnvironmentRequest,
};
pub use health::{health, HealthResponse};
