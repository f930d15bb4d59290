//! Client side of the dashboard: HTTP access to the API, the in-memory
//! state cache mirrored from it, and the form/view logic the UI binds to.

pub mod api;
pub mod error;
pub mod form;
pub mod store;
pub mod view;

pub use api::{EnvironmentApi, HttpApi, UpdateEnvironmentBody};
pub use error::{ClientError, ClientResult};
pub use form::{EnvironmentForm, FormErrors, FormOutcome};
pub use store::EnvironmentStore;
pub use view::{time_ago, CardView, DashboardStats};
